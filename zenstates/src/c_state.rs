/*
 * Copyright 2024 Fluence Labs Limited
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use zenstates_msr::MSRAccess;
use zenstates_msr::MSRItem;
use zenstates_msr::MSRResult;
use zenstates_msr::MSRTarget;

use crate::registers::CStateConfigFlags;
use crate::registers::PowerManagementMiscFlags;
use crate::registers::CSTATE_CONFIG;
use crate::registers::POWER_MANAGEMENT_MISC;
use crate::ZenStates;
use crate::ZenStatesResult;

impl<M: MSRAccess> ZenStates<M> {
    pub fn is_package_c6_enabled(&self) -> MSRResult<bool> {
        let value = self.msr.read(POWER_MANAGEMENT_MISC, self.read_core)?;
        Ok(PowerManagementMiscFlags::from_bits_retain(value)
            .contains(PowerManagementMiscFlags::PACKAGE_C6_ENABLE))
    }

    /// Core C6 counts as enabled only when all three CCR entries allow it.
    pub fn is_core_c6_enabled(&self) -> MSRResult<bool> {
        let value = self.msr.read(CSTATE_CONFIG, self.read_core)?;
        Ok(CStateConfigFlags::from_bits_retain(value).contains(CStateConfigFlags::all()))
    }

    /// Enables or disables package and core C6 on every core.
    pub fn set_c6(&self, enabled: bool) -> ZenStatesResult<()> {
        tracing::info!("{} C6 state", if enabled { "Enabling" } else { "Disabling" });

        let package = MSRItem::bits(
            POWER_MANAGEMENT_MISC,
            PowerManagementMiscFlags::PACKAGE_C6_ENABLE.bits(),
            enabled,
        );
        let core = MSRItem::bits(CSTATE_CONFIG, CStateConfigFlags::all().bits(), enabled);

        self.msr.apply(package, MSRTarget::AllCores)?;
        self.msr.apply(core, MSRTarget::AllCores)?;

        Ok(())
    }
}
