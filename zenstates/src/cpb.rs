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

use crate::registers::HwcrFlags;
use crate::registers::HWCR;
use crate::ZenStates;
use crate::ZenStatesResult;

impl<M: MSRAccess> ZenStates<M> {
    /// HWCR stores CpbDis, so a clear bit means boost is on.
    pub fn is_cpb_enabled(&self) -> MSRResult<bool> {
        let hwcr = HwcrFlags::from_bits_retain(self.msr.read(HWCR, self.read_core)?);
        Ok(!hwcr.contains(HwcrFlags::CPB_DIS))
    }

    /// Enables or disables core performance boost on every core.
    pub fn set_cpb(&self, enabled: bool) -> ZenStatesResult<()> {
        tracing::info!(
            "{} core performance boost",
            if enabled { "Enabling" } else { "Disabling" }
        );

        let cpb_dis = MSRItem::bits(HWCR, HwcrFlags::CPB_DIS.bits(), !enabled);
        self.msr.apply(cpb_dis, MSRTarget::AllCores)?;

        Ok(())
    }
}
