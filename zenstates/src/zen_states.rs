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

use zenstates_config::Cpu;
use zenstates_config::MSRConfig;
use zenstates_msr::MSRAccess;
use zenstates_msr::MSRDevice;
use zenstates_pstate::CpuFamily;
use zenstates_pstate::PState;
use zenstates_pstate::PStateLayout;
use zenstates_pstate::PStateResult;
use zenstates_pstate::PStateSlot;
use zenstates_shared::types::LogicalCoreId;

use crate::ZenStatesResult;

#[cfg(test)]
mod tests;

/// Entry point to every operation of the tool.
///
/// Holds the MSR backend, the CPU family detected once at startup and the
/// register layout derived from it.
#[derive(Debug)]
pub struct ZenStates<M> {
    pub(crate) msr: M,
    pub(crate) family: CpuFamily,
    pub(crate) layout: PStateLayout,
    pub(crate) read_core: LogicalCoreId,
}

impl ZenStates<MSRDevice> {
    /// Discovers msr devices and detects the CPU family, unless it's fixed by config.
    pub fn from_config(msr_config: &MSRConfig, cpu_config: &Cpu) -> ZenStatesResult<Self> {
        let family = match cpu_config.family {
            Some(family) => {
                tracing::info!("Using CPU family {family} from config");
                family
            }
            None => CpuFamily::detect()?,
        };
        let msr = MSRDevice::discover(msr_config.device_dir.clone())?;
        tracing::debug!(
            "Using msr devices in {:?} for {} cores",
            msr.device_dir(),
            msr.cores().len()
        );

        Ok(Self::new(msr, family, msr_config.read_core))
    }
}

impl<M: MSRAccess> ZenStates<M> {
    pub fn new(msr: M, family: CpuFamily, read_core: LogicalCoreId) -> Self {
        let layout = PStateLayout::for_family(family);
        tracing::debug!("CPU family {family} uses the {layout} P-state layout");

        Self {
            msr,
            family,
            layout,
            read_core,
        }
    }

    pub fn msr(&self) -> &M {
        &self.msr
    }

    pub fn family(&self) -> CpuFamily {
        self.family
    }

    pub fn layout(&self) -> PStateLayout {
        self.layout
    }

    pub fn read_core(&self) -> LogicalCoreId {
        self.read_core
    }

    /// Raw value of a P-state register on the read core.
    pub fn read_pstate_raw(&self, slot: PStateSlot) -> ZenStatesResult<u64> {
        let raw = self.msr.read(slot.register_id(), self.read_core)?;
        Ok(raw)
    }

    pub fn decode(&self, raw: u64) -> PStateResult<PState> {
        self.layout.decode(raw)
    }
}
