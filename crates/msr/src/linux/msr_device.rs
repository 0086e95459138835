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

use std::path::Path;
use std::path::PathBuf;

use nonempty::NonEmpty;

use zenstates_shared::types::LogicalCoreId;

use super::cores::discover_cores;
use super::utils;
use crate::MSRAccess;
use crate::MSRResult;

/// MSR backend over the `<device_dir>/<core id>/msr` files.
#[derive(Clone, Debug)]
pub struct MSRDevice {
    device_dir: PathBuf,
    cores: NonEmpty<LogicalCoreId>,
}

impl MSRDevice {
    /// Enumerates available cores once, the set stays fixed afterwards.
    pub fn discover(device_dir: impl Into<PathBuf>) -> MSRResult<Self> {
        let device_dir = device_dir.into();
        let cores = discover_cores(&device_dir)?;

        Ok(Self { device_dir, cores })
    }

    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }

    fn msr_path(&self, core_id: LogicalCoreId) -> PathBuf {
        self.device_dir.join(core_id.to_string()).join("msr")
    }
}

impl MSRAccess for MSRDevice {
    fn cores(&self) -> &NonEmpty<LogicalCoreId> {
        &self.cores
    }

    fn read(&self, register_id: u32, core_id: LogicalCoreId) -> MSRResult<u64> {
        utils::read_msr(&self.msr_path(core_id), register_id, core_id)
    }

    fn write(&self, register_id: u32, value: u64, core_id: LogicalCoreId) -> MSRResult<()> {
        utils::write_msr(&self.msr_path(core_id), register_id, value, core_id)
    }
}
