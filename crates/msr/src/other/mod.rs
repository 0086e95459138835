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

//! The msr device exists on Linux only, this backend never starts elsewhere.
use std::path::Path;
use std::path::PathBuf;

use nonempty::NonEmpty;

use zenstates_shared::types::LogicalCoreId;

use crate::MSRAccess;
use crate::MSRError;
use crate::MSRResult;

#[derive(Clone, Debug)]
pub struct MSRDevice {
    device_dir: PathBuf,
    cores: NonEmpty<LogicalCoreId>,
}

impl MSRDevice {
    pub fn discover(_device_dir: impl Into<PathBuf>) -> MSRResult<Self> {
        Err(MSRError::UnsupportedPlatform)
    }

    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }
}

pub fn discover_cores(_device_dir: &Path) -> MSRResult<NonEmpty<LogicalCoreId>> {
    Err(MSRError::UnsupportedPlatform)
}

impl MSRAccess for MSRDevice {
    fn cores(&self) -> &NonEmpty<LogicalCoreId> {
        &self.cores
    }

    fn read(&self, _register_id: u32, _core_id: LogicalCoreId) -> MSRResult<u64> {
        Err(MSRError::UnsupportedPlatform)
    }

    fn write(&self, _register_id: u32, _value: u64, _core_id: LogicalCoreId) -> MSRResult<()> {
        Err(MSRError::UnsupportedPlatform)
    }
}
