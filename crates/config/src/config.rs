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

use std::path::PathBuf;

use zenstates_pstate::CpuFamily;
use zenstates_shared::types::LogicalCoreId;

use crate::unresolved_config::UnresolvedZenStatesConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZenStatesConfig {
    pub logs: Logs,
    pub msr: MSRConfig,
    pub cpu: Cpu,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Logs {
    pub log_level: tracing_subscriber::filter::LevelFilter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MSRConfig {
    /// Directory holding `<core id>/msr` device nodes.
    pub device_dir: PathBuf,
    /// Core whose registers are read when a value is needed once for the whole CPU.
    pub read_core: LogicalCoreId,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Cpu {
    /// Replaces the CPUID family when set.
    pub family: Option<CpuFamily>,
}

impl Default for ZenStatesConfig {
    fn default() -> Self {
        UnresolvedZenStatesConfig::default().resolve()
    }
}
