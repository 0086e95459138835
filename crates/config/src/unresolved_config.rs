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

use serde::Deserialize;
use serde::Serialize;

use zenstates_pstate::CpuFamily;
use zenstates_shared::types::LogicalCoreId;

use super::defaults::default_device_dir;
use super::defaults::default_log_level;
use super::defaults::default_read_core;
use crate::*;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedZenStatesConfig {
    #[serde(default)]
    pub logs: UnresolvedLogs,
    #[serde(default)]
    pub msr: UnresolvedMSR,
    #[serde(default)]
    pub cpu: UnresolvedCpu,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedLogs {
    #[serde(default = "default_log_level", alias = "log_level")]
    pub log_level: LogLevel,
}

impl Default for UnresolvedLogs {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedMSR {
    #[serde(default = "default_device_dir", alias = "device_dir")]
    pub device_dir: PathBuf,

    #[serde(default = "default_read_core", alias = "read_core")]
    pub read_core: u32,
}

impl Default for UnresolvedMSR {
    fn default() -> Self {
        Self {
            device_dir: default_device_dir(),
            read_core: default_read_core(),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct UnresolvedCpu {
    pub family: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl UnresolvedZenStatesConfig {
    pub fn resolve(self) -> ZenStatesConfig {
        ZenStatesConfig {
            logs: self.logs.resolve(),
            msr: self.msr.resolve(),
            cpu: self.cpu.resolve(),
        }
    }
}

impl LogLevel {
    pub fn to_tracing_filter(&self) -> tracing_subscriber::filter::LevelFilter {
        use tracing_subscriber::filter::LevelFilter;

        match self {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

impl UnresolvedLogs {
    pub fn resolve(self) -> Logs {
        Logs {
            log_level: self.log_level.to_tracing_filter(),
        }
    }
}

impl UnresolvedMSR {
    pub fn resolve(self) -> MSRConfig {
        MSRConfig {
            device_dir: self.device_dir,
            read_core: LogicalCoreId::new(self.read_core),
        }
    }
}

impl UnresolvedCpu {
    pub fn resolve(self) -> Cpu {
        Cpu {
            family: self.family.map(CpuFamily::new),
        }
    }
}
