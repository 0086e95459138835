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

//! Collaborative processor performance control registers. Not every part
//! implements them, so each register is reported on its own.

use serde::Serialize;

use zenstates_msr::MSRAccess;
use zenstates_msr::MSRError;
use zenstates_shared::types::LogicalCoreId;

use crate::registers::CPPC_CAPABILITY_1;
use crate::registers::CPPC_CAPABILITY_2;
use crate::registers::CPPC_ENABLE;
use crate::registers::CPPC_REQUEST;

/// A register that may be missing on the running CPU.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum OptionalFeature<T> {
    Available(T),
    Unavailable(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CppcCapability1 {
    pub highest_perf: u8,
    pub nominal_perf: u8,
    pub lowest_nonlinear_perf: u8,
    pub lowest_perf: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CppcCapability2 {
    pub guaranteed_perf: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CppcRequest {
    pub energy_perf_preference: u8,
    pub desired_perf: u8,
    pub min_perf: u8,
    pub max_perf: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CppcReport {
    pub enabled: OptionalFeature<bool>,
    pub capability_1: OptionalFeature<CppcCapability1>,
    pub capability_2: OptionalFeature<CppcCapability2>,
    pub request: OptionalFeature<CppcRequest>,
}

fn byte(value: u64, index: u32) -> u8 {
    (value >> (index * 8)) as u8
}

impl From<u64> for CppcCapability1 {
    fn from(value: u64) -> Self {
        Self {
            highest_perf: byte(value, 3),
            nominal_perf: byte(value, 2),
            lowest_nonlinear_perf: byte(value, 1),
            lowest_perf: byte(value, 0),
        }
    }
}

impl From<u64> for CppcCapability2 {
    fn from(value: u64) -> Self {
        Self {
            guaranteed_perf: byte(value, 0),
        }
    }
}

impl From<u64> for CppcRequest {
    fn from(value: u64) -> Self {
        Self {
            energy_perf_preference: byte(value, 3),
            desired_perf: byte(value, 2),
            min_perf: byte(value, 1),
            max_perf: byte(value, 0),
        }
    }
}

impl<T> OptionalFeature<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, OptionalFeature::Available(_))
    }

    fn from_read(name: &str, result: Result<u64, MSRError>, decode: impl FnOnce(u64) -> T) -> Self {
        match result {
            Ok(value) => OptionalFeature::Available(decode(value)),
            Err(error) => {
                tracing::debug!("Optional feature {name} is not available: {error}");
                OptionalFeature::Unavailable(error.to_string())
            }
        }
    }
}

impl CppcReport {
    /// Reads every CPPC register, a failed read only marks that register unavailable.
    pub fn read(msr: &impl MSRAccess, core_id: LogicalCoreId) -> Self {
        Self {
            enabled: OptionalFeature::from_read(
                "CPPC Enable",
                msr.read(CPPC_ENABLE, core_id),
                |value| value & 1 != 0,
            ),
            capability_1: OptionalFeature::from_read(
                "CPPC Highest Perf",
                msr.read(CPPC_CAPABILITY_1, core_id),
                CppcCapability1::from,
            ),
            capability_2: OptionalFeature::from_read(
                "CPPC Guaranteed Perf",
                msr.read(CPPC_CAPABILITY_2, core_id),
                CppcCapability2::from,
            ),
            request: OptionalFeature::from_read(
                "CPPC EPP",
                msr.read(CPPC_REQUEST, core_id),
                CppcRequest::from,
            ),
        }
    }
}
