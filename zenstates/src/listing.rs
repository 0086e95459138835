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

use std::fmt;

use serde::Serialize;
use serde::Serializer;

use zenstates_msr::MSRAccess;
use zenstates_pstate::PState;
use zenstates_pstate::PStateError;
use zenstates_pstate::PStateSlot;

use crate::cppc::CppcReport;
use crate::cppc::OptionalFeature;
use crate::ZenStates;
use crate::ZenStatesResult;

#[cfg(test)]
mod tests;

/// Current state of the CPU as seen from the read core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StateListing {
    pub cpu_family: u32,
    pub pstates: Vec<PStateEntry>,
    pub c6_package: bool,
    pub c6_core: bool,
    pub core_performance_boost: bool,
    pub cppc: CppcReport,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PStateEntry {
    pub slot: PStateSlot,
    pub raw: u64,
    /// A register that can't be decoded is reported, not fatal.
    pub state: Result<PState, PStateError>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum PStateView {
    Disabled {
        slot: u8,
        raw: u64,
    },
    Enabled {
        slot: u8,
        raw: u64,
        fid: u32,
        did: Option<u32>,
        vid: u32,
        frequency_mhz: f64,
        voltage: Option<f64>,
    },
    Malformed {
        slot: u8,
        raw: u64,
        reason: String,
    },
}

impl<M: MSRAccess> ZenStates<M> {
    pub fn list(&self) -> ZenStatesResult<StateListing> {
        let pstates = PStateSlot::all()
            .map(|slot| {
                let raw = self.read_pstate_raw(slot)?;
                let state = self.layout.decode(raw);
                if let Err(error) = &state {
                    tracing::warn!("{slot} register {raw:#018X} is malformed: {error}");
                }
                Ok(PStateEntry { slot, raw, state })
            })
            .collect::<ZenStatesResult<Vec<_>>>()?;

        Ok(StateListing {
            cpu_family: self.family.id(),
            pstates,
            c6_package: self.is_package_c6_enabled()?,
            c6_core: self.is_core_c6_enabled()?,
            core_performance_boost: self.is_cpb_enabled()?,
            cppc: CppcReport::read(&self.msr, self.read_core),
        })
    }
}

impl From<&PStateEntry> for PStateView {
    fn from(entry: &PStateEntry) -> Self {
        let slot = entry.slot.index();
        let raw = entry.raw;

        match &entry.state {
            Ok(PState::Disabled) => PStateView::Disabled { slot, raw },
            Ok(PState::Enabled(fields)) => PStateView::Enabled {
                slot,
                raw,
                fid: fields.fid(),
                did: fields.did(),
                vid: fields.vid(),
                frequency_mhz: fields.frequency_mhz(),
                voltage: fields.voltage(),
            },
            Err(error) => PStateView::Malformed {
                slot,
                raw,
                reason: error.to_string(),
            },
        }
    }
}

impl Serialize for PStateEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PStateView::from(self).serialize(serializer)
    }
}

impl fmt::Display for PStateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            Ok(state) => write!(f, "{} - {state}", self.slot),
            Err(error) => write!(f, "{} - Malformed ({:#018X}) - {error}", self.slot, self.raw),
        }
    }
}

fn enabled_str(enabled: bool) -> &'static str {
    if enabled {
        "Enabled"
    } else {
        "Disabled"
    }
}

fn write_optional<T>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    feature: &OptionalFeature<T>,
    line: impl FnOnce(&T) -> String,
) -> fmt::Result {
    match feature {
        OptionalFeature::Available(value) => writeln!(f, "{}", line(value)),
        OptionalFeature::Unavailable(reason) => {
            writeln!(f, "Optional feature {name} not available: {reason}")
        }
    }
}

impl fmt::Display for StateListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.pstates {
            writeln!(f, "{entry}")?;
        }
        writeln!(f, "C6 State - Package - {}", enabled_str(self.c6_package))?;
        writeln!(f, "C6 State - Core - {}", enabled_str(self.c6_core))?;
        writeln!(
            f,
            "Core Performance Boost - {}",
            enabled_str(self.core_performance_boost)
        )?;

        write_optional(f, "CPPC Enable", &self.cppc.enabled, |enabled| {
            format!("CPPC - {}", enabled_str(*enabled))
        })?;
        write_optional(f, "CPPC Highest Perf", &self.cppc.capability_1, |cap| {
            format!(
                "CPPC Highest Perf = {} - Nominal Perf = {} - Lowest Nonlinear Perf = {} - Lowest Perf = {}",
                cap.highest_perf, cap.nominal_perf, cap.lowest_nonlinear_perf, cap.lowest_perf
            )
        })?;
        write_optional(f, "CPPC Guaranteed Perf", &self.cppc.capability_2, |cap| {
            format!("CPPC Guaranteed Perf = {}", cap.guaranteed_perf)
        })?;
        write_optional(f, "CPPC EPP", &self.cppc.request, |request| {
            format!(
                "CPPC EPP = {} - Desired Perf = {} - Min Perf = {} - Max Perf = {}",
                request.energy_perf_preference,
                request.desired_perf,
                request.min_perf,
                request.max_perf
            )
        })
    }
}
