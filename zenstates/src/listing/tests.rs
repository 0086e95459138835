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

use maplit::hashmap;
use serde_json::json;
use test_log::test;

use zenstates_pstate::CpuFamily;
use zenstates_pstate::PStateError;
use zenstates_pstate::PStateSlot;
use zenstates_shared::types::LogicalCoreId;
use zenstates_test_utils::InMemoryMSR;

use crate::cppc::CppcCapability1;
use crate::cppc::OptionalFeature;
use crate::registers::CPPC_CAPABILITY_1;
use crate::registers::CPPC_CAPABILITY_2;
use crate::registers::CPPC_ENABLE;
use crate::registers::CSTATE_CONFIG;
use crate::registers::HWCR;
use crate::registers::POWER_MANAGEMENT_MISC;
use crate::PState;
use crate::ZenStates;

const ENABLED: u64 = 1 << 63;

fn slot(index: u8) -> u32 {
    PStateSlot::new(index).unwrap().register_id()
}

/// P0 at 2500 MHz, P1 at 2000 MHz, P2 with a zero divisor, the rest disabled.
/// CPPC request register is absent.
fn zen_states() -> ZenStates<InMemoryMSR> {
    let registers = hashmap! {
        slot(0) => ENABLED | 0x64 | (0x8 << 8) | (0x30 << 14),
        slot(1) => ENABLED | 0x50 | (0x8 << 8) | (0x50 << 14),
        slot(2) => ENABLED | 0x64,
        slot(3) => 0,
        slot(4) => 0,
        slot(5) => 0,
        slot(6) => 0,
        slot(7) => 0x64 | (0x8 << 8),
        HWCR => 1 << 21,
        POWER_MANAGEMENT_MISC => 1 << 32,
        CSTATE_CONFIG => (1 << 22) | (1 << 6),
        CPPC_ENABLE => 1,
        CPPC_CAPABILITY_1 => 0xA0_8C_28_10,
        CPPC_CAPABILITY_2 => 0x80,
    };

    let msr = registers
        .into_iter()
        .fold(InMemoryMSR::new(2), |msr, (register_id, value)| {
            msr.with_register(register_id, value)
        });

    ZenStates::new(msr, CpuFamily::FAMILY_17H, LogicalCoreId::new(0))
}

#[test]
fn listing_decodes_every_slot() {
    let listing = zen_states().list().unwrap();

    assert_eq!(listing.cpu_family, 0x17);
    assert_eq!(listing.pstates.len(), 8);
    assert!(listing.pstates[0].state.as_ref().unwrap().is_enabled());
    assert_eq!(listing.pstates[2].state, Err(PStateError::ZeroDivisorId));
    assert_eq!(listing.pstates[7].state, Ok(PState::Disabled));
    assert!(listing.c6_package);
    assert!(!listing.c6_core);
    assert!(listing.core_performance_boost);
}

#[test]
fn listing_reports_cppc_per_register() {
    let listing = zen_states().list().unwrap();

    assert_eq!(listing.cppc.enabled, OptionalFeature::Available(true));
    assert_eq!(
        listing.cppc.capability_1,
        OptionalFeature::Available(CppcCapability1 {
            highest_perf: 0xA0,
            nominal_perf: 0x8C,
            lowest_nonlinear_perf: 0x28,
            lowest_perf: 0x10,
        })
    );
    assert!(listing.cppc.capability_2.is_available());
    assert!(!listing.cppc.request.is_available());
}

#[test]
fn listing_display() {
    let listing = zen_states().list().unwrap();
    let output = listing.to_string();
    let lines = output.lines().collect::<Vec<_>>();

    assert_eq!(
        lines[0],
        "P0 - Enabled - FID = 64 - DID = 8 - VID = 30 - Freq = 2500.00 MHz - vCore = 1.25000"
    );
    assert_eq!(
        lines[1],
        "P1 - Enabled - FID = 50 - DID = 8 - VID = 50 - Freq = 2000.00 MHz - vCore = 1.05000"
    );
    assert_eq!(
        lines[2],
        "P2 - Malformed (0x8000000000000064) - P-state divisor id is 0, the frequency is undefined"
    );
    assert_eq!(lines[3], "P3 - Disabled");
    assert_eq!(lines[8], "C6 State - Package - Enabled");
    assert_eq!(lines[9], "C6 State - Core - Disabled");
    assert_eq!(lines[10], "Core Performance Boost - Enabled");
    assert_eq!(lines[11], "CPPC - Enabled");
    assert_eq!(
        lines[12],
        "CPPC Highest Perf = 160 - Nominal Perf = 140 - Lowest Nonlinear Perf = 40 - Lowest Perf = 16"
    );
    assert_eq!(lines[13], "CPPC Guaranteed Perf = 128");
    assert!(lines[14].starts_with("Optional feature CPPC EPP not available: "));
    assert_eq!(lines.len(), 15);
}

#[test]
fn listing_json() {
    let listing = zen_states().list().unwrap();
    let value = serde_json::to_value(&listing).unwrap();

    assert_eq!(value["cpu_family"], json!(23));
    assert_eq!(value["pstates"][0]["status"], json!("enabled"));
    assert_eq!(value["pstates"][0]["slot"], json!(0));
    assert_eq!(value["pstates"][0]["fid"], json!(0x64));
    assert_eq!(value["pstates"][0]["did"], json!(8));
    assert_eq!(value["pstates"][0]["frequency_mhz"], json!(2500.0));
    assert_eq!(value["pstates"][2]["status"], json!("malformed"));
    assert_eq!(value["pstates"][3], json!({"status": "disabled", "slot": 3, "raw": 0}));
    assert_eq!(value["c6_package"], json!(true));
    assert_eq!(
        value["cppc"]["capability_2"],
        json!({"status": "available", "value": {"guaranteed_perf": 128}})
    );
    assert_eq!(value["cppc"]["request"]["status"], json!("unavailable"));
}

#[test]
fn listing_fails_without_pstate_registers() {
    let zen_states = ZenStates::new(InMemoryMSR::new(1), CpuFamily::FAMILY_17H, LogicalCoreId::new(0));

    assert!(zen_states.list().is_err());
}
