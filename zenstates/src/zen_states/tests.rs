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

use test_log::test;

use zenstates_pstate::CpuFamily;
use zenstates_pstate::PStateLayout;
use zenstates_pstate::PStateSlot;
use zenstates_shared::types::LogicalCoreId;
use zenstates_test_utils::InMemoryMSR;

use crate::registers::CSTATE_CONFIG;
use crate::registers::HWCR;
use crate::registers::POWER_MANAGEMENT_MISC;
use crate::ZenStates;

const PACKAGE_C6: u64 = 1 << 32;
const CORE_C6: u64 = (1 << 22) | (1 << 14) | (1 << 6);
const TSC_LOCK: u64 = 1 << 21;
const CPB_DIS: u64 = 1 << 25;

fn core(core_id: u32) -> LogicalCoreId {
    LogicalCoreId::new(core_id)
}

fn zen_states(msr: InMemoryMSR) -> ZenStates<InMemoryMSR> {
    ZenStates::new(msr, CpuFamily::FAMILY_19H, core(0))
}

#[test]
fn layout_follows_family() {
    let zen_1ah = ZenStates::new(InMemoryMSR::new(1), CpuFamily::FAMILY_1AH, core(0));
    let zen_17h = ZenStates::new(InMemoryMSR::new(1), CpuFamily::FAMILY_17H, core(0));
    let zen_19h = zen_states(InMemoryMSR::new(1));

    assert_eq!(zen_1ah.layout(), PStateLayout::Family1Ah);
    assert_eq!(zen_17h.layout(), PStateLayout::Family17h);
    assert_eq!(zen_19h.layout(), PStateLayout::Family17h);
    assert_eq!(zen_19h.family(), CpuFamily::FAMILY_19H);
}

#[test]
fn pstate_is_read_from_read_core() {
    let slot = PStateSlot::new(2).unwrap();
    let msr = InMemoryMSR::new(2);
    msr.set(slot.register_id(), 0x11, core(0));
    msr.set(slot.register_id(), 0x22, core(1));

    let zen_states = ZenStates::new(msr, CpuFamily::FAMILY_17H, core(1));

    assert_eq!(zen_states.read_core(), core(1));
    assert_eq!(zen_states.read_pstate_raw(slot).unwrap(), 0x22);
}

#[test]
fn c6_enable_keeps_other_bits_per_core() {
    let msr = InMemoryMSR::new(2)
        .with_register(POWER_MANAGEMENT_MISC, 0x3)
        .with_register(CSTATE_CONFIG, 0);
    msr.set(CSTATE_CONFIG, 0x1, core(1));
    let zen_states = zen_states(msr);

    zen_states.set_c6(true).unwrap();

    let msr = zen_states.msr();
    assert_eq!(msr.get(POWER_MANAGEMENT_MISC, core(0)), Some(0x3 | PACKAGE_C6));
    assert_eq!(msr.get(POWER_MANAGEMENT_MISC, core(1)), Some(0x3 | PACKAGE_C6));
    assert_eq!(msr.get(CSTATE_CONFIG, core(0)), Some(CORE_C6));
    assert_eq!(msr.get(CSTATE_CONFIG, core(1)), Some(0x1 | CORE_C6));
    assert!(zen_states.is_package_c6_enabled().unwrap());
    assert!(zen_states.is_core_c6_enabled().unwrap());
}

#[test]
fn c6_disable_clears_all_bits() {
    let msr = InMemoryMSR::new(2)
        .with_register(POWER_MANAGEMENT_MISC, PACKAGE_C6 | 0x3)
        .with_register(CSTATE_CONFIG, CORE_C6 | 0x1);
    let zen_states = zen_states(msr);

    zen_states.set_c6(false).unwrap();

    for core_id in 0..2 {
        assert_eq!(zen_states.msr().get(POWER_MANAGEMENT_MISC, core(core_id)), Some(0x3));
        assert_eq!(zen_states.msr().get(CSTATE_CONFIG, core(core_id)), Some(0x1));
    }
    assert!(!zen_states.is_package_c6_enabled().unwrap());
    assert!(!zen_states.is_core_c6_enabled().unwrap());
}

#[test]
fn core_c6_needs_every_ccr() {
    let msr = InMemoryMSR::new(1).with_register(CSTATE_CONFIG, (1 << 22) | (1 << 6));
    let zen_states = zen_states(msr);

    assert!(!zen_states.is_core_c6_enabled().unwrap());
}

#[test]
fn cpb_uses_inverted_bit() {
    let msr = InMemoryMSR::new(2).with_register(HWCR, TSC_LOCK);
    let zen_states = zen_states(msr);
    assert!(zen_states.is_cpb_enabled().unwrap());

    zen_states.set_cpb(false).unwrap();
    assert!(!zen_states.is_cpb_enabled().unwrap());
    for core_id in 0..2 {
        assert_eq!(zen_states.msr().get(HWCR, core(core_id)), Some(TSC_LOCK | CPB_DIS));
    }

    zen_states.set_cpb(true).unwrap();
    assert!(zen_states.is_cpb_enabled().unwrap());
    assert_eq!(zen_states.msr().get(HWCR, core(1)), Some(TSC_LOCK));
}

#[test]
fn toggles_leave_tsc_lock_alone() {
    let msr = InMemoryMSR::new(1)
        .with_register(HWCR, 0)
        .with_register(POWER_MANAGEMENT_MISC, 0)
        .with_register(CSTATE_CONFIG, 0);
    let zen_states = zen_states(msr);

    zen_states.set_cpb(true).unwrap();
    zen_states.set_c6(true).unwrap();

    assert_eq!(zen_states.msr().get(HWCR, core(0)), Some(0));
}

#[test]
fn toggle_fails_on_missing_register() {
    let zen_states = zen_states(InMemoryMSR::new(1));

    assert!(zen_states.set_c6(true).is_err());
    assert!(zen_states.msr().writes().is_empty());
}
