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

use std::num::NonZeroU32;

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use test_log::test;

use crate::BitField;
use crate::CpuFamily;
use crate::PState;
use crate::PStateError;
use crate::PStateField;
use crate::PStateFields;
use crate::PStateLayout;
use crate::PStateSlot;

const ENABLED: u64 = 1 << 63;
const SAMPLES: usize = 1000;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(0x5EED_2E57)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{actual} is not close to {expected}"
    );
}

/// Register bits that belong to a field on a given layout.
fn field_mask(layout: PStateLayout, field: PStateField) -> u64 {
    match (layout, field) {
        (PStateLayout::Family1Ah, PStateField::Fid) => 0xFFF,
        (PStateLayout::Family1Ah, PStateField::Vid) => 0x3F_C000 | (1 << 32),
        (PStateLayout::Family17h, PStateField::Fid) => 0xFF,
        (PStateLayout::Family17h, PStateField::Did) => 0x3F00,
        (PStateLayout::Family17h, PStateField::Vid) => 0x3F_C000,
        (PStateLayout::Family1Ah, PStateField::Did) => unreachable!(),
    }
}

fn fields_of(layout: PStateLayout) -> &'static [PStateField] {
    match layout {
        PStateLayout::Family1Ah => &[PStateField::Fid, PStateField::Vid],
        PStateLayout::Family17h => &[PStateField::Fid, PStateField::Did, PStateField::Vid],
    }
}

#[test]
fn bit_field_extract_and_splice() {
    let field = BitField::new(8, 6);

    assert_eq!(field.max_value(), 0x3F);
    assert_eq!(field.mask(), 0x3F00);
    assert_eq!(field.extract(0xFFFF_FFFF_FFFF_0AFF), 0x0A);
    assert_eq!(field.splice(u64::MAX, 0), Some(u64::MAX & !0x3F00));
    assert_eq!(field.splice(0, 0x40), None);

    let top = BitField::new(63, 1);
    assert_eq!(top.mask(), ENABLED);
    assert_eq!(top.splice(0, 1), Some(ENABLED));
}

#[test]
fn family_17h_reference_pstate() {
    let raw = ENABLED | 0x64 | (0x8 << 8) | (0x30 << 14);

    let pstate = PStateLayout::Family17h.decode(raw).unwrap();
    let fields = pstate.fields().unwrap();

    assert_eq!(fields.fid(), 0x64);
    assert_eq!(fields.did(), Some(0x8));
    assert_eq!(fields.vid(), 0x30);
    assert_close(fields.frequency_mhz(), 2500.0);
    assert_close(fields.voltage().unwrap(), 1.25);
    assert_eq!(
        pstate.to_string(),
        "Enabled - FID = 64 - DID = 8 - VID = 30 - Freq = 2500.00 MHz - vCore = 1.25000"
    );
}

#[test]
fn family_1ah_splits_vid_over_two_ranges() {
    // FID = 0x2EE (3750 MHz), VID[7:0] = 0x34, VID[8] = 1
    let raw = ENABLED | 0x2EE | (0x34 << 14) | (1 << 32);

    let pstate = PStateLayout::Family1Ah.decode(raw).unwrap();
    let fields = pstate.fields().unwrap();

    assert_eq!(fields.fid(), 0x2EE);
    assert_eq!(fields.vid(), 0x134);
    assert_eq!(fields.did(), None);
    assert_eq!(fields.voltage(), None);
    assert_close(fields.frequency_mhz(), 3750.0);
    assert_eq!(
        pstate.to_string(),
        "Enabled - FID = 2EE - VID = 134 - Freq = 3750.00 MHz"
    );
}

#[test]
fn family_1ah_vid_encode_is_inverse_of_decode() {
    let raw = PStateLayout::Family1Ah
        .set_field(0, PStateField::Vid, 0x1AB)
        .unwrap();

    assert_eq!(raw, (0xAB << 14) | (1 << 32));

    let raw = PStateLayout::Family1Ah
        .set_field(raw, PStateField::Vid, 0x0CD)
        .unwrap();
    assert_eq!(raw, 0xCD << 14);
}

#[test]
fn disabled_register_short_circuits() {
    let mut rng = rng();

    for _ in 0..SAMPLES {
        let raw = rng.gen::<u64>() & !ENABLED;
        assert_eq!(PStateLayout::Family1Ah.decode(raw), Ok(PState::Disabled));
        assert_eq!(PStateLayout::Family17h.decode(raw), Ok(PState::Disabled));
    }

    // zero DID is not inspected when the P-state is disabled
    assert_eq!(PStateLayout::Family17h.decode(0x64), Ok(PState::Disabled));
}

#[test]
fn zero_divisor_is_malformed() {
    let raw = ENABLED | 0x64 | (0x30 << 14);

    assert_eq!(
        PStateLayout::Family17h.decode(raw),
        Err(PStateError::ZeroDivisorId)
    );
}

#[test]
fn divisor_exists_on_family_17h_only() {
    let mut rng = rng();

    for _ in 0..SAMPLES {
        let raw = rng.gen::<u64>() | ENABLED | (1 << 8);

        let pstate = PStateLayout::Family1Ah.decode(raw).unwrap();
        assert_eq!(pstate.fields().unwrap().did(), None);

        let pstate = PStateLayout::Family17h.decode(raw).unwrap();
        assert!(pstate.fields().unwrap().did().is_some());
    }
}

#[test]
fn divisor_is_unsupported_on_family_1ah() {
    let raw = ENABLED | 0x123;

    let result = PStateLayout::Family1Ah.set_field(raw, PStateField::Did, 0x8);

    assert_eq!(
        result,
        Err(PStateError::unsupported_on_layout(
            PStateField::Did,
            PStateLayout::Family1Ah
        ))
    );
}

#[test]
fn out_of_range_value_is_rejected() {
    let layout = PStateLayout::Family17h;

    assert_eq!(
        layout.set_field(0, PStateField::Did, 0x40),
        Err(PStateError::value_out_of_range(PStateField::Did, 0x40, 1, 0x3F))
    );
    assert_eq!(
        PStateLayout::Family1Ah.set_field(0, PStateField::Vid, 0x200),
        Err(PStateError::value_out_of_range(PStateField::Vid, 0x200, 0, 0x1FF))
    );
}

#[test]
fn zero_divisor_and_reserved_fid_are_rejected() {
    let raw = ENABLED | 0x64 | (0x8 << 8) | (0x30 << 14);

    assert_eq!(
        PStateLayout::Family17h.set_field(raw, PStateField::Did, 0),
        Err(PStateError::value_out_of_range(PStateField::Did, 0, 1, 0x3F))
    );
    assert_eq!(
        PStateLayout::Family17h.set_field(raw, PStateField::Fid, 0xF),
        Err(PStateError::value_out_of_range(PStateField::Fid, 0xF, 0x10, 0xFF))
    );
    assert_eq!(
        PStateLayout::Family1Ah.set_field(raw, PStateField::Fid, 0x00F),
        Err(PStateError::value_out_of_range(PStateField::Fid, 0xF, 0x10, 0xFFF))
    );

    // the lowest accepted values still decode
    let raw = PStateLayout::Family17h
        .set_field(raw, PStateField::Did, 1)
        .and_then(|raw| PStateLayout::Family17h.set_field(raw, PStateField::Fid, 0x10))
        .unwrap();
    assert!(PStateLayout::Family17h.decode(raw).unwrap().is_enabled());
}

#[test]
fn set_field_touches_only_field_bits() {
    let mut rng = rng();

    for layout in [PStateLayout::Family1Ah, PStateLayout::Family17h] {
        for &field in fields_of(layout) {
            let min = layout.field_min(field).unwrap();
            let max = layout.field_max(field).unwrap();
            let mask = field_mask(layout, field);

            for _ in 0..SAMPLES {
                let raw = rng.gen::<u64>();
                let value = rng.gen_range(min..=max) as u32;

                let updated = layout.set_field(raw, field, value).unwrap();

                assert_eq!(updated & !mask, raw & !mask, "{layout} {field} {raw:#X}");
            }
        }
    }
}

#[test]
fn set_field_is_idempotent() {
    let mut rng = rng();

    for layout in [PStateLayout::Family1Ah, PStateLayout::Family17h] {
        for &field in fields_of(layout) {
            let min = layout.field_min(field).unwrap();
            let max = layout.field_max(field).unwrap();

            for _ in 0..SAMPLES {
                let raw = rng.gen::<u64>();
                let value = rng.gen_range(min..=max) as u32;

                let once = layout.set_field(raw, field, value).unwrap();
                let twice = layout.set_field(once, field, value).unwrap();

                assert_eq!(once, twice);
            }
        }
    }
}

#[test]
fn encode_then_decode_restores_fields() {
    let mut rng = rng();

    for _ in 0..SAMPLES {
        let fields = PStateFields::Family1Ah {
            fid: rng.gen_range(0x10..=0xFFF),
            vid: rng.gen_range(0..=0x1FF),
        };
        let raw = fields.encode(rng.gen::<u64>()).unwrap();
        assert_eq!(
            PStateLayout::Family1Ah.decode(raw),
            Ok(PState::Enabled(fields))
        );

        let fields = PStateFields::Family17h {
            fid: rng.gen_range(0x10..=0xFF),
            did: NonZeroU32::new(rng.gen_range(1..=0x3F)).unwrap(),
            vid: rng.gen_range(0..=0xFF),
        };
        let raw = fields.encode(rng.gen::<u64>()).unwrap();
        assert_eq!(
            PStateLayout::Family17h.decode(raw),
            Ok(PState::Enabled(fields))
        );
    }
}

#[test]
fn enable_flag_toggles_bit_63_only() {
    let layout = PStateLayout::Family17h;
    let raw = 0x0000_0000_0040_0864;

    let enabled = layout.set_enabled(raw, true);
    assert_eq!(enabled, raw | ENABLED);
    assert!(layout.is_enabled(enabled));

    let disabled = layout.set_enabled(enabled, false);
    assert_eq!(disabled, raw);
    assert!(!layout.is_enabled(disabled));
}

#[test]
fn layout_follows_family() {
    assert_eq!(
        PStateLayout::for_family(CpuFamily::FAMILY_1AH),
        PStateLayout::Family1Ah
    );
    assert_eq!(
        PStateLayout::for_family(CpuFamily::FAMILY_17H),
        PStateLayout::Family17h
    );
    assert_eq!(
        PStateLayout::for_family(CpuFamily::FAMILY_19H),
        PStateLayout::Family17h
    );
    assert_eq!(
        PStateLayout::for_family(CpuFamily::new(0x15)),
        PStateLayout::Family17h
    );
    assert_eq!(CpuFamily::FAMILY_1AH.to_string(), "1Ah");
}

#[test]
fn slots_map_to_consecutive_registers() {
    let registers = PStateSlot::all()
        .map(|slot| slot.register_id())
        .collect::<Vec<_>>();

    assert_eq!(registers.len(), 8);
    assert_eq!(registers[0], 0xC0010064);
    assert_eq!(registers[7], 0xC001006B);
    assert_eq!(PStateSlot::new(3).unwrap().to_string(), "P3");
    assert_eq!(
        PStateSlot::try_from(8),
        Err(PStateError::invalid_slot(8, 8))
    );
}
