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

use crate::BitField;
use crate::CpuFamily;
use crate::PState;
use crate::PStateError;
use crate::PStateFields;
use crate::PStateResult;

/// Bits[63]: PstateEn.
const PSTATE_ENABLED: BitField = BitField::new(63, 1);

mod family_1ah {
    use crate::BitField;

    /// Bits[11:0]: CpuFid[11:0]. Values below 0x010 are reserved.
    pub(super) const FID: BitField = BitField::new(0, 12);
    pub(super) const FID_MIN: u64 = 0x010;
    /// Bits[21:14]: CpuVid[7:0].
    pub(super) const VID_LOW: BitField = BitField::new(14, 8);
    /// Bits[32]: CpuVid[8].
    pub(super) const VID_HIGH: BitField = BitField::new(32, 1);
    pub(super) const VID_MAX: u64 = 0x1FF;
}

mod family_17h {
    use crate::BitField;

    /// Bits[7:0]: CpuFid[7:0]. Values below 0x10 are reserved.
    pub(super) const FID: BitField = BitField::new(0, 8);
    pub(super) const FID_MIN: u64 = 0x10;
    /// Bits[13:8]: CpuDfsId. 0 is not a divisor.
    pub(super) const DID: BitField = BitField::new(8, 6);
    pub(super) const DID_MIN: u64 = 1;
    /// Bits[21:14]: CpuVid[7:0].
    pub(super) const VID: BitField = BitField::new(14, 8);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PStateField {
    /// Core frequency id.
    Fid,
    /// Core divisor id, absent on family 1Ah.
    Did,
    /// Core voltage id.
    Vid,
}

/// Bit layout of a `PStateDef` register.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PStateLayout {
    /// 12-bit FID in 5 MHz steps, 9-bit VID split over bits 21:14 and 32, no DID.
    Family1Ah,
    /// FID/DID/VID layout used by family 17h, 19h and every other family.
    Family17h,
}

impl PStateLayout {
    pub fn for_family(family: CpuFamily) -> Self {
        if family == CpuFamily::FAMILY_1AH {
            PStateLayout::Family1Ah
        } else {
            PStateLayout::Family17h
        }
    }

    /// The smallest value a field accepts, `None` if the field doesn't exist.
    pub fn field_min(&self, field: PStateField) -> Option<u64> {
        use PStateField::*;
        use PStateLayout::*;

        match (self, field) {
            (Family1Ah, Fid) => Some(family_1ah::FID_MIN),
            (Family1Ah, Did) => None,
            (Family17h, Fid) => Some(family_17h::FID_MIN),
            (Family17h, Did) => Some(family_17h::DID_MIN),
            (_, Vid) => Some(0),
        }
    }

    /// The largest value a field accepts, `None` if the field doesn't exist.
    pub fn field_max(&self, field: PStateField) -> Option<u64> {
        use PStateField::*;
        use PStateLayout::*;

        match (self, field) {
            (Family1Ah, Fid) => Some(family_1ah::FID.max_value()),
            (Family1Ah, Did) => None,
            (Family1Ah, Vid) => Some(family_1ah::VID_MAX),
            (Family17h, Fid) => Some(family_17h::FID.max_value()),
            (Family17h, Did) => Some(family_17h::DID.max_value()),
            (Family17h, Vid) => Some(family_17h::VID.max_value()),
        }
    }

    pub fn is_enabled(&self, raw: u64) -> bool {
        PSTATE_ENABLED.extract(raw) != 0
    }

    /// A register with PstateEn clear decodes to [`PState::Disabled`] whatever
    /// the other bits hold.
    pub fn decode(&self, raw: u64) -> PStateResult<PState> {
        if !self.is_enabled(raw) {
            return Ok(PState::Disabled);
        }

        let fields = match self {
            PStateLayout::Family1Ah => {
                let vid = family_1ah::VID_LOW.extract(raw) | (family_1ah::VID_HIGH.extract(raw) << 8);
                PStateFields::Family1Ah {
                    fid: family_1ah::FID.extract(raw) as u32,
                    vid: vid as u32,
                }
            }
            PStateLayout::Family17h => {
                let did = NonZeroU32::new(family_17h::DID.extract(raw) as u32).ok_or_else(|| {
                    tracing::debug!("P-state register {raw:#018X} has a zero divisor id");
                    PStateError::ZeroDivisorId
                })?;
                PStateFields::Family17h {
                    fid: family_17h::FID.extract(raw) as u32,
                    did,
                    vid: family_17h::VID.extract(raw) as u32,
                }
            }
        };

        Ok(PState::Enabled(fields))
    }

    pub fn set_enabled(&self, raw: u64, enabled: bool) -> u64 {
        if enabled {
            raw | PSTATE_ENABLED.mask()
        } else {
            raw & !PSTATE_ENABLED.mask()
        }
    }

    /// Replaces one field of `raw`, bits outside of the field stay untouched.
    /// Values outside of `field_min..=field_max` are rejected.
    pub fn set_field(&self, raw: u64, field: PStateField, value: u32) -> PStateResult<u64> {
        use PStateField::*;
        use PStateLayout::*;

        let (Some(min), Some(max)) = (self.field_min(field), self.field_max(field)) else {
            return Err(PStateError::unsupported_on_layout(field, *self));
        };
        let value = u64::from(value);
        if !(min..=max).contains(&value) {
            return Err(PStateError::value_out_of_range(field, value, min, max));
        }

        let updated = match (self, field) {
            (Family1Ah, Fid) => family_1ah::FID.splice(raw, value),
            (Family1Ah, Did) => None,
            (Family1Ah, Vid) => family_1ah::VID_LOW
                .splice(raw, value & 0xFF)
                .and_then(|raw| family_1ah::VID_HIGH.splice(raw, value >> 8)),
            (Family17h, Fid) => family_17h::FID.splice(raw, value),
            (Family17h, Did) => family_17h::DID.splice(raw, value),
            (Family17h, Vid) => family_17h::VID.splice(raw, value),
        };

        updated.ok_or_else(|| PStateError::value_out_of_range(field, value, min, max))
    }
}

impl std::fmt::Display for PStateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PStateField::Fid => write!(f, "FID"),
            PStateField::Did => write!(f, "DID"),
            PStateField::Vid => write!(f, "VID"),
        }
    }
}

impl std::fmt::Display for PStateLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PStateLayout::Family1Ah => write!(f, "family 1Ah"),
            PStateLayout::Family17h => write!(f, "family 17h/19h"),
        }
    }
}
