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

use crate::PStateField;
use crate::PStateLayout;
use crate::PStateResult;

const FAMILY_1AH_FID_STEP_MHZ: f64 = 5.0;

const REFERENCE_CLOCK_MHZ: f64 = 100.0;
const FID_MULTIPLIER: f64 = 25.0;
const DID_DIVISOR: f64 = 12.5;

const VID_BASE_VOLTAGE: f64 = 1.55;
const VID_STEP_VOLTAGE: f64 = 0.00625;

/// A decoded `PStateDef` register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PState {
    Disabled,
    Enabled(PStateFields),
}

/// Integer fields of an enabled P-state. Frequency and voltage are always
/// derived from them on demand.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PStateFields {
    Family1Ah { fid: u32, vid: u32 },
    Family17h { fid: u32, did: NonZeroU32, vid: u32 },
}

impl PState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, PState::Enabled(_))
    }

    pub fn fields(&self) -> Option<&PStateFields> {
        match self {
            PState::Disabled => None,
            PState::Enabled(fields) => Some(fields),
        }
    }
}

impl PStateFields {
    pub fn layout(&self) -> PStateLayout {
        match self {
            PStateFields::Family1Ah { .. } => PStateLayout::Family1Ah,
            PStateFields::Family17h { .. } => PStateLayout::Family17h,
        }
    }

    pub fn fid(&self) -> u32 {
        match self {
            PStateFields::Family1Ah { fid, .. } | PStateFields::Family17h { fid, .. } => *fid,
        }
    }

    pub fn did(&self) -> Option<u32> {
        match self {
            PStateFields::Family1Ah { .. } => None,
            PStateFields::Family17h { did, .. } => Some(did.get()),
        }
    }

    pub fn vid(&self) -> u32 {
        match self {
            PStateFields::Family1Ah { vid, .. } | PStateFields::Family17h { vid, .. } => *vid,
        }
    }

    /// Core frequency in MHz.
    ///
    /// The VCO/1 and VCO/1.125 divisor cases of family 17h parts are not
    /// special-cased, the plain `FID * 25 / (DID / 8)` ratio is used for every DID.
    pub fn frequency_mhz(&self) -> f64 {
        match self {
            PStateFields::Family1Ah { fid, .. } => FAMILY_1AH_FID_STEP_MHZ * f64::from(*fid),
            PStateFields::Family17h { fid, did, .. } => {
                REFERENCE_CLOCK_MHZ * FID_MULTIPLIER * f64::from(*fid)
                    / (DID_DIVISOR * f64::from(did.get()))
            }
        }
    }

    /// Core voltage in volts, family 1Ah registers don't describe it.
    pub fn voltage(&self) -> Option<f64> {
        match self {
            PStateFields::Family1Ah { .. } => None,
            PStateFields::Family17h { vid, .. } => {
                Some(VID_BASE_VOLTAGE - VID_STEP_VOLTAGE * f64::from(*vid))
            }
        }
    }

    /// Stores the fields into `raw` and marks the P-state enabled.
    pub fn encode(&self, raw: u64) -> PStateResult<u64> {
        let layout = self.layout();

        let raw = layout.set_enabled(raw, true);
        let raw = layout.set_field(raw, PStateField::Fid, self.fid())?;
        let raw = match self.did() {
            Some(did) => layout.set_field(raw, PStateField::Did, did)?,
            None => raw,
        };
        layout.set_field(raw, PStateField::Vid, self.vid())
    }
}

impl std::fmt::Display for PStateFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PStateFields::Family1Ah { fid, vid } => write!(
                f,
                "Enabled - FID = {fid:X} - VID = {vid:X} - Freq = {:.2} MHz",
                self.frequency_mhz()
            ),
            PStateFields::Family17h { fid, did, vid } => write!(
                f,
                "Enabled - FID = {fid:X} - DID = {:X} - VID = {vid:X} - Freq = {:.2} MHz - vCore = {:.5}",
                did.get(),
                self.frequency_mhz(),
                self.voltage().unwrap_or_default()
            ),
        }
    }
}

impl std::fmt::Display for PState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PState::Disabled => write!(f, "Disabled"),
            PState::Enabled(fields) => std::fmt::Display::fmt(fields, f),
        }
    }
}
