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

use zenstates_msr::MSRAccess;
use zenstates_msr::MSRTarget;
use zenstates_pstate::PStateError;
use zenstates_pstate::PStateField;
use zenstates_pstate::PStateLayout;
use zenstates_pstate::PStateResult;
use zenstates_pstate::PStateSlot;

use crate::tsc::ensure_tsc_locked;
use crate::ZenStates;
use crate::ZenStatesResult;


/// Requested changes of one P-state register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PStateRequest {
    pub slot: PStateSlot,
    pub enabled: Option<bool>,
    pub fid: Option<u32>,
    pub did: Option<u32>,
    pub vid: Option<u32>,
    /// Cores the new value is written to, the read core if not set.
    pub target: Option<MSRTarget>,
}

/// What happened to the TSC lock during a P-state update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TscLock {
    /// The register didn't change, so the lock wasn't checked.
    NotRequired,
    AlreadyLocked,
    LockedNow,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PStateOutcome {
    pub slot: PStateSlot,
    pub target: MSRTarget,
    pub before: u64,
    pub after: u64,
    pub tsc_lock: TscLock,
    /// Field updates the register layout doesn't support, nothing was written for them.
    pub skipped: Vec<PStateError>,
}

impl PStateRequest {
    pub fn new(slot: PStateSlot) -> Self {
        Self {
            slot,
            enabled: None,
            fid: None,
            did: None,
            vid: None,
            target: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn fid(mut self, fid: u32) -> Self {
        self.fid = Some(fid);
        self
    }

    pub fn did(mut self, did: u32) -> Self {
        self.did = Some(did);
        self
    }

    pub fn vid(mut self, vid: u32) -> Self {
        self.vid = Some(vid);
        self
    }

    pub fn target(mut self, target: MSRTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Applies the request to a register value in memory: enable flag first,
    /// then FID, DID and VID.
    pub fn modify(&self, layout: PStateLayout, raw: u64) -> PStateResult<(u64, Vec<PStateError>)> {
        let mut value = raw;
        let mut skipped = Vec::new();

        if let Some(enabled) = self.enabled {
            value = layout.set_enabled(value, enabled);
        }

        let updates = [
            (PStateField::Fid, self.fid),
            (PStateField::Did, self.did),
            (PStateField::Vid, self.vid),
        ];
        for (field, new_value) in updates {
            let Some(new_value) = new_value else {
                continue;
            };

            match layout.set_field(value, field, new_value) {
                Ok(updated) => value = updated,
                Err(error @ PStateError::UnsupportedOnLayout { .. }) => {
                    tracing::warn!("Skipping {field} update: {error}");
                    skipped.push(error);
                }
                Err(error) => return Err(error),
            }
        }

        Ok((value, skipped))
    }
}

impl PStateOutcome {
    pub fn is_changed(&self) -> bool {
        self.before != self.after
    }
}

impl<M: MSRAccess> ZenStates<M> {
    /// Read-modify-write of one P-state register.
    ///
    /// An unchanged value is never written and leaves the TSC alone. Otherwise
    /// the TSC is locked on every core before the new value reaches the target.
    pub fn apply_pstate(&self, request: &PStateRequest) -> ZenStatesResult<PStateOutcome> {
        let slot = request.slot;
        let register_id = slot.register_id();
        let target = request.target.unwrap_or(MSRTarget::Core(self.read_core));

        let before = self.msr.read(register_id, self.read_core)?;
        let (after, skipped) = request.modify(self.layout, before)?;

        if after == before {
            tracing::info!("{slot} register {before:#018X} is unchanged, skipping write");
            return Ok(PStateOutcome {
                slot,
                target,
                before,
                after,
                tsc_lock: TscLock::NotRequired,
                skipped,
            });
        }

        let tsc_lock = ensure_tsc_locked(&self.msr, self.read_core)?;

        tracing::info!("Writing {slot} register {before:#018X} -> {after:#018X} to {target}");
        self.msr.write_to(register_id, after, target)?;

        Ok(PStateOutcome {
            slot,
            target,
            before,
            after,
            tsc_lock,
            skipped,
        })
    }
}
