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
use zenstates_msr::MSRItem;
use zenstates_msr::MSRResult;
use zenstates_msr::MSRTarget;
use zenstates_shared::types::LogicalCoreId;

use crate::operating_point::TscLock;
use crate::registers::HwcrFlags;
use crate::registers::HWCR;

pub(crate) fn is_tsc_locked(msr: &impl MSRAccess, core_id: LogicalCoreId) -> MSRResult<bool> {
    let hwcr = HwcrFlags::from_bits_retain(msr.read(HWCR, core_id)?);
    Ok(hwcr.contains(HwcrFlags::LOCK_TSC_TO_CURRENT_P0))
}

/// Locks the TSC to the current P0 frequency on every core, unless the read
/// core reports it's already locked. The lock can't be undone without a reset.
pub(crate) fn ensure_tsc_locked(
    msr: &impl MSRAccess,
    read_core: LogicalCoreId,
) -> MSRResult<TscLock> {
    if is_tsc_locked(msr, read_core)? {
        tracing::debug!("TSC frequency is already locked");
        return Ok(TscLock::AlreadyLocked);
    }

    tracing::info!("Locking TSC frequency on all cores");
    let lock = MSRItem::bits(HWCR, HwcrFlags::LOCK_TSC_TO_CURRENT_P0.bits(), true);
    msr.apply(lock, MSRTarget::AllCores)?;

    Ok(TscLock::LockedNow)
}
