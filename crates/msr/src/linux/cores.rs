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

use std::path::Path;

use nonempty::NonEmpty;

use zenstates_shared::types::LogicalCoreId;

use crate::MSRError;
use crate::MSRResult;

/// Lists the logical cores that expose an `msr` node under `device_dir`,
/// sorted by core id.
pub fn discover_cores(device_dir: &Path) -> MSRResult<NonEmpty<LogicalCoreId>> {
    use std::io::ErrorKind;

    let entries = match std::fs::read_dir(device_dir) {
        Ok(entries) => entries,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(MSRError::device_unavailable(device_dir))
        }
        Err(error) => return Err(MSRError::core_discovery(device_dir, error)),
    };

    let mut core_ids = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let core_id = entry.file_name().to_str()?.parse::<u32>().ok()?;
            entry
                .path()
                .join("msr")
                .exists()
                .then_some(LogicalCoreId::new(core_id))
        })
        .collect::<Vec<_>>();
    core_ids.sort_unstable();

    tracing::debug!("Discovered MSR devices for cores {core_ids:?} in {device_dir:?}");

    NonEmpty::from_vec(core_ids).ok_or_else(|| MSRError::device_unavailable(device_dir))
}
