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

use std::fs::File;
use std::path::Path;

use nix::errno::Errno;
use nix::libc::off_t;

use zenstates_shared::types::LogicalCoreId;

use crate::MSRError;
use crate::MSRResult;

const MSR_VALUE_SIZE: usize = std::mem::size_of::<u64>();

enum MSRFileOpMode {
    MSRRead,
    MSRWrite,
}

pub(crate) fn read_msr(path: &Path, register_id: u32, core_id: LogicalCoreId) -> MSRResult<u64> {
    use nix::sys::uio::pread;

    let file = open_msr(path, core_id, MSRFileOpMode::MSRRead)?;

    let mut value = [0u8; MSR_VALUE_SIZE];
    let offset = register_offset(register_id, core_id)?;
    let bytes = pread(&file, &mut value, offset)
        .map_err(|errno| MSRError::read(register_id, core_id, errno))?;
    if bytes != MSR_VALUE_SIZE {
        return Err(MSRError::short_read(register_id, core_id, bytes));
    }
    let result = u64::from_le_bytes(value);

    tracing::debug!("Read MSR register_id {register_id:#X} value {result:#X} at core id {core_id}");

    Ok(result)
}

pub(crate) fn write_msr(
    path: &Path,
    register_id: u32,
    value: u64,
    core_id: LogicalCoreId,
) -> MSRResult<()> {
    use nix::sys::uio::pwrite;

    let file = open_msr(path, core_id, MSRFileOpMode::MSRWrite)?;

    let value_as_bytes = value.to_le_bytes();
    let offset = register_offset(register_id, core_id)?;
    let bytes = pwrite(&file, &value_as_bytes, offset)
        .map_err(|errno| MSRError::write(value, register_id, core_id, errno))?;
    if bytes != MSR_VALUE_SIZE {
        return Err(MSRError::short_write(register_id, core_id, bytes));
    }

    tracing::debug!("Wrote MSR register_id {register_id:#X} value {value:#X} at core id {core_id}");

    Ok(())
}

/// The register id is the file offset; it must fit `off_t` on 32-bit targets too.
fn register_offset(register_id: u32, core_id: LogicalCoreId) -> MSRResult<off_t> {
    off_t::try_from(register_id)
        .map_err(|_| MSRError::read(register_id, core_id, Errno::EOVERFLOW))
}

fn open_msr(path: &Path, core_id: LogicalCoreId, mode: MSRFileOpMode) -> MSRResult<File> {
    use std::fs::OpenOptions;

    match mode {
        MSRFileOpMode::MSRRead => OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|error| MSRError::open(core_id, path, false, error)),
        MSRFileOpMode::MSRWrite => OpenOptions::new()
            .write(true)
            .open(path)
            .map_err(|error| MSRError::open(core_id, path, true, error)),
    }
}
