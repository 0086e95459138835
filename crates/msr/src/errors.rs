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

#[cfg(target_os = "linux")]
use std::path::Path;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error as ThisError;

use zenstates_shared::types::LogicalCoreId;

#[derive(ThisError, Debug)]
pub enum MSRError {
    #[error("permission denied while opening MSR file {path:?} (try running as root)")]
    PermissionDenied {
        core_id: LogicalCoreId,
        path: PathBuf,
    },

    #[error("MSR device {path:?} is not available (is the msr module loaded? run modprobe msr)")]
    DeviceUnavailable { path: PathBuf },

    #[error("opening MSR file {path:?} for read there is an error: {io_error:?}")]
    OpenForRead {
        path: PathBuf,
        io_error: std::io::Error,
    },

    #[error("opening MSR file {path:?} for write there is an error: {io_error:?}")]
    OpenForWrite {
        path: PathBuf,
        io_error: std::io::Error,
    },

    #[error("reading register {register_id:#X} at core {core_id} there is an error: {errno:?}")]
    Read {
        register_id: u32,
        core_id: LogicalCoreId,
        errno: Errno,
    },

    #[error(
        "writing value {value:#X} into register {register_id:#X} at core {core_id} there is an error: {errno:?}"
    )]
    Write {
        value: u64,
        register_id: u32,
        core_id: LogicalCoreId,
        errno: Errno,
    },

    #[error("reading register {register_id:#X} at core {core_id} returned {bytes} bytes instead of 8")]
    ShortRead {
        register_id: u32,
        core_id: LogicalCoreId,
        bytes: usize,
    },

    #[error("writing register {register_id:#X} at core {core_id} stored {bytes} bytes instead of 8")]
    ShortWrite {
        register_id: u32,
        core_id: LogicalCoreId,
        bytes: usize,
    },

    #[error("listing MSR devices in {dir:?} there is an error: {io_error:?}")]
    CoreDiscovery {
        dir: PathBuf,
        io_error: std::io::Error,
    },

    #[error("MSR access through the msr device is supported on Linux only")]
    UnsupportedPlatform,
}

#[cfg(target_os = "linux")]
impl MSRError {
    /// Classifies an error of opening a per-core msr file.
    pub(crate) fn open(
        core_id: LogicalCoreId,
        path: &Path,
        for_write: bool,
        io_error: std::io::Error,
    ) -> Self {
        use std::io::ErrorKind;

        let path = path.to_path_buf();
        match io_error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied { core_id, path },
            ErrorKind::NotFound => Self::DeviceUnavailable { path },
            _ if for_write => Self::OpenForWrite { path, io_error },
            _ => Self::OpenForRead { path, io_error },
        }
    }

    pub(crate) fn read(register_id: u32, core_id: LogicalCoreId, errno: Errno) -> Self {
        Self::Read {
            register_id,
            core_id,
            errno,
        }
    }

    pub(crate) fn write(value: u64, register_id: u32, core_id: LogicalCoreId, errno: Errno) -> Self {
        Self::Write {
            value,
            register_id,
            core_id,
            errno,
        }
    }

    pub(crate) fn short_read(register_id: u32, core_id: LogicalCoreId, bytes: usize) -> Self {
        Self::ShortRead {
            register_id,
            core_id,
            bytes,
        }
    }

    pub(crate) fn short_write(register_id: u32, core_id: LogicalCoreId, bytes: usize) -> Self {
        Self::ShortWrite {
            register_id,
            core_id,
            bytes,
        }
    }

    pub(crate) fn device_unavailable(path: impl Into<PathBuf>) -> Self {
        Self::DeviceUnavailable { path: path.into() }
    }

    pub(crate) fn core_discovery(dir: impl Into<PathBuf>, io_error: std::io::Error) -> Self {
        Self::CoreDiscovery {
            dir: dir.into(),
            io_error,
        }
    }
}

impl MSRError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    pub fn is_device_unavailable(&self) -> bool {
        matches!(self, Self::DeviceUnavailable { .. })
    }
}
