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

//! Access to model-specific registers through the per-core `/dev/cpu/<id>/msr` device
//! files exposed by the Linux `msr` kernel module. On other platforms the device
//! backend refuses to start, while the [`MSRAccess`] seam stays available for
//! in-memory implementations.

#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![deny(
    dead_code,
    nonstandard_style,
    unused_imports,
    unused_mut,
    unused_variables,
    unused_unsafe,
    unreachable_patterns
)]

#[cfg(target_os = "linux")]
#[path = "linux/mod.rs"]
mod msr_impl;
#[cfg(not(target_os = "linux"))]
#[path = "other/mod.rs"]
mod msr_impl;

mod errors;
mod msr_item;
mod target;


use nonempty::NonEmpty;

use zenstates_shared::types::LogicalCoreId;

pub use errors::MSRError;
pub use msr_impl::*;
pub use msr_item::MSRItem;
pub use target::MSRTarget;

pub type MSRResult<T> = Result<T, MSRError>;

/// Default location of the per-core msr device nodes.
pub const DEFAULT_DEVICE_DIR: &str = "/dev/cpu";

/// Register access for a fixed set of discovered logical cores.
///
/// Every call is an independent open-access-close sequence; nothing is cached
/// between calls and writes to several cores are never rolled back.
pub trait MSRAccess {
    /// Cores known to this backend, in discovery order.
    fn cores(&self) -> &NonEmpty<LogicalCoreId>;

    fn read(&self, register_id: u32, core_id: LogicalCoreId) -> MSRResult<u64>;

    fn write(&self, register_id: u32, value: u64, core_id: LogicalCoreId) -> MSRResult<()>;

    /// Writes the same value either to a single core or to every discovered core.
    fn write_to(&self, register_id: u32, value: u64, target: MSRTarget) -> MSRResult<()> {
        for core_id in target.resolve(self.cores()) {
            self.write(register_id, value, core_id)?;
        }

        Ok(())
    }

    /// Applies an item to the target cores as a read-modify-write of each
    /// core's own register value.
    fn apply(&self, item: MSRItem, target: MSRTarget) -> MSRResult<()> {
        for core_id in target.resolve(self.cores()) {
            let old_value = self.read(item.register_id(), core_id)?;
            let value_to_write = MSRItem::masked_value(old_value, item.value(), item.mask());

            tracing::debug!(
                "Write MSR register_id {:#X} value {:#X} at logical CPU {}",
                item.register_id(),
                value_to_write,
                core_id
            );
            self.write(item.register_id(), value_to_write, core_id)?;
        }

        Ok(())
    }
}
