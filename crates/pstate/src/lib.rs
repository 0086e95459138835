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

//! Encoding and decoding of the `PStateDef` registers (`MSRC001_0064..=MSRC001_006B`).
//!
//! Two register layouts exist: family 1Ah parts (Zen 5) and everything before them.
//! The layout is chosen once from the CPU family and then passed explicitly to
//! every codec call, so all functions here are pure.

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

mod bit_field;
mod errors;
mod family;
mod layout;
mod pstate;
mod slot;

#[cfg(test)]
mod tests;

pub use bit_field::BitField;
pub use errors::PStateError;
pub use family::CpuFamily;
pub use layout::PStateField;
pub use layout::PStateLayout;
pub use pstate::PState;
pub use pstate::PStateFields;
pub use slot::PStateSlot;

pub type PStateResult<T> = Result<T, PStateError>;
