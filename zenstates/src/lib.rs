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

mod c_state;
mod cpb;
pub mod cppc;
mod errors;
pub mod listing;
pub mod operating_point;
pub mod registers;
mod tsc;
mod zen_states;

pub use errors::ZenStatesError;
pub use errors::ZenStatesResult;
pub use listing::StateListing;
pub use operating_point::PStateOutcome;
pub use operating_point::PStateRequest;
pub use operating_point::TscLock;
pub use zen_states::ZenStates;

pub use zenstates_msr::MSRDevice;
pub use zenstates_msr::MSRTarget;
pub use zenstates_pstate::CpuFamily;
pub use zenstates_pstate::PState;
pub use zenstates_pstate::PStateLayout;
pub use zenstates_pstate::PStateSlot;
pub use zenstates_shared::types::LogicalCoreId;
