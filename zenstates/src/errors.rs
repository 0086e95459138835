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

use thiserror::Error as ThisError;

use zenstates_msr::MSRError;
use zenstates_pstate::PStateError;

#[derive(ThisError, Debug)]
pub enum ZenStatesError {
    #[error(transparent)]
    MSR(#[from] MSRError),

    #[error(transparent)]
    PState(#[from] PStateError),
}

pub type ZenStatesResult<T> = Result<T, ZenStatesError>;
