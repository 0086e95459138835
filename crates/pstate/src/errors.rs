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

use crate::PStateField;
use crate::PStateLayout;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum PStateError {
    #[error("{field} is not a part of the P-state register on {layout}")]
    UnsupportedOnLayout {
        field: PStateField,
        layout: PStateLayout,
    },

    #[error("{field} value {value:#X} is out of range {min:#X}..={max:#X}")]
    ValueOutOfRange {
        field: PStateField,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("P-state divisor id is 0, the frequency is undefined")]
    ZeroDivisorId,

    #[error("P-state index {index} is out of range, there are {count} P-states")]
    InvalidSlot { index: u8, count: u8 },

    #[error("CPUID doesn't report the CPU family")]
    FamilyNotDetected,

    #[error("CPU family detection is supported on x86 only")]
    UnsupportedPlatform,
}

impl PStateError {
    pub fn unsupported_on_layout(field: PStateField, layout: PStateLayout) -> Self {
        Self::UnsupportedOnLayout { field, layout }
    }

    pub fn value_out_of_range(field: PStateField, value: u64, min: u64, max: u64) -> Self {
        Self::ValueOutOfRange {
            field,
            value,
            min,
            max,
        }
    }

    pub fn invalid_slot(index: u8, count: u8) -> Self {
        Self::InvalidSlot { index, count }
    }
}
