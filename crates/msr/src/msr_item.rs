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

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MSRItem {
    register_id: u32,
    value: u64,
    mask: u64,
}

impl MSRItem {
    /// Only the bits set in `mask` are taken from `value`, the rest is kept
    /// from the current register contents.
    pub fn with_mask(register_id: u32, value: u64, mask: u64) -> Self {
        Self {
            register_id,
            value,
            mask,
        }
    }

    /// Sets (`enabled == true`) or clears every bit of `bits`.
    pub fn bits(register_id: u32, bits: u64, enabled: bool) -> Self {
        let value = if enabled { bits } else { 0 };
        Self::with_mask(register_id, value, bits)
    }

    pub fn register_id(&self) -> u32 {
        self.register_id
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn masked_value(old_value: u64, new_value: u64, mask: u64) -> u64 {
        (new_value & mask) | (old_value & !mask)
    }
}
