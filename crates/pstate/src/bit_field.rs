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

/// A contiguous run of bits inside a 64-bit register value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitField {
    offset: u32,
    width: u32,
}

impl BitField {
    pub const fn new(offset: u32, width: u32) -> Self {
        assert!(width > 0 && offset + width <= u64::BITS);
        Self { offset, width }
    }

    /// The largest value the field can hold.
    pub const fn max_value(&self) -> u64 {
        u64::MAX >> (u64::BITS - self.width)
    }

    /// The field bits in their register position.
    pub const fn mask(&self) -> u64 {
        self.max_value() << self.offset
    }

    pub const fn extract(&self, raw: u64) -> u64 {
        (raw & self.mask()) >> self.offset
    }

    /// Clears the field in `raw` and stores `value` there, every other bit is kept.
    /// Returns `None` when `value` doesn't fit into the field.
    pub const fn splice(&self, raw: u64, value: u64) -> Option<u64> {
        if value > self.max_value() {
            return None;
        }

        Some((raw & !self.mask()) | (value << self.offset))
    }
}
