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

use crate::PStateError;
use crate::PStateResult;

/// The eight `PStateDef` registers live at consecutive addresses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PStateSlot(u8);

impl PStateSlot {
    pub const COUNT: u8 = 8;
    /// MSRC001_0064, P-state 0.
    pub const BASE_REGISTER: u32 = 0xC0010064;

    pub fn new(index: u8) -> PStateResult<Self> {
        if index >= Self::COUNT {
            return Err(PStateError::invalid_slot(index, Self::COUNT));
        }

        Ok(Self(index))
    }

    pub fn all() -> impl Iterator<Item = PStateSlot> {
        (0..Self::COUNT).map(PStateSlot)
    }

    pub fn index(&self) -> u8 {
        self.0
    }

    pub fn register_id(&self) -> u32 {
        Self::BASE_REGISTER + u32::from(self.0)
    }
}

impl TryFrom<u8> for PStateSlot {
    type Error = PStateError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl std::fmt::Display for PStateSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.0)
    }
}
