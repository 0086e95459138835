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

use std::cell::RefCell;
use std::collections::HashMap;

use nix::errno::Errno;
use nonempty::NonEmpty;

use zenstates_msr::MSRAccess;
use zenstates_msr::MSRError;
use zenstates_msr::MSRResult;
use zenstates_shared::types::LogicalCoreId;

/// A write that reached the in-memory registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MSRWrite {
    pub register_id: u32,
    pub value: u64,
    pub core_id: LogicalCoreId,
}

/// Register file kept in memory. Reading a register that was never set fails
/// with `EIO` the same way the kernel msr driver does for absent registers.
#[derive(Debug)]
pub struct InMemoryMSR {
    cores: NonEmpty<LogicalCoreId>,
    registers: RefCell<HashMap<(LogicalCoreId, u32), u64>>,
    writes: RefCell<Vec<MSRWrite>>,
}

impl InMemoryMSR {
    /// Cores `0..cores_count`, at least one.
    pub fn new(cores_count: u32) -> Self {
        let mut cores = NonEmpty::new(LogicalCoreId::new(0));
        cores.extend((1..cores_count).map(LogicalCoreId::new));

        Self {
            cores,
            registers: RefCell::new(HashMap::new()),
            writes: RefCell::new(Vec::new()),
        }
    }

    /// Sets a register to the same value on every core.
    pub fn with_register(self, register_id: u32, value: u64) -> Self {
        for &core_id in self.cores.iter() {
            self.set(register_id, value, core_id);
        }
        self
    }

    /// Sets a register without recording a write.
    pub fn set(&self, register_id: u32, value: u64, core_id: LogicalCoreId) {
        self.registers
            .borrow_mut()
            .insert((core_id, register_id), value);
    }

    pub fn get(&self, register_id: u32, core_id: LogicalCoreId) -> Option<u64> {
        self.registers
            .borrow()
            .get(&(core_id, register_id))
            .copied()
    }

    pub fn writes(&self) -> Vec<MSRWrite> {
        self.writes.borrow().clone()
    }

    pub fn writes_to(&self, register_id: u32) -> Vec<MSRWrite> {
        self.writes
            .borrow()
            .iter()
            .filter(|write| write.register_id == register_id)
            .copied()
            .collect()
    }

    fn check_core(&self, core_id: LogicalCoreId) -> MSRResult<()> {
        if self.cores.iter().any(|&known| known == core_id) {
            return Ok(());
        }

        Err(MSRError::DeviceUnavailable {
            path: format!("/dev/cpu/{core_id}/msr").into(),
        })
    }
}

impl MSRAccess for InMemoryMSR {
    fn cores(&self) -> &NonEmpty<LogicalCoreId> {
        &self.cores
    }

    fn read(&self, register_id: u32, core_id: LogicalCoreId) -> MSRResult<u64> {
        self.check_core(core_id)?;
        self.get(register_id, core_id).ok_or(MSRError::Read {
            register_id,
            core_id,
            errno: Errno::EIO,
        })
    }

    fn write(&self, register_id: u32, value: u64, core_id: LogicalCoreId) -> MSRResult<()> {
        self.check_core(core_id)?;
        self.set(register_id, value, core_id);
        self.writes.borrow_mut().push(MSRWrite {
            register_id,
            value,
            core_id,
        });

        Ok(())
    }
}
