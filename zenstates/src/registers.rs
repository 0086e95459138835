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

//! Fixed register addresses and the bits this tool touches.

use bitflags::bitflags;

/// MSRC001_0015 [Hardware Configuration] (HWCR).
pub const HWCR: u32 = 0xC0010015;

/// MSRC001_0292 [Power Management Miscellaneous].
pub const POWER_MANAGEMENT_MISC: u32 = 0xC0010292;

/// MSRC001_0296 [C-state Configuration].
pub const CSTATE_CONFIG: u32 = 0xC0010296;

/// MSRC001_02B0 [CPPC Capability 1].
pub const CPPC_CAPABILITY_1: u32 = 0xC00102B0;

/// MSRC001_02B1 [CPPC Enable].
pub const CPPC_ENABLE: u32 = 0xC00102B1;

/// MSRC001_02B2 [CPPC Capability 2].
pub const CPPC_CAPABILITY_2: u32 = 0xC00102B2;

/// MSRC001_02B3 [CPPC Request].
pub const CPPC_REQUEST: u32 = 0xC00102B3;

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct HwcrFlags: u64 {
        /// Bits[21]: LockTscToCurrentP0. Once set, the TSC keeps counting at the
        /// P0 frequency of that moment; only a reset clears it.
        const LOCK_TSC_TO_CURRENT_P0 = 1 << 21;
        /// Bits[25]: CpbDis. 1 = core performance boost is disabled.
        const CPB_DIS = 1 << 25;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct PowerManagementMiscFlags: u64 {
        const PACKAGE_C6_ENABLE = 1 << 32;
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CStateConfigFlags: u64 {
        const CCR0_CC6_ENABLE = 1 << 6;
        const CCR1_CC6_ENABLE = 1 << 14;
        const CCR2_CC6_ENABLE = 1 << 22;
    }
}
