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

use crate::PStateResult;

/// CPU family as reported by CPUID, extended family already folded in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CpuFamily(u32);

impl CpuFamily {
    /// Zen, Zen+ and Zen 2.
    pub const FAMILY_17H: Self = Self(0x17);
    /// Zen 3 and Zen 4.
    pub const FAMILY_19H: Self = Self(0x19);
    /// Zen 5.
    pub const FAMILY_1AH: Self = Self(0x1A);

    pub const fn new(family_id: u32) -> Self {
        Self(family_id)
    }

    pub const fn id(&self) -> u32 {
        self.0
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    pub fn detect() -> PStateResult<Self> {
        use crate::PStateError;
        use raw_cpuid::CpuId;

        let cpuid = CpuId::new();
        match cpuid.get_vendor_info() {
            Some(vendor_info) if vendor_info.as_str() == "AuthenticAMD" => {}
            Some(vendor_info) => tracing::warn!(
                "CPU vendor {} is not AuthenticAMD, P-state registers may be absent",
                vendor_info.as_str()
            ),
            None => tracing::warn!("CPUID doesn't report the CPU vendor"),
        }

        let feature_info = cpuid
            .get_feature_info()
            .ok_or(PStateError::FamilyNotDetected)?;
        let family = Self(u32::from(feature_info.family_id()));
        tracing::debug!(
            "Detected CPU family {family} model {:#X}",
            feature_info.model_id()
        );

        Ok(family)
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    pub fn detect() -> PStateResult<Self> {
        Err(crate::PStateError::UnsupportedPlatform)
    }
}

impl std::fmt::Display for CpuFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:X}h", self.0)
    }
}
