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

use nonempty::NonEmpty;

use zenstates_shared::types::LogicalCoreId;

/// Selects the cores a write goes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MSRTarget {
    /// Every discovered core, in discovery order.
    AllCores,
    Core(LogicalCoreId),
}

impl MSRTarget {
    pub fn resolve(&self, cores: &NonEmpty<LogicalCoreId>) -> Vec<LogicalCoreId> {
        match self {
            MSRTarget::AllCores => cores.iter().copied().collect(),
            MSRTarget::Core(core_id) => vec![*core_id],
        }
    }
}

impl std::fmt::Display for MSRTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MSRTarget::AllCores => write!(f, "all cores"),
            MSRTarget::Core(core_id) => write!(f, "core {core_id}"),
        }
    }
}
