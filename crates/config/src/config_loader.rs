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

use std::path::Path;

use config::Config;
use config::Environment;
use config::File;
use config::FileFormat;
use eyre::Context;

use crate::unresolved_config::UnresolvedZenStatesConfig;
use crate::ZenStatesConfig;

/// Loads the config from an optional TOML file, `ZENSTATES_*` environment
/// variables take precedence over the file (e.g. `ZENSTATES_MSR__READ_CORE=2`).
pub fn load_config(path: Option<&Path>) -> eyre::Result<ZenStatesConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        let config_source = File::from(path).required(true).format(FileFormat::Toml);
        builder = builder.add_source(config_source);
    }

    let environment_source = Environment::with_prefix("ZENSTATES")
        .prefix_separator("_")
        .separator("__");
    let config = builder
        .add_source(environment_source)
        .build()
        .with_context(|| format!("Failed to load config from {path:?}"))?;

    let config: UnresolvedZenStatesConfig = config
        .try_deserialize()
        .with_context(|| format!("Failed to parse config at {path:?}"))?;
    Ok(config.resolve())
}
