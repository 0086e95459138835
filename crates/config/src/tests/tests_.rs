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

use std::path::PathBuf;

use test_log::test;
use tracing_subscriber::filter::LevelFilter;

use zenstates_pstate::CpuFamily;
use zenstates_shared::types::LogicalCoreId;

use crate::config_loader::load_config;
use crate::Cpu;
use crate::Logs;
use crate::MSRConfig;
use crate::ZenStatesConfig;

fn fixture(name: &str) -> PathBuf {
    let mut manifest_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    manifest_path.push("src/tests");
    manifest_path.push(name);
    manifest_path
}

#[test]
fn parse_basic_config() {
    let actual_config = load_config(Some(fixture("default.toml").as_path())).unwrap();

    let expected_config = ZenStatesConfig {
        logs: Logs {
            log_level: LevelFilter::DEBUG,
        },
        msr: MSRConfig {
            device_dir: "/tmp/zenstates/cpu".into(),
            read_core: LogicalCoreId::new(3),
        },
        cpu: Cpu {
            family: Some(CpuFamily::FAMILY_1AH),
        },
    };

    assert_eq!(actual_config, expected_config);
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let actual_config = load_config(Some(fixture("partial.toml").as_path())).unwrap();

    let expected_config = ZenStatesConfig {
        msr: MSRConfig {
            read_core: LogicalCoreId::new(1),
            ..ZenStatesConfig::default().msr
        },
        ..ZenStatesConfig::default()
    };

    assert_eq!(actual_config, expected_config);
}

#[test]
fn default_config_uses_dev_cpu() {
    let config = ZenStatesConfig::default();

    assert_eq!(config.logs.log_level, LevelFilter::WARN);
    assert_eq!(config.msr.device_dir, PathBuf::from("/dev/cpu"));
    assert_eq!(config.msr.read_core, LogicalCoreId::new(0));
    assert_eq!(config.cpu.family, None);
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = load_config(Some(dir.path().join("absent.toml").as_path()));

    assert!(result.is_err());
}

#[test]
fn unknown_log_level_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logs]\nlog-level = \"loud\"\n").unwrap();

    let result = load_config(Some(path.as_path()));

    assert!(result.is_err());
}
