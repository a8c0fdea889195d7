// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Host configuration: runtime options plus benchmark selection.
//!
//! # TOML Format
//! ```toml
//! gpu_perf_hint = 3
//! gpu_priority_hint = 3
//! omp_num_threads = 4
//! cpu_power_option = 1
//! pattern = ".*REGION.*"
//! min_time_ms = 200
//! strict = true
//! ```
//!
//! Keys present in a file replace the corresponding command-line values;
//! absent keys keep them.

use anyhow::Context;
use runtime_config::RuntimeOptions;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HostConfig {
    #[serde(flatten)]
    pub runtime: RuntimeOptions,
    pub pattern: String,
    pub min_time_ms: u64,
    pub strict: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeOptions::default(),
            pattern: bench_harness::ALL.to_string(),
            min_time_ms: 500,
            strict: false,
        }
    }
}

impl HostConfig {
    /// Overlays the keys of a TOML file onto `self`.
    pub fn merge_file(self, path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        self.merge_toml(&content)
            .with_context(|| format!("invalid config '{}'", path.display()))
    }

    /// Overlays the keys of a TOML document onto `self`.
    pub fn merge_toml(self, toml_str: &str) -> anyhow::Result<Self> {
        let overrides: toml::Table = toml::from_str(toml_str)?;
        let mut merged = toml::Table::try_from(&self)?;
        for (key, value) in overrides {
            tracing::debug!("config file sets '{key}'");
            merged.insert(key, value);
        }
        Ok(toml::Value::Table(merged).try_into()?)
    }

    pub fn min_time(&self) -> Duration {
        Duration::from_millis(self.min_time_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = HostConfig::default();
        assert_eq!(c.pattern, "all");
        assert_eq!(c.min_time(), Duration::from_millis(500));
        assert!(!c.strict);
        assert_eq!(c.runtime.omp_num_threads, 1);
    }

    #[test]
    fn test_file_overrides_only_present_keys() {
        let cli = HostConfig {
            pattern: "MATMUL".into(),
            min_time_ms: 50,
            runtime: RuntimeOptions {
                omp_num_threads: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = cli
            .merge_toml("omp_num_threads = 8\nstrict = true\n")
            .unwrap();
        assert_eq!(merged.runtime.omp_num_threads, 8);
        assert!(merged.strict);
        assert_eq!(merged.pattern, "MATMUL");
        assert_eq!(merged.min_time_ms, 50);
        assert_eq!(merged.runtime.gpu_perf_hint, 3);
    }

    #[test]
    fn test_bad_value_type() {
        let err = HostConfig::default().merge_toml("min_time_ms = \"fast\"");
        assert!(err.is_err());
    }

    #[test]
    fn test_merge_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "pattern = \".*REGION.*\"\ncpu_power_option = 2\n").unwrap();
        let c = HostConfig::default().merge_file(&path).unwrap();
        assert_eq!(c.pattern, ".*REGION.*");
        assert_eq!(c.runtime.cpu_power_option, 2);

        assert!(HostConfig::default().merge_file(&dir.path().join("missing.toml")).is_err());
    }
}
