// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integer-coded runtime options as received from a host, loadable from
//! TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! gpu_perf_hint = 3      # 0:default 1:low 2:normal 3:high
//! gpu_priority_hint = 3  # 0:default 1:low 2:normal 3:high
//! omp_num_threads = 4    # >= 1
//! cpu_power_option = 1   # 0:default 1:high-performance 2:battery-save
//! ```

use crate::{ConfigError, CpuPowerPolicy, GpuPerfHint, GpuPriorityHint, RuntimeConfig};
use std::path::Path;

/// Raw host options. Validated by [`RuntimeOptions::to_config`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeOptions {
    pub gpu_perf_hint: i32,
    pub gpu_priority_hint: i32,
    pub omp_num_threads: i32,
    pub cpu_power_option: i32,
}

impl RuntimeOptions {
    /// Loads options from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ConfigFile(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses options from a TOML string. Missing keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str)
            .map_err(|e| ConfigError::ConfigFile(format!("TOML parse error: {e}")))
    }

    /// Serialises options to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ConfigFile(format!("TOML serialise error: {e}")))
    }

    /// Validates every field and builds a [`RuntimeConfig`].
    ///
    /// Returns `Err(InvalidArgument)` naming the first bad field.
    pub fn to_config(&self) -> Result<RuntimeConfig, ConfigError> {
        let perf = GpuPerfHint::try_from(self.gpu_perf_hint)?;
        let priority = GpuPriorityHint::try_from(self.gpu_priority_hint)?;
        let policy = CpuPowerPolicy::try_from(self.cpu_power_option)?;
        let threads = usize::try_from(self.omp_num_threads)
            .ok()
            .filter(|&n| n >= 1)
            .ok_or_else(|| {
                ConfigError::InvalidArgument(format!(
                    "omp_num_threads must be >= 1, got {}",
                    self.omp_num_threads
                ))
            })?;

        let mut config = RuntimeConfig::default();
        config.configure_compute_backend(perf, priority);
        config.configure_cpu_pool(threads, policy)?;
        Ok(config)
    }
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            gpu_perf_hint: GpuPerfHint::High as i32,
            gpu_priority_hint: GpuPriorityHint::High as i32,
            omp_num_threads: 1,
            cpu_power_option: CpuPowerPolicy::HighPerformance as i32,
        }
    }
}
