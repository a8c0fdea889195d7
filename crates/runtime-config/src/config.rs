// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The injectable runtime configuration object.
//!
//! # Timing contract
//! A [`RuntimeConfig`] is read when a backend object is created: the GPU
//! executor copies [`RuntimeConfig::gpu_hints`] into its context, and
//! [`CpuPool::create`](crate::CpuPool::create) copies the pool settings.
//! Later configuration calls change what the *next* context or pool will
//! use. Live contexts and pools are never mutated retroactively.

use crate::{ConfigError, CpuPowerPolicy, GpuPerfHint, GpuPriorityHint};

/// Hints consumed when a GPU compute context is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct GpuHints {
    pub perf: GpuPerfHint,
    pub priority: GpuPriorityHint,
}

/// Settings consumed when a CPU worker pool is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct CpuPoolConfig {
    threads: usize,
    policy: CpuPowerPolicy,
}

impl CpuPoolConfig {
    /// Validates and builds pool settings.
    ///
    /// Returns `Err(InvalidArgument)` if `threads` is zero. The value is
    /// never clamped.
    pub fn new(threads: usize, policy: CpuPowerPolicy) -> Result<Self, ConfigError> {
        if threads == 0 {
            return Err(ConfigError::InvalidArgument(
                "CPU pool thread count must be at least 1".into(),
            ));
        }
        Ok(Self { threads, policy })
    }

    /// Number of worker threads to spawn.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Core-placement policy for the workers.
    pub fn policy(&self) -> CpuPowerPolicy {
        self.policy
    }
}

impl Default for CpuPoolConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            policy: CpuPowerPolicy::Default,
        }
    }
}

/// Process-level knobs for the compute backends.
///
/// The two groups are independent: configuring one never touches the other.
///
/// # Example
/// ```
/// use runtime_config::{CpuPowerPolicy, GpuPerfHint, GpuPriorityHint, RuntimeConfig};
///
/// let mut config = RuntimeConfig::default();
/// config.configure_compute_backend(GpuPerfHint::High, GpuPriorityHint::Low);
/// config.configure_cpu_pool(4, CpuPowerPolicy::HighPerformance).unwrap();
/// assert_eq!(config.cpu_pool().threads(), 4);
/// assert!(config.configure_cpu_pool(0, CpuPowerPolicy::Default).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct RuntimeConfig {
    gpu: GpuHints,
    cpu: CpuPoolConfig,
}

impl RuntimeConfig {
    /// Records the hint pair for the next GPU context.
    pub fn configure_compute_backend(&mut self, perf: GpuPerfHint, priority: GpuPriorityHint) {
        self.gpu = GpuHints { perf, priority };
        tracing::debug!("GPU hints set: perf={perf}, priority={priority}");
    }

    /// Records thread count and power policy for the next CPU pool.
    ///
    /// On error the previous settings are kept.
    pub fn configure_cpu_pool(
        &mut self,
        threads: usize,
        policy: CpuPowerPolicy,
    ) -> Result<(), ConfigError> {
        self.cpu = CpuPoolConfig::new(threads, policy)?;
        tracing::debug!("CPU pool set: threads={threads}, policy={policy}");
        Ok(())
    }

    /// Hints for a GPU context created now.
    pub fn gpu_hints(&self) -> GpuHints {
        self.gpu
    }

    /// Settings for a CPU pool created now.
    pub fn cpu_pool(&self) -> CpuPoolConfig {
        self.cpu
    }
}
