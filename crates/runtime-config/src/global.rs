// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Process-wide configuration for hosts that cannot thread a
//! [`RuntimeConfig`] through to backend creation.
//!
//! # Lifecycle
//! - Initialised to [`RuntimeConfig::default`] on first access.
//! - Written by [`configure_compute_backend`] / [`configure_cpu_pool`],
//!   normally once during single-threaded startup.
//! - Read by [`gpu_hints_for_new_context`] and [`create_cpu_pool`]. The
//!   first such read marks the configuration as *in use*.
//! - Never torn down.
//!
//! Writes after first use are accepted but only reach contexts and pools
//! created afterwards; each such write logs a warning. Concurrent writers
//! are serialised by a lock and the last one before first use wins.
//! Racing a write with context creation is the caller's responsibility.

use crate::{
    ConfigError, CpuPool, CpuPowerPolicy, CpuTopology, GpuHints, GpuPerfHint, GpuPriorityHint,
    RuntimeConfig,
};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

static GLOBAL: Lazy<RwLock<RuntimeConfig>> = Lazy::new(|| RwLock::new(RuntimeConfig::default()));
static IN_USE: AtomicBool = AtomicBool::new(false);

fn warn_if_in_use(what: &str) {
    if IN_USE.load(Ordering::Acquire) {
        tracing::warn!(
            "{what} reconfigured after first use; existing contexts and pools keep their settings"
        );
    }
}

/// Sets the hints used by GPU contexts created from now on.
pub fn configure_compute_backend(perf: GpuPerfHint, priority: GpuPriorityHint) {
    warn_if_in_use("GPU backend");
    GLOBAL.write().configure_compute_backend(perf, priority);
}

/// Sets thread count and power policy for CPU pools created from now on.
///
/// Returns `Err(InvalidArgument)` for `threads == 0`, leaving the previous
/// settings in place.
pub fn configure_cpu_pool(threads: usize, policy: CpuPowerPolicy) -> Result<(), ConfigError> {
    warn_if_in_use("CPU pool");
    GLOBAL.write().configure_cpu_pool(threads, policy)
}

/// Replaces the whole configuration.
pub fn set(config: RuntimeConfig) {
    warn_if_in_use("runtime");
    *GLOBAL.write() = config;
}

/// A copy of the current configuration. Does not mark it as in use.
pub fn snapshot() -> RuntimeConfig {
    *GLOBAL.read()
}

/// Hints for a GPU context being created now.
pub fn gpu_hints_for_new_context() -> GpuHints {
    IN_USE.store(true, Ordering::Release);
    GLOBAL.read().gpu_hints()
}

/// Creates a CPU pool from the current configuration.
pub fn create_cpu_pool(topology: &CpuTopology) -> Result<CpuPool, ConfigError> {
    IN_USE.store(true, Ordering::Release);
    let config = GLOBAL.read().cpu_pool();
    CpuPool::create(config, topology)
}

/// Returns `true` once a context or pool has been created from the
/// process-wide configuration.
pub fn is_in_use() -> bool {
    IN_USE.load(Ordering::Acquire)
}
