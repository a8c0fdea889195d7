// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime-config
//!
//! Latency/throughput/power knobs for the compute backends, applied before
//! any inference session starts.
//!
//! # Key Components
//!
//! - [`RuntimeConfig`]: an injectable value with two independent groups:
//!   GPU context hints and CPU pool settings.
//! - [`CpuPool`]: the worker pool built from [`CpuPoolConfig`], pinned to
//!   big or little cores according to [`CpuPowerPolicy`].
//! - [`CpuTopology`]: core list and per-core maximum clock from sysfs.
//! - [`RuntimeOptions`]: the integer-coded host inputs, with TOML loading.
//! - [`global`]: a process-wide instance for hosts that need one.
//!
//! # Timing contract
//!
//! ```text
//! configure_*()  ──►  RuntimeConfig  ──copy──►  CpuPool::create / GPU context
//!                          ▲                         (settings frozen)
//!   later configure_*() ───┘  affects only the next creation
//! ```
//!
//! All calls are synchronous and non-blocking. Configuration is meant to
//! happen during single-threaded startup, before the first session.
//!
//! # Example
//! ```
//! use runtime_config::{CpuPool, CpuPowerPolicy, CpuTopology, RuntimeConfig};
//!
//! let mut config = RuntimeConfig::default();
//! config.configure_cpu_pool(2, CpuPowerPolicy::Default).unwrap();
//!
//! let pool = CpuPool::create(config.cpu_pool(), &CpuTopology::detect()).unwrap();
//! assert_eq!(pool.threads(), 2);
//! ```

mod affinity;
mod config;
mod error;
pub mod global;
mod hints;
mod options;
mod pool;
mod topology;

pub use config::{CpuPoolConfig, GpuHints, RuntimeConfig};
pub use error::{AffinityUnavailable, ConfigError};
pub use hints::{CpuPowerPolicy, GpuPerfHint, GpuPriorityHint};
pub use options::RuntimeOptions;
pub use pool::CpuPool;
pub use topology::{CoreInfo, CpuTopology};
