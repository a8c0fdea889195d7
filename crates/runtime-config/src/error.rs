// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error and warning types for runtime configuration.

use crate::CpuPowerPolicy;

/// Errors that block a configuration call or pool creation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A thread count or integer-coded enum value is out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A configuration file could not be read, parsed, or written.
    #[error("configuration file error: {0}")]
    ConfigFile(String),

    /// The worker pool could not be spawned.
    #[error("failed to build CPU pool: {0}")]
    PoolBuild(String),
}

/// Non-fatal: worker threads could not be pinned as the power policy asks.
///
/// The pool still runs, scheduled freely by the OS.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CPU affinity unavailable for policy {policy}: {reason}")]
pub struct AffinityUnavailable {
    pub policy: CpuPowerPolicy,
    pub reason: String,
}
