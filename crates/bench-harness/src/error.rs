// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the benchmark harness.

/// Errors raised while registering or selecting benchmarks.
///
/// Failures *inside* a benchmark routine are not errors of the harness;
/// they are recorded as [`BenchmarkOutcome::Failed`](crate::BenchmarkOutcome).
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// A benchmark with this name is already registered.
    #[error("benchmark '{0}' is already registered")]
    DuplicateRegistration(String),

    /// The global registry is read-only once a run has started.
    #[error("cannot register '{0}': the benchmark registry is sealed after the first run")]
    RegistrySealed(String),

    /// The selection pattern is not a valid regular expression.
    #[error("invalid benchmark pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
