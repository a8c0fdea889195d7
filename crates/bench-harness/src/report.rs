// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Run results and their table rendering.

use std::fmt;
use std::time::Duration;

/// Lifecycle of one benchmark within a run.
///
/// ```text
/// Registered ──pattern──► Selected ──► Running ──┬──► Completed
///                                                └──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkState {
    Registered,
    Selected,
    Running,
    Completed,
    Failed,
}

impl fmt::Display for BenchmarkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The final, stable measurement of a completed benchmark.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Measurement {
    /// Iterations in the accepted round.
    pub iterations: u64,
    /// Timed duration of the accepted round.
    pub total: Duration,
    /// Mean time per iteration in nanoseconds.
    pub ns_per_iter: f64,
    /// Input throughput, if the routine reported bytes processed.
    pub mb_per_sec: Option<f64>,
    /// Compute throughput, if the routine reported MACs.
    pub gmacs_per_sec: Option<f64>,
    pub label: Option<String>,
}

impl Measurement {
    pub(crate) fn new(
        iterations: u64,
        total: Duration,
        bytes: Option<u64>,
        macs: Option<u64>,
        label: Option<String>,
    ) -> Self {
        let secs = total.as_secs_f64();
        let per_sec = |count: u64, scale: f64| {
            if secs > 0.0 {
                count as f64 / scale / secs
            } else {
                0.0
            }
        };
        Self {
            iterations,
            total,
            ns_per_iter: total.as_nanos() as f64 / iterations.max(1) as f64,
            mb_per_sec: bytes.map(|b| per_sec(b, 1e6)),
            gmacs_per_sec: macs.map(|m| per_sec(m, 1e9)),
            label,
        }
    }
}

/// How a selected benchmark ended.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BenchmarkOutcome {
    Completed(Measurement),
    Failed { error: String },
}

/// One row of a run: a benchmark (or one of its arguments) and its outcome.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BenchmarkReport {
    /// `name`, or `name/arg` for parameterised benchmarks.
    pub name: String,
    pub outcome: BenchmarkOutcome,
}

impl BenchmarkReport {
    /// Terminal state: `Completed` or `Failed`.
    pub fn state(&self) -> BenchmarkState {
        match self.outcome {
            BenchmarkOutcome::Completed(_) => BenchmarkState::Completed,
            BenchmarkOutcome::Failed { .. } => BenchmarkState::Failed,
        }
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        match &self.outcome {
            BenchmarkOutcome::Completed(m) => Some(m),
            BenchmarkOutcome::Failed { .. } => None,
        }
    }
}

/// Everything a run produced, in registration order.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RunSummary {
    pub pattern: String,
    pub reports: Vec<BenchmarkReport>,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Number of completed rows.
    pub fn completed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.state() == BenchmarkState::Completed)
            .count()
    }

    /// Rows that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BenchmarkReport> {
        self.reports
            .iter()
            .filter(|r| r.state() == BenchmarkState::Failed)
    }

    /// Names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.name.as_str()).collect()
    }

    /// Process exit status for this run.
    ///
    /// Always `0` unless `strict` is set, in which case any failure
    /// yields `1`.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && self.failures().next().is_some() {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .reports
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0)
            .max("Benchmark".len());

        writeln!(
            f,
            "{:<width$} {:>12} {:>12} {:>12} {:>10}",
            "Benchmark", "Time(ns)", "Iterations", "Input(MB/s)", "GMACPS",
        )?;
        writeln!(f, "{}", "-".repeat(width + 50))?;

        for r in &self.reports {
            match &r.outcome {
                BenchmarkOutcome::Completed(m) => {
                    let mbps = m.mb_per_sec.map_or("-".to_string(), |v| format!("{v:.2}"));
                    let gmacs = m.gmacs_per_sec.map_or("-".to_string(), |v| format!("{v:.2}"));
                    write!(
                        f,
                        "{:<width$} {:>12.0} {:>12} {:>12} {:>10}",
                        r.name, m.ns_per_iter, m.iterations, mbps, gmacs,
                    )?;
                    if let Some(label) = &m.label {
                        write!(f, "  {label}")?;
                    }
                    writeln!(f)?;
                }
                BenchmarkOutcome::Failed { error } => {
                    writeln!(f, "{:<width$} FAILED: {error}", r.name)?;
                }
            }
        }

        writeln!(f, "{}", "-".repeat(width + 50))?;
        write!(
            f,
            "{} run, {} completed, {} failed (pattern '{}')",
            self.len(),
            self.completed(),
            self.len() - self.completed(),
            self.pattern,
        )
    }
}
