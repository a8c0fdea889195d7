// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Adaptive benchmark execution.
//!
//! Each selected benchmark is measured in rounds. A round calls the
//! routine once with an iteration count; if the timed duration stays
//! below `min_time`, the count grows (at least doubling, by the estimate
//! `2 · min_time / elapsed` at most ×100) and the round is repeated. The
//! first round over the floor, or at `max_iters`, is reported.
//!
//! Routines are isolated: an `Err` or a panic ends that benchmark as
//! `Failed` and the run moves on.

use crate::registry::{Benchmark, BenchmarkRegistry, Routine, GLOBAL};
use crate::{
    BenchError, Bencher, BenchmarkOutcome, BenchmarkReport, BenchmarkState, Measurement, Pattern,
    RunSummary,
};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

const MIN_GROWTH: f64 = 2.0;
const MAX_GROWTH: f64 = 100.0;

/// Limits of the adaptive loop.
#[derive(Debug, Clone, Copy)]
pub struct RunnerSettings {
    /// Timed duration a round must reach to be accepted.
    pub min_time: Duration,
    /// Iterations in the first round.
    pub min_iters: u64,
    /// Upper bound; a round at this count is accepted regardless of time.
    pub max_iters: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            min_time: Duration::from_millis(500),
            min_iters: 10,
            max_iters: 1_000_000_000,
        }
    }
}

/// Runs selected benchmarks from a registry.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkRunner {
    settings: RunnerSettings,
}

impl BenchmarkRunner {
    pub fn new(settings: RunnerSettings) -> Self {
        Self { settings }
    }

    /// Replaces the time floor.
    pub fn with_min_time(mut self, min_time: Duration) -> Self {
        self.settings.min_time = min_time;
        self
    }

    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// Runs every benchmark in `registry` whose name matches `pattern`,
    /// in registration order.
    ///
    /// Only an invalid pattern is an error; routine failures are recorded
    /// in the summary.
    pub fn run(&self, registry: &BenchmarkRegistry, pattern: &str) -> Result<RunSummary, BenchError> {
        let filter = Pattern::parse(pattern)?;
        let mut reports = Vec::new();

        for bench in registry.iter() {
            if !filter.matches(bench.name()) {
                continue;
            }
            trace_transition(bench.name(), BenchmarkState::Registered, BenchmarkState::Selected);

            if bench.arg_list().is_empty() {
                reports.push(self.run_one(bench, None));
            } else {
                for &arg in bench.arg_list() {
                    reports.push(self.run_one(bench, Some(arg)));
                }
            }
        }

        let summary = RunSummary {
            pattern: pattern.to_string(),
            reports,
        };
        tracing::info!(
            "benchmark run '{}': {} completed, {} failed",
            pattern,
            summary.completed(),
            summary.len() - summary.completed(),
        );
        Ok(summary)
    }

    fn run_one(&self, bench: &Benchmark, arg: Option<i64>) -> BenchmarkReport {
        let name = match arg {
            Some(a) => format!("{}/{a}", bench.name()),
            None => bench.name().to_string(),
        };
        trace_transition(&name, BenchmarkState::Selected, BenchmarkState::Running);

        let outcome = match self.measure(bench.routine(), arg) {
            Ok(m) => {
                trace_transition(&name, BenchmarkState::Running, BenchmarkState::Completed);
                BenchmarkOutcome::Completed(m)
            }
            Err(error) => {
                tracing::warn!("benchmark '{name}' failed: {error}");
                trace_transition(&name, BenchmarkState::Running, BenchmarkState::Failed);
                BenchmarkOutcome::Failed { error }
            }
        };
        BenchmarkReport { name, outcome }
    }

    fn measure(&self, routine: &Routine, arg: Option<i64>) -> Result<Measurement, String> {
        let RunnerSettings {
            min_time,
            min_iters,
            max_iters,
        } = self.settings;
        let max_iters = max_iters.max(1);
        let mut iters = min_iters.clamp(1, max_iters);

        loop {
            let mut b = Bencher::new(iters, arg);
            b.start_timing();
            let result = panic::catch_unwind(AssertUnwindSafe(|| routine(&mut b)));
            b.stop_timing();

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(format!("{e:#}")),
                Err(payload) => return Err(panic_message(payload.as_ref())),
            }

            let elapsed = b.elapsed();
            if elapsed >= min_time || iters >= max_iters {
                let label = b.take_label();
                return Ok(Measurement::new(
                    iters,
                    elapsed,
                    b.bytes_processed(),
                    b.macs_processed(),
                    label,
                ));
            }
            iters = next_iters(iters, elapsed, min_time, max_iters);
        }
    }
}

/// Iteration count for the next round.
pub(crate) fn next_iters(iters: u64, elapsed: Duration, min_time: Duration, max_iters: u64) -> u64 {
    let growth = if elapsed.is_zero() {
        MAX_GROWTH
    } else {
        (2.0 * min_time.as_secs_f64() / elapsed.as_secs_f64()).clamp(MIN_GROWTH, MAX_GROWTH)
    };
    let next = (iters as f64 * growth).ceil();
    if next >= max_iters as f64 {
        max_iters
    } else {
        next as u64
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

fn trace_transition(name: &str, from: BenchmarkState, to: BenchmarkState) {
    tracing::debug!("benchmark '{name}': {from} -> {to}");
}

/// Runs the process-wide registry and seals it.
///
/// After this call, [`register`](crate::register) fails fast and
/// [`try_register`](crate::try_register) returns `RegistrySealed`.
pub fn run_global(runner: &BenchmarkRunner, pattern: &str) -> Result<RunSummary, BenchError> {
    let registry = {
        let mut global = GLOBAL.lock();
        global.sealed = true;
        global.registry.clone()
    };
    runner.run(&registry, pattern)
}
