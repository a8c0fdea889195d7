// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-round timing state handed to a benchmark routine.

use std::time::{Duration, Instant};

/// Timing control for one measurement round.
///
/// The runner starts the clock before calling the routine and stops it
/// afterwards. A routine that needs untimed setup brackets it with
/// [`stop_timing`](Self::stop_timing) / [`start_timing`](Self::start_timing).
///
/// # Example
/// ```
/// use bench_harness::Bencher;
///
/// fn sum_bench(b: &mut Bencher) -> anyhow::Result<()> {
///     b.stop_timing();
///     let data = vec![1u32; 4096];
///     b.set_bytes_processed(b.iters() * 4096 * 4);
///     b.start_timing();
///     b.iter(|| data.iter().sum::<u32>());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Bencher {
    iters: u64,
    arg: Option<i64>,
    accumulated: Duration,
    started: Option<Instant>,
    bytes_processed: Option<u64>,
    macs_processed: Option<u64>,
    label: Option<String>,
}

impl Bencher {
    pub(crate) fn new(iters: u64, arg: Option<i64>) -> Self {
        Self {
            iters,
            arg,
            accumulated: Duration::ZERO,
            started: None,
            bytes_processed: None,
            macs_processed: None,
            label: None,
        }
    }

    /// Number of iterations the routine must perform this round.
    pub fn iters(&self) -> u64 {
        self.iters
    }

    /// The input-size argument of this run, if the benchmark has any.
    pub fn arg(&self) -> Option<i64> {
        self.arg
    }

    /// Resumes the clock. No-op if it is already running.
    pub fn start_timing(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    /// Pauses the clock. No-op if it is already paused.
    pub fn stop_timing(&mut self) {
        if let Some(start) = self.started.take() {
            self.accumulated += start.elapsed();
        }
    }

    /// Runs `f` [`iters`](Self::iters) times, keeping its result opaque to
    /// the optimiser.
    pub fn iter<R, F: FnMut() -> R>(&mut self, mut f: F) {
        for _ in 0..self.iters {
            std::hint::black_box(f());
        }
    }

    /// Total bytes processed across all iterations of this round.
    pub fn set_bytes_processed(&mut self, bytes: u64) {
        self.bytes_processed = Some(bytes);
    }

    /// Total multiply-accumulates performed across all iterations.
    pub fn set_macs_processed(&mut self, macs: u64) {
        self.macs_processed = Some(macs);
    }

    /// Free-form annotation shown next to the result.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    /// Timed duration so far, including a running segment.
    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(start) => self.accumulated + start.elapsed(),
            None => self.accumulated,
        }
    }

    pub(crate) fn bytes_processed(&self) -> Option<u64> {
        self.bytes_processed
    }

    pub(crate) fn macs_processed(&self) -> Option<u64> {
        self.macs_processed
    }

    pub(crate) fn take_label(&mut self) -> Option<String> {
        self.label.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_runs_iters_times() {
        let mut b = Bencher::new(17, None);
        let mut calls = 0;
        b.iter(|| calls += 1);
        assert_eq!(calls, 17);
    }

    #[test]
    fn test_paused_time_not_counted() {
        let mut b = Bencher::new(1, None);
        b.start_timing();
        b.stop_timing();
        let timed = b.elapsed();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(b.elapsed(), timed);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut b = Bencher::new(1, Some(64));
        b.start_timing();
        std::thread::sleep(Duration::from_millis(5));
        b.start_timing();
        b.stop_timing();
        assert!(b.elapsed() >= Duration::from_millis(5));
        assert_eq!(b.arg(), Some(64));
    }

    #[test]
    fn test_annotations() {
        let mut b = Bencher::new(2, None);
        b.set_bytes_processed(1024);
        b.set_macs_processed(99);
        b.set_label("fp32");
        assert_eq!(b.bytes_processed(), Some(1024));
        assert_eq!(b.macs_processed(), Some(99));
        assert_eq!(b.take_label().as_deref(), Some("fp32"));
    }
}
