// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bench-harness
//!
//! A micro-benchmark harness for operators and platform primitives, run
//! after runtime configuration has been applied.
//!
//! # Key Components
//!
//! - [`Benchmark`]: a named routine, optionally parameterised by a list
//!   of input-size arguments.
//! - [`BenchmarkRegistry`]: benchmarks in registration order with unique
//!   names; a process-wide instance is reachable via [`register`].
//! - [`BenchmarkRunner`]: selects by [`Pattern`] and measures each
//!   selection adaptively until a time floor is met.
//! - [`RunSummary`]: one [`BenchmarkReport`] per run row, printable as a
//!   table or serialisable.
//!
//! # Example
//! ```
//! use bench_harness::{Benchmark, BenchmarkRegistry, BenchmarkRunner};
//! use std::time::Duration;
//!
//! let mut registry = BenchmarkRegistry::new();
//! registry.register(Benchmark::new("VEC_SUM", |b| {
//!     let v = vec![1u64; 1024];
//!     b.iter(|| v.iter().sum::<u64>());
//!     Ok(())
//! })).unwrap();
//!
//! let runner = BenchmarkRunner::default().with_min_time(Duration::from_millis(1));
//! let summary = runner.run(&registry, "all").unwrap();
//! assert_eq!(summary.names(), vec!["VEC_SUM"]);
//! println!("{summary}");
//! ```

mod bencher;
mod error;
mod pattern;
mod registry;
mod report;
mod runner;

pub use bencher::Bencher;
pub use error::BenchError;
pub use pattern::{Pattern, ALL};
pub use registry::{register, registered_count, try_register, Benchmark, BenchmarkRegistry, Routine};
pub use report::{BenchmarkOutcome, BenchmarkReport, BenchmarkState, Measurement, RunSummary};
pub use runner::{run_global, BenchmarkRunner, RunnerSettings};
