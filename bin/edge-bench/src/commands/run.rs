// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Default command: apply runtime configuration, then benchmark.
//!
//! Configuration is applied before any pool or context exists, so every
//! benchmark observes it.

use crate::benchmarks;
use crate::config::HostConfig;
use anyhow::Context;
use bench_harness::{BenchmarkRunner, RunnerSettings};
use runtime_config::{global, CpuTopology};
use std::sync::Arc;

/// Runs the selected benchmarks and returns the process exit code.
pub fn execute(host: HostConfig, json: bool) -> anyhow::Result<i32> {
    let config = host
        .runtime
        .to_config()
        .context("invalid runtime options")?;
    global::set(config);

    let topology = CpuTopology::detect();
    let pool = Arc::new(global::create_cpu_pool(&topology)?);
    let hints = global::gpu_hints_for_new_context();

    if !json {
        println!("╔══════════════════════════════════════════════════════╗");
        println!("║           edge-bench · Micro-benchmarks             ║");
        println!("╚══════════════════════════════════════════════════════╝");
        println!();
        println!("  Platform fs:  {}", platform_port::file_system().name());
        println!(
            "  GPU hints:    perf={} priority={}",
            hints.perf, hints.priority,
        );
        println!(
            "  CPU pool:     {} threads, policy {}",
            pool.threads(),
            pool.policy(),
        );
        match (pool.pinned_cores(), pool.affinity_warning()) {
            (Some(cores), _) => println!("  Pinned cores: {cores:?}"),
            (None, Some(w)) => println!("  Affinity:     unavailable ({w})"),
            (None, None) => {}
        }
        println!(
            "  Topology:     {} cores{}",
            topology.num_cores(),
            if topology.is_heterogeneous() { " (heterogeneous)" } else { "" },
        );
        println!("  Pattern:      {}", host.pattern);
        println!();
    }

    benchmarks::register_builtin(Arc::clone(&pool))?;

    let runner = BenchmarkRunner::new(RunnerSettings {
        min_time: host.min_time(),
        ..RunnerSettings::default()
    });
    let summary = bench_harness::run_global(&runner, &host.pattern)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.is_empty() {
        println!("  No benchmark matches '{}'.", host.pattern);
    } else {
        println!("{summary}");
    }

    Ok(summary.exit_code(host.strict))
}
