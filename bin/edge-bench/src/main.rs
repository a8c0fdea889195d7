// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # edge-bench
//!
//! Configures the runtime (GPU hints, CPU pool) and runs the registered
//! micro-benchmarks selected by a pattern.
//!
//! ## Usage
//! ```bash
//! # Everything, default configuration
//! edge-bench
//!
//! # Pool benchmarks on 4 big cores, machine-readable output
//! edge-bench --pattern 'POOL_.*' --omp-num-threads 4 --cpu-power-option 1 --json
//!
//! # Settings from a file; its keys override the flags
//! edge-bench --config bench.toml --strict
//! ```

mod benchmarks;
mod commands;
mod config;

use clap::Parser;
use config::HostConfig;
use runtime_config::RuntimeOptions;

#[derive(Parser)]
#[command(
    name = "edge-bench",
    about = "Configure the edge runtime and run micro-benchmarks",
    version,
    author,
    allow_negative_numbers = true
)]
struct Cli {
    /// Benchmarks to run: "all", or a regex matching whole names.
    #[arg(short, long, default_value = bench_harness::ALL)]
    pattern: String,

    /// GPU performance hint: 0 default, 1 low, 2 normal, 3 high.
    #[arg(long, default_value_t = 3)]
    gpu_perf_hint: i32,

    /// GPU priority hint: 0 default, 1 low, 2 normal, 3 high.
    #[arg(long, default_value_t = 3)]
    gpu_priority_hint: i32,

    /// CPU pool thread count (>= 1).
    #[arg(long, default_value_t = 1)]
    omp_num_threads: i32,

    /// CPU power policy: 0 default, 1 high-performance, 2 battery-save.
    #[arg(long, default_value_t = 1)]
    cpu_power_option: i32,

    /// Path to a TOML configuration file (overrides CLI arguments).
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Minimum timed duration per benchmark, in milliseconds.
    #[arg(long, default_value_t = 500)]
    min_time_ms: u64,

    /// Exit non-zero if any benchmark fails.
    #[arg(long)]
    strict: bool,

    /// Print the summary as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn host_config(&self) -> anyhow::Result<HostConfig> {
        let host = HostConfig {
            runtime: RuntimeOptions {
                gpu_perf_hint: self.gpu_perf_hint,
                gpu_priority_hint: self.gpu_priority_hint,
                omp_num_threads: self.omp_num_threads,
                cpu_power_option: self.cpu_power_option,
            },
            pattern: self.pattern.clone(),
            min_time_ms: self.min_time_ms,
            strict: self.strict,
        };
        match &self.config {
            Some(path) => host.merge_file(path),
            None => Ok(host),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let host = cli.host_config()?;
    let code = commands::run::execute(host, cli.json)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
