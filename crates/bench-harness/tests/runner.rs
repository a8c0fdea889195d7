// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests for selection, measurement and failure isolation.

use bench_harness::{
    BenchError, Bencher, Benchmark, BenchmarkOutcome, BenchmarkRegistry, BenchmarkRunner,
    BenchmarkState, RunnerSettings,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fast_runner() -> BenchmarkRunner {
    BenchmarkRunner::default().with_min_time(Duration::from_millis(1))
}

fn spin(b: &mut Bencher) -> anyhow::Result<()> {
    b.iter(|| (0..64u64).sum::<u64>());
    Ok(())
}

fn registry_of(names: &[&str]) -> BenchmarkRegistry {
    let mut reg = BenchmarkRegistry::new();
    for name in names {
        reg.register(Benchmark::new(*name, spin)).unwrap();
    }
    reg
}

#[test]
fn test_all_runs_each_once_in_order() {
    let reg = registry_of(&["CONV_3x3", "MATMUL", "ADD"]);
    let summary = fast_runner().run(&reg, "all").unwrap();

    assert_eq!(summary.names(), vec!["CONV_3x3", "MATMUL", "ADD"]);
    assert_eq!(summary.completed(), 3);
    for r in &summary.reports {
        let m = r.measurement().unwrap();
        assert!(m.iterations >= 10);
        assert!(m.total >= Duration::from_millis(1));
    }
}

#[test]
fn test_pattern_selects_subset_in_registration_order() {
    let reg = registry_of(&["CONV_3x3", "MATMUL", "DEPTHWISE_CONV", "ADD"]);
    let summary = fast_runner().run(&reg, ".*CONV.*").unwrap();
    assert_eq!(summary.names(), vec!["CONV_3x3", "DEPTHWISE_CONV"]);
}

#[test]
fn test_no_match_is_empty_summary() {
    let reg = registry_of(&["MATMUL"]);
    let summary = fast_runner().run(&reg, "NOTHING_MATCHES").unwrap();
    assert!(summary.is_empty());
    assert_eq!(summary.exit_code(true), 0);
}

#[test]
fn test_empty_registry() {
    let summary = fast_runner().run(&BenchmarkRegistry::new(), "all").unwrap();
    assert!(summary.is_empty());
}

#[test]
fn test_invalid_pattern_is_error() {
    let reg = registry_of(&["MATMUL"]);
    let err = fast_runner().run(&reg, "[oops").unwrap_err();
    assert!(matches!(err, BenchError::InvalidPattern { .. }));
}

#[test]
fn test_failure_does_not_stop_run() {
    let mut reg = BenchmarkRegistry::new();
    reg.register(Benchmark::new("FIRST", spin)).unwrap();
    reg.register(Benchmark::new("BROKEN", |_b: &mut Bencher| {
        anyhow::bail!("unsupported data type")
    }))
    .unwrap();
    reg.register(Benchmark::new("PANICS", |_b: &mut Bencher| -> anyhow::Result<()> {
        panic!("index out of range")
    }))
    .unwrap();
    reg.register(Benchmark::new("LAST", spin)).unwrap();

    let summary = fast_runner().run(&reg, "all").unwrap();
    let states: Vec<BenchmarkState> = summary.reports.iter().map(|r| r.state()).collect();
    assert_eq!(
        states,
        vec![
            BenchmarkState::Completed,
            BenchmarkState::Failed,
            BenchmarkState::Failed,
            BenchmarkState::Completed,
        ]
    );

    match &summary.reports[1].outcome {
        BenchmarkOutcome::Failed { error } => assert!(error.contains("unsupported data type")),
        other => panic!("expected failure, got {other:?}"),
    }
    match &summary.reports[2].outcome {
        BenchmarkOutcome::Failed { error } => assert!(error.contains("index out of range")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(summary.exit_code(false), 0);
    assert_eq!(summary.exit_code(true), 1);

    let table = summary.to_string();
    assert!(table.contains("FAILED"));
    assert!(table.contains("4 run, 2 completed, 2 failed"));
}

#[test]
fn test_args_reported_per_argument() {
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_in = Arc::clone(&seen);

    let mut reg = BenchmarkRegistry::new();
    reg.register(
        Benchmark::new("SOFTMAX", move |b: &mut Bencher| {
            let n = b.arg().unwrap_or(1) as usize;
            seen_in.fetch_max(n, Ordering::Relaxed);
            let v = vec![1.0f32; n];
            b.iter(|| v.iter().sum::<f32>());
            b.set_bytes_processed(b.iters() * (n * 4) as u64);
            Ok(())
        })
        .args([16, 256]),
    )
    .unwrap();

    let summary = fast_runner().run(&reg, "SOFTMAX").unwrap();
    assert_eq!(summary.names(), vec!["SOFTMAX/16", "SOFTMAX/256"]);
    assert_eq!(seen.load(Ordering::Relaxed), 256);
    assert!(summary.reports[0].measurement().unwrap().mb_per_sec.is_some());
}

#[test]
fn test_rounds_grow_until_floor() {
    let rounds = Arc::new(AtomicUsize::new(0));
    let rounds_in = Arc::clone(&rounds);

    let mut reg = BenchmarkRegistry::new();
    reg.register(Benchmark::new("SLEEPY", move |b: &mut Bencher| {
        rounds_in.fetch_add(1, Ordering::Relaxed);
        b.iter(|| std::thread::sleep(Duration::from_micros(20)));
        Ok(())
    }))
    .unwrap();

    let runner = BenchmarkRunner::new(RunnerSettings {
        min_time: Duration::from_millis(20),
        ..RunnerSettings::default()
    });
    let summary = runner.run(&reg, "all").unwrap();
    let m = summary.reports[0].measurement().unwrap();
    assert!(m.total >= Duration::from_millis(20));
    assert!(rounds.load(Ordering::Relaxed) >= 2);
    assert!(m.iterations > 10);
}

#[test]
fn test_untimed_setup_excluded() {
    let mut reg = BenchmarkRegistry::new();
    reg.register(Benchmark::new("SETUP_HEAVY", |b: &mut Bencher| {
        b.stop_timing();
        std::thread::sleep(Duration::from_millis(30));
        b.start_timing();
        b.iter(|| ());
        Ok(())
    }))
    .unwrap();

    let runner = BenchmarkRunner::new(RunnerSettings {
        min_time: Duration::from_secs(3600),
        min_iters: 1,
        max_iters: 1,
    });
    let summary = runner.run(&reg, "all").unwrap();
    let m = summary.reports[0].measurement().unwrap();
    assert!(m.total < Duration::from_millis(30));
}

#[test]
fn test_summary_serializes() {
    let mut reg = registry_of(&["OK"]);
    reg.register(Benchmark::new("BAD", |_b: &mut Bencher| anyhow::bail!("nope")))
        .unwrap();
    let summary = fast_runner().run(&reg, "all").unwrap();

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["pattern"], "all");
    assert_eq!(json["reports"][0]["name"], "OK");
    assert_eq!(json["reports"][0]["outcome"]["status"], "completed");
    assert_eq!(json["reports"][1]["outcome"]["status"], "failed");
    assert_eq!(json["reports"][1]["outcome"]["error"], "nope");
}
