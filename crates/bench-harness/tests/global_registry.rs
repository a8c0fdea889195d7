// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The process-wide registry. Kept in a single test since the registry
//! is shared by every test in this binary.

use bench_harness::{
    register, registered_count, run_global, try_register, BenchError, Bencher, Benchmark,
    BenchmarkRunner,
};
use std::time::Duration;

fn noop(b: &mut Bencher) -> anyhow::Result<()> {
    b.iter(|| ());
    Ok(())
}

#[test]
fn test_global_lifecycle() {
    register(Benchmark::new("GLOBAL_A", noop));
    register(Benchmark::new("GLOBAL_B", noop).arg(4));
    assert_eq!(registered_count(), 2);

    let dup = try_register(Benchmark::new("GLOBAL_A", noop)).unwrap_err();
    assert!(matches!(dup, BenchError::DuplicateRegistration(_)));

    let duplicate_panics = std::panic::catch_unwind(|| register(Benchmark::new("GLOBAL_B", noop)));
    assert!(duplicate_panics.is_err());

    let runner = BenchmarkRunner::default().with_min_time(Duration::from_millis(1));
    let summary = run_global(&runner, "all").unwrap();
    assert_eq!(summary.names(), vec!["GLOBAL_A", "GLOBAL_B/4"]);

    let late = try_register(Benchmark::new("GLOBAL_C", noop)).unwrap_err();
    assert!(matches!(late, BenchError::RegistrySealed(ref n) if n == "GLOBAL_C"));
    assert_eq!(registered_count(), 2);

    // Sealed registries can still be run again.
    let again = run_global(&runner, "GLOBAL_A").unwrap();
    assert_eq!(again.names(), vec!["GLOBAL_A"]);
}
