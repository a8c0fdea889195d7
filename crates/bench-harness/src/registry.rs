// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Named benchmark routines and the registries holding them.
//!
//! A [`BenchmarkRegistry`] is an ordinary value, which keeps tests
//! independent. Hosts that register from many places use the process-wide
//! registry through [`register`] / [`try_register`]; it is populated
//! during startup and sealed by the first [`run_global`](crate::run_global).

use crate::{BenchError, Bencher};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// The routine signature: perform `b.iters()` iterations.
pub type Routine = dyn Fn(&mut Bencher) -> anyhow::Result<()> + Send + Sync;

/// A named, timed routine with optional input-size arguments.
#[derive(Clone)]
pub struct Benchmark {
    name: String,
    routine: Arc<Routine>,
    args: Vec<i64>,
}

impl Benchmark {
    /// Creates a benchmark without arguments.
    pub fn new<F>(name: impl Into<String>, routine: F) -> Self
    where
        F: Fn(&mut Bencher) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            routine: Arc::new(routine),
            args: Vec::new(),
        }
    }

    /// Adds one argument. Each argument is measured separately and
    /// reported as `name/arg`.
    pub fn arg(mut self, arg: i64) -> Self {
        self.args.push(arg);
        self
    }

    /// Adds several arguments in order.
    pub fn args(mut self, args: impl IntoIterator<Item = i64>) -> Self {
        self.args.extend(args);
        self
    }

    /// The registered name. Selection patterns match against this.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument list; empty for unparameterised benchmarks.
    pub fn arg_list(&self) -> &[i64] {
        &self.args
    }

    pub(crate) fn routine(&self) -> &Routine {
        self.routine.as_ref()
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

/// Benchmarks in registration order, with unique names.
#[derive(Debug, Default, Clone)]
pub struct BenchmarkRegistry {
    entries: Vec<Benchmark>,
    names: HashSet<String>,
}

impl BenchmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `benchmark`.
    ///
    /// Returns `Err(DuplicateRegistration)` if the name is taken; the
    /// registry is unchanged in that case.
    pub fn register(&mut self, benchmark: Benchmark) -> Result<(), BenchError> {
        if !self.names.insert(benchmark.name.clone()) {
            return Err(BenchError::DuplicateRegistration(benchmark.name));
        }
        tracing::debug!("registered benchmark '{}'", benchmark.name);
        self.entries.push(benchmark);
        Ok(())
    }

    /// Benchmarks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Benchmark> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

// ── Process-wide registry ──────────────────────────────────────

pub(crate) struct GlobalRegistry {
    pub(crate) registry: BenchmarkRegistry,
    pub(crate) sealed: bool,
}

pub(crate) static GLOBAL: Lazy<Mutex<GlobalRegistry>> = Lazy::new(|| {
    Mutex::new(GlobalRegistry {
        registry: BenchmarkRegistry::new(),
        sealed: false,
    })
});

/// Adds `benchmark` to the process-wide registry.
///
/// Returns `Err(RegistrySealed)` after the first global run and
/// `Err(DuplicateRegistration)` for a taken name.
pub fn try_register(benchmark: Benchmark) -> Result<(), BenchError> {
    let mut global = GLOBAL.lock();
    if global.sealed {
        return Err(BenchError::RegistrySealed(benchmark.name));
    }
    global.registry.register(benchmark)
}

/// Adds `benchmark` to the process-wide registry, failing fast.
///
/// # Panics
/// Panics on a duplicate name or a sealed registry. Both are programming
/// errors that must surface at startup.
pub fn register(benchmark: Benchmark) {
    if let Err(e) = try_register(benchmark) {
        panic!("{e}");
    }
}

/// Number of benchmarks in the process-wide registry.
pub fn registered_count() -> usize {
    GLOBAL.lock().registry.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Bencher) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_registration_order() {
        let mut reg = BenchmarkRegistry::new();
        for name in ["CONV_3x3", "MATMUL", "ADD"] {
            reg.register(Benchmark::new(name, noop)).unwrap();
        }
        let names: Vec<&str> = reg.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["CONV_3x3", "MATMUL", "ADD"]);
        assert!(reg.contains("MATMUL"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut reg = BenchmarkRegistry::new();
        reg.register(Benchmark::new("MATMUL", noop)).unwrap();
        let err = reg.register(Benchmark::new("MATMUL", noop).arg(8)).unwrap_err();
        assert!(matches!(err, BenchError::DuplicateRegistration(ref n) if n == "MATMUL"));
        assert_eq!(reg.len(), 1);
        assert!(reg.iter().next().unwrap().arg_list().is_empty());
    }

    #[test]
    fn test_args_builder() {
        let b = Benchmark::new("SOFTMAX", noop).arg(16).args([64, 256]);
        assert_eq!(b.arg_list(), &[16, 64, 256]);
    }
}
