// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The CPU worker pool parameterised by [`CpuPoolConfig`].
//!
//! A pool copies its settings at creation and keeps them for life.
//! Reconfiguring afterwards affects only pools created later.
//!
//! # Affinity
//! For a non-default [`CpuPowerPolicy`] every worker is pinned to the
//! cores the [`CpuTopology`] selects for that policy. Pinning is done with
//! a `broadcast` right after the threads spawn, so by the time
//! [`CpuPool::create`] returns every worker has either been pinned or the
//! failure has been recorded. A failure never aborts creation: every
//! worker gets back the mask it inherited at spawn, the pool keeps running
//! and [`CpuPool::affinity_warning`] reports why.

use crate::affinity::{current_affinity, pin_current_thread, restore_affinity, AffinityMask};
use crate::{AffinityUnavailable, ConfigError, CpuPoolConfig, CpuPowerPolicy, CpuTopology};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Worker threads for CPU inference kernels.
pub struct CpuPool {
    pool: ThreadPool,
    config: CpuPoolConfig,
    pinned_cores: Option<Vec<usize>>,
    affinity_warning: Option<AffinityUnavailable>,
}

impl CpuPool {
    /// Spawns `config.threads()` workers and applies the power policy.
    pub fn create(config: CpuPoolConfig, topology: &CpuTopology) -> Result<Self, ConfigError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .thread_name(|idx| format!("edge-cpu-{idx}"))
            .build()
            .map_err(|e| ConfigError::PoolBuild(e.to_string()))?;

        let mut this = Self {
            pool,
            config,
            pinned_cores: None,
            affinity_warning: None,
        };
        this.apply_policy(topology);

        tracing::info!(
            "CPU pool created: {} threads, policy {}, pinned to {:?}",
            this.threads(),
            this.policy(),
            this.pinned_cores,
        );
        Ok(this)
    }

    fn apply_policy(&mut self, topology: &CpuTopology) {
        let policy = self.config.policy();
        if policy == CpuPowerPolicy::Default {
            return;
        }

        let Some(cores) = topology.cores_for(policy) else {
            self.degrade(policy, "core frequencies are not exposed by this platform".into());
            return;
        };

        // Each worker records the mask it inherited before pinning, so a
        // partial failure can put every worker back where it started.
        let outcomes: Vec<(Option<AffinityMask>, Result<(), String>)> =
            self.pool.broadcast(|_| match current_affinity() {
                Ok(original) => (
                    Some(original),
                    pin_current_thread(&cores).map_err(|e| e.to_string()),
                ),
                Err(e) => (None, Err(e.to_string())),
            });

        let failures: Vec<String> = outcomes
            .iter()
            .filter_map(|(_, r)| r.as_ref().err().cloned())
            .collect();

        if failures.is_empty() {
            self.pinned_cores = Some(cores);
            return;
        }

        let originals: Vec<Option<AffinityMask>> = outcomes.iter().map(|(m, _)| *m).collect();
        let restore_failures: Vec<String> = self
            .pool
            .broadcast(|ctx| match &originals[ctx.index()] {
                Some(mask) => restore_affinity(mask)
                    .map_err(|e| format!("worker {}: {e}", ctx.index())),
                None => Ok(()),
            })
            .into_iter()
            .filter_map(Result::err)
            .collect();

        let mut reason = failures.join("; ");
        if !restore_failures.is_empty() {
            tracing::warn!(
                "could not restore inherited CPU affinity: {}",
                restore_failures.join("; "),
            );
            reason.push_str(&format!(
                "; inherited affinity not restored ({})",
                restore_failures.join("; "),
            ));
        }
        self.degrade(policy, reason);
    }

    fn degrade(&mut self, policy: CpuPowerPolicy, reason: String) {
        let warning = AffinityUnavailable { policy, reason };
        tracing::warn!("{warning}; running unpinned");
        self.affinity_warning = Some(warning);
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Power policy the pool was created with.
    pub fn policy(&self) -> CpuPowerPolicy {
        self.config.policy()
    }

    /// The settings copied at creation.
    pub fn config(&self) -> CpuPoolConfig {
        self.config
    }

    /// Cores the workers are pinned to, if pinning succeeded.
    pub fn pinned_cores(&self) -> Option<&[usize]> {
        self.pinned_cores.as_deref()
    }

    /// Why the power policy could not be honoured, if it could not.
    pub fn affinity_warning(&self) -> Option<&AffinityUnavailable> {
        self.affinity_warning.as_ref()
    }

    /// Runs `op` inside the pool; rayon parallel iterators used by `op`
    /// execute on its workers.
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }
}

impl std::fmt::Debug for CpuPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPool")
            .field("threads", &self.threads())
            .field("policy", &self.policy())
            .field("pinned_cores", &self.pinned_cores)
            .field("affinity_warning", &self.affinity_warning)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CoreInfo;
    use rayon::prelude::*;

    fn unknown_topology() -> CpuTopology {
        CpuTopology::from_cores(vec![CoreInfo { id: 0, max_freq_khz: None }])
    }

    #[test]
    fn test_thread_count_honoured() {
        let cfg = CpuPoolConfig::new(3, CpuPowerPolicy::Default).unwrap();
        let pool = CpuPool::create(cfg, &CpuTopology::detect()).unwrap();
        assert_eq!(pool.threads(), 3);
        assert!(pool.affinity_warning().is_none());
        assert!(pool.pinned_cores().is_none());
    }

    #[test]
    fn test_work_runs_on_pool() {
        let cfg = CpuPoolConfig::new(2, CpuPowerPolicy::Default).unwrap();
        let pool = CpuPool::create(cfg, &CpuTopology::detect()).unwrap();
        let sum: u64 = pool.install(|| (1..=1000u64).into_par_iter().sum());
        assert_eq!(sum, 500_500);
        let in_pool = pool.install(|| rayon::current_num_threads());
        assert_eq!(in_pool, 2);
    }

    #[test]
    fn test_unknown_topology_degrades_with_warning() {
        let cfg = CpuPoolConfig::new(2, CpuPowerPolicy::BatterySave).unwrap();
        let pool = CpuPool::create(cfg, &unknown_topology()).unwrap();
        assert_eq!(pool.threads(), 2);
        let warning = pool.affinity_warning().unwrap();
        assert_eq!(warning.policy, CpuPowerPolicy::BatterySave);
        assert!(pool.pinned_cores().is_none());
    }

    #[test]
    fn test_unpinnable_core_degrades_with_warning() {
        // A core id no cpu_set_t can hold: pinning must fail on every OS.
        let topology = CpuTopology::from_cores(vec![CoreInfo {
            id: usize::MAX,
            max_freq_khz: Some(1_000_000),
        }]);
        let cfg = CpuPoolConfig::new(2, CpuPowerPolicy::HighPerformance).unwrap();
        let pool = CpuPool::create(cfg, &topology).unwrap();
        assert!(pool.affinity_warning().is_some());
        let sum: u32 = pool.install(|| (0..10u32).into_par_iter().sum());
        assert_eq!(sum, 45);
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn test_failed_pinning_keeps_inherited_mask() {
        // Workers inherit a one-core mask from this thread; a failed
        // pinning must leave them on exactly that core.
        std::thread::spawn(|| {
            let inherited = current_affinity().unwrap().cores();
            pin_current_thread(&inherited[..1]).unwrap();

            let mut cores: Vec<CoreInfo> = inherited
                .iter()
                .map(|&id| CoreInfo { id, max_freq_khz: Some(1_000_000) })
                .collect();
            cores.push(CoreInfo { id: usize::MAX, max_freq_khz: Some(2_000_000) });
            let topology = CpuTopology::from_cores(cores);

            let cfg = CpuPoolConfig::new(2, CpuPowerPolicy::HighPerformance).unwrap();
            let pool = CpuPool::create(cfg, &topology).unwrap();
            assert!(pool.affinity_warning().is_some());
            assert!(pool.pinned_cores().is_none());

            let masks = pool.pool.broadcast(|_| current_affinity().unwrap().cores());
            for mask in masks {
                assert_eq!(mask, vec![inherited[0]]);
            }
        })
        .join()
        .unwrap();
    }
}
