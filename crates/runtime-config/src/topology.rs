// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! CPU core topology discovery.
//!
//! Reads per-core maximum frequency from:
//! - `/sys/devices/system/cpu/online`: which cores exist (e.g. `"0-7"`).
//! - `/sys/devices/system/cpu/cpuN/cpufreq/cpuinfo_max_freq`: in kHz.
//!
//! Heterogeneous (big.LITTLE / DynamIQ) mobile SoCs expose clusters with
//! different maximum clocks. Cores sharing the highest clock are treated
//! as "big", cores sharing the lowest as "little". Where sysfs is absent
//! (macOS, Windows, containers) frequencies are unknown and no power
//! policy can be mapped to cores.

use crate::CpuPowerPolicy;
use std::path::Path;

/// Base sysfs path for CPU information.
const CPU_BASE: &str = "/sys/devices/system/cpu";

/// One logical core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreInfo {
    /// Logical CPU id as used by the affinity API.
    pub id: usize,
    /// Maximum frequency in kHz, if the platform reports it.
    pub max_freq_khz: Option<u64>,
}

/// The set of logical cores visible to this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuTopology {
    cores: Vec<CoreInfo>,
}

impl CpuTopology {
    /// Builds a topology from an explicit core list.
    pub fn from_cores(cores: Vec<CoreInfo>) -> Self {
        Self { cores }
    }

    /// Reads the topology of the running machine.
    ///
    /// Never fails: missing sysfs entries degrade to cores with unknown
    /// frequency, numbered `0..num_cpus::get()`.
    pub fn detect() -> Self {
        Self::detect_at(Path::new(CPU_BASE))
    }

    pub(crate) fn detect_at(base: &Path) -> Self {
        let ids = read_online_ids(base).unwrap_or_else(|| (0..num_cpus::get().max(1)).collect());

        let cores = ids
            .into_iter()
            .map(|id| CoreInfo {
                id,
                max_freq_khz: read_max_freq(base, id),
            })
            .collect::<Vec<_>>();

        let topology = Self { cores };
        tracing::debug!(
            "cpu topology: {} cores, heterogeneous={}",
            topology.num_cores(),
            topology.is_heterogeneous(),
        );
        topology
    }

    /// All known cores.
    pub fn cores(&self) -> &[CoreInfo] {
        &self.cores
    }

    /// Number of logical cores.
    pub fn num_cores(&self) -> usize {
        self.cores.len()
    }

    /// Returns `true` if every core reports its maximum frequency.
    pub fn has_frequencies(&self) -> bool {
        !self.cores.is_empty() && self.cores.iter().all(|c| c.max_freq_khz.is_some())
    }

    /// Returns `true` if cores run at more than one maximum frequency.
    pub fn is_heterogeneous(&self) -> bool {
        let mut freqs = self.cores.iter().filter_map(|c| c.max_freq_khz);
        match freqs.next() {
            Some(first) => freqs.any(|f| f != first),
            None => false,
        }
    }

    /// Core ids matching `policy`.
    ///
    /// Returns `None` for [`CpuPowerPolicy::Default`] (no pinning wanted)
    /// and when frequencies are unknown. On homogeneous parts both
    /// non-default policies select every core.
    pub fn cores_for(&self, policy: CpuPowerPolicy) -> Option<Vec<usize>> {
        if !self.has_frequencies() {
            return None;
        }
        let freqs = self.cores.iter().filter_map(|c| c.max_freq_khz);
        let target = match policy {
            CpuPowerPolicy::Default => return None,
            CpuPowerPolicy::HighPerformance => freqs.max()?,
            CpuPowerPolicy::BatterySave => freqs.min()?,
        };
        Some(
            self.cores
                .iter()
                .filter(|c| c.max_freq_khz == Some(target))
                .map(|c| c.id)
                .collect(),
        )
    }
}

/// Reads the online core list, e.g. `"0-3,6"`.
fn read_online_ids(base: &Path) -> Option<Vec<usize>> {
    let content = std::fs::read_to_string(base.join("online")).ok()?;
    parse_cpu_list(content.trim())
}

fn read_max_freq(base: &Path, id: usize) -> Option<u64> {
    let path = base.join(format!("cpu{id}/cpufreq/cpuinfo_max_freq"));
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// Parses a kernel CPU list like `"0-3"`, `"0,2-3"` into ids.
pub(crate) fn parse_cpu_list(s: &str) -> Option<Vec<usize>> {
    let mut ids = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if let Some((start_s, end_s)) = part.split_once('-') {
            let start: usize = start_s.trim().parse().ok()?;
            let end: usize = end_s.trim().parse().ok()?;
            if end < start {
                return None;
            }
            ids.extend(start..=end);
        } else {
            ids.push(part.parse().ok()?);
        }
    }
    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big_little() -> CpuTopology {
        // 4× little @ 1.8 GHz, 3× mid @ 2.4 GHz, 1× prime @ 3.0 GHz.
        let freqs = [1_800_000, 1_800_000, 1_800_000, 1_800_000, 2_400_000, 2_400_000, 2_400_000, 3_000_000];
        CpuTopology::from_cores(
            freqs
                .iter()
                .enumerate()
                .map(|(id, &f)| CoreInfo { id, max_freq_khz: Some(f) })
                .collect(),
        )
    }

    #[test]
    fn test_parse_cpu_list() {
        assert_eq!(parse_cpu_list("0-3"), Some(vec![0, 1, 2, 3]));
        assert_eq!(parse_cpu_list("0,2-3"), Some(vec![0, 2, 3]));
        assert_eq!(parse_cpu_list("5"), Some(vec![5]));
    }

    #[test]
    fn test_parse_cpu_list_invalid() {
        assert_eq!(parse_cpu_list(""), None);
        assert_eq!(parse_cpu_list("abc"), None);
        assert_eq!(parse_cpu_list("3-1"), None);
    }

    #[test]
    fn test_policy_selects_clusters() {
        let t = big_little();
        assert!(t.is_heterogeneous());
        assert_eq!(t.cores_for(CpuPowerPolicy::HighPerformance), Some(vec![7]));
        assert_eq!(t.cores_for(CpuPowerPolicy::BatterySave), Some(vec![0, 1, 2, 3]));
        assert_eq!(t.cores_for(CpuPowerPolicy::Default), None);
    }

    #[test]
    fn test_homogeneous_selects_all() {
        let t = CpuTopology::from_cores(
            (0..4).map(|id| CoreInfo { id, max_freq_khz: Some(1_500_000) }).collect(),
        );
        assert!(!t.is_heterogeneous());
        assert_eq!(t.cores_for(CpuPowerPolicy::HighPerformance), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_unknown_frequencies() {
        let t = CpuTopology::from_cores(vec![CoreInfo { id: 0, max_freq_khz: None }]);
        assert!(!t.has_frequencies());
        assert_eq!(t.cores_for(CpuPowerPolicy::BatterySave), None);
    }

    #[test]
    fn test_detect_from_fake_sysfs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("online"), "0-1\n").unwrap();
        for (id, freq) in [(0, "1000000\n"), (1, "2000000\n")] {
            let cpufreq = dir.path().join(format!("cpu{id}/cpufreq"));
            std::fs::create_dir_all(&cpufreq).unwrap();
            std::fs::write(cpufreq.join("cpuinfo_max_freq"), freq).unwrap();
        }

        let t = CpuTopology::detect_at(dir.path());
        assert_eq!(t.num_cores(), 2);
        assert_eq!(t.cores()[1].max_freq_khz, Some(2_000_000));
        assert_eq!(t.cores_for(CpuPowerPolicy::HighPerformance), Some(vec![1]));
    }

    #[test]
    fn test_detect_without_sysfs_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let t = CpuTopology::detect_at(dir.path());
        assert!(t.num_cores() >= 1);
        assert!(!t.has_frequencies());
    }
}
