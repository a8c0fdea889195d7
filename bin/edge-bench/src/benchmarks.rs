// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Built-in benchmarks over the platform port and the configured CPU pool.

use bench_harness::{try_register, Bencher, Benchmark};
use platform_port::{file_system, ReadOnlyMemoryRegion};
use rayon::prelude::*;
use runtime_config::CpuPool;
use std::hint::black_box;
use std::io::Write;
use std::sync::Arc;

/// Registers every built-in benchmark with the process-wide registry.
pub fn register_builtin(pool: Arc<CpuPool>) -> anyhow::Result<()> {
    try_register(Benchmark::new("REGION_OPEN_CLOSE", region_open_close).args([4 << 10, 1 << 20]))?;
    try_register(
        Benchmark::new("REGION_CHECKSUM", region_checksum).args([64 << 10, 1 << 20, 16 << 20]),
    )?;

    let reduce_pool = Arc::clone(&pool);
    try_register(
        Benchmark::new("POOL_REDUCE_F32", move |b: &mut Bencher| {
            pool_reduce_f32(b, &reduce_pool)
        })
        .args([1 << 16, 1 << 20]),
    )?;

    try_register(
        Benchmark::new("POOL_MATMUL_F32", move |b: &mut Bencher| pool_matmul_f32(b, &pool))
            .args([64, 128, 256]),
    )?;
    Ok(())
}

fn arg_len(b: &Bencher) -> anyhow::Result<usize> {
    let arg = b
        .arg()
        .ok_or_else(|| anyhow::anyhow!("benchmark requires a size argument"))?;
    Ok(usize::try_from(arg)?)
}

/// Writes `len` patterned bytes to a fresh temporary file.
fn scratch_file(len: usize) -> anyhow::Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    let data: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    file.write_all(&data)?;
    file.flush()?;
    Ok(file)
}

fn open_region(path: &std::path::Path) -> anyhow::Result<ReadOnlyMemoryRegion> {
    Ok(file_system().new_read_only_memory_region_from_file(path)?)
}

// ── Platform port ──────────────────────────────────────────────

fn region_open_close(b: &mut Bencher) -> anyhow::Result<()> {
    b.stop_timing();
    let len = arg_len(b)?;
    let file = scratch_file(len)?;
    b.start_timing();

    for _ in 0..b.iters() {
        let region = open_region(file.path())?;
        black_box(region.length());
    }
    b.set_label(file_system().name());
    Ok(())
}

fn region_checksum(b: &mut Bencher) -> anyhow::Result<()> {
    b.stop_timing();
    let len = arg_len(b)?;
    let file = scratch_file(len)?;
    let region = open_region(file.path())?;
    b.start_timing();

    b.iter(|| {
        region
            .data()
            .iter()
            .fold(0u64, |acc, &byte| acc.wrapping_add(u64::from(byte)))
    });
    b.set_bytes_processed(b.iters() * len as u64);
    Ok(())
}

// ── CPU pool ───────────────────────────────────────────────────

fn pool_reduce_f32(b: &mut Bencher, pool: &CpuPool) -> anyhow::Result<()> {
    b.stop_timing();
    let len = arg_len(b)?;
    let values: Vec<f32> = (0..len).map(|i| (i % 7) as f32 * 0.5).collect();
    b.start_timing();

    b.iter(|| pool.install(|| values.par_iter().sum::<f32>()));
    b.set_bytes_processed(b.iters() * (len * std::mem::size_of::<f32>()) as u64);
    b.set_label(format!("{} threads", pool.threads()));
    Ok(())
}

fn pool_matmul_f32(b: &mut Bencher, pool: &CpuPool) -> anyhow::Result<()> {
    b.stop_timing();
    let n = arg_len(b)?;
    let lhs: Vec<f32> = (0..n * n).map(|i| (i % 13) as f32 * 0.25).collect();
    let rhs: Vec<f32> = (0..n * n).map(|i| (i % 11) as f32 * 0.5).collect();
    let mut out = vec![0.0f32; n * n];
    b.start_timing();

    b.iter(|| pool.install(|| matmul_rows(&lhs, &rhs, &mut out, n)));
    b.set_macs_processed(b.iters() * (n * n * n) as u64);
    b.set_label(format!("{} threads", pool.threads()));
    Ok(())
}

/// Square `n x n` product, rows of `out` split across the current pool.
fn matmul_rows(lhs: &[f32], rhs: &[f32], out: &mut [f32], n: usize) {
    out.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
        row.iter_mut().for_each(|x| *x = 0.0);
        // ikj order keeps the inner loop sequential over a row of rhs.
        for p in 0..n {
            let a_ip = lhs[i * n + p];
            let rhs_row = &rhs[p * n..(p + 1) * n];
            for (c, &r) in row.iter_mut().zip(rhs_row) {
                *c += a_ip * r;
            }
        }
    });
}
