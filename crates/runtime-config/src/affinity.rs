// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pinning the calling thread to a set of cores.

use std::io;

/// Restricts the calling thread to `cores`.
///
/// Supported on Linux and Android through `sched_setaffinity`. Other
/// platforms return `ErrorKind::Unsupported`: macOS and iOS only offer
/// affinity *tags*, and Windows pools are left to the scheduler.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn pin_current_thread(cores: &[usize]) -> io::Result<()> {
    if cores.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty core set"));
    }

    // SAFETY: cpu_set_t is a plain bitmask; zeroed is the empty set.
    let mut set: libc::cpu_set_t = unsafe { std::mem::zeroed() };
    let capacity = 8 * std::mem::size_of::<libc::cpu_set_t>();
    for &core in cores {
        if core >= capacity {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("core id {core} exceeds cpu_set_t capacity {capacity}"),
            ));
        }
        // SAFETY: `core` is within the bitmask, checked above.
        unsafe { libc::CPU_SET(core, &mut set) };
    }

    // SAFETY: pid 0 targets the calling thread; `set` outlives the call.
    let ret = unsafe { libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// A thread's affinity mask, captured so it can be put back.
#[cfg(any(target_os = "linux", target_os = "android"))]
#[derive(Clone, Copy)]
pub(crate) struct AffinityMask(libc::cpu_set_t);

#[cfg(any(target_os = "linux", target_os = "android"))]
impl AffinityMask {
    /// Core ids in the mask, ascending.
    pub(crate) fn cores(&self) -> Vec<usize> {
        let capacity = 8 * std::mem::size_of::<libc::cpu_set_t>();
        // SAFETY: every index is below the bitmask capacity.
        (0..capacity)
            .filter(|&core| unsafe { libc::CPU_ISSET(core, &self.0) })
            .collect()
    }
}

/// Reads the calling thread's current affinity mask.
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn current_affinity() -> io::Result<AffinityMask> {
    // SAFETY: zeroed is the empty set; the kernel fills it in.
    let mut set: libc::cpu_set_t = unsafe { std::mem::zeroed() };
    // SAFETY: pid 0 targets the calling thread; `set` outlives the call.
    let ret =
        unsafe { libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut set) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(AffinityMask(set))
}

/// Puts back a mask captured by [`current_affinity`].
#[cfg(any(target_os = "linux", target_os = "android"))]
pub(crate) fn restore_affinity(mask: &AffinityMask) -> io::Result<()> {
    // SAFETY: pid 0 targets the calling thread; `mask` outlives the call.
    let ret =
        unsafe { libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mask.0) };
    if ret != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
#[derive(Clone, Copy)]
pub(crate) struct AffinityMask;

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) fn current_affinity() -> io::Result<AffinityMask> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "thread affinity is not supported on this platform",
    ))
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) fn restore_affinity(_mask: &AffinityMask) -> io::Result<()> {
    Ok(())
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
pub(crate) fn pin_current_thread(_cores: &[usize]) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "thread affinity is not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_rejected() {
        assert!(pin_current_thread(&[]).is_err());
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn test_mask_roundtrip() {
        std::thread::spawn(|| {
            let original = current_affinity().unwrap();
            let cores = original.cores();
            assert!(!cores.is_empty());

            pin_current_thread(&cores[..1]).unwrap();
            assert_eq!(current_affinity().unwrap().cores(), vec![cores[0]]);

            restore_affinity(&original).unwrap();
            assert_eq!(current_affinity().unwrap().cores(), cores);
        })
        .join()
        .unwrap();
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    #[test]
    fn test_out_of_range_core_rejected() {
        let err = pin_current_thread(&[usize::MAX]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
