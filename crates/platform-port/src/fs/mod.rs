// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Platform-polymorphic file-system port.
//!
//! [`FileSystem`] is the only thing callers depend on. Each target gets one
//! implementation, picked at compile time:
//!
//! | Target | Variant | Strategy |
//! |---|---|---|
//! | Linux, Android, macOS, iOS | [`PosixFileSystem`] | `mmap`, buffered read if the filesystem cannot map |
//! | Windows | [`WindowsFileSystem`] | file mapping |
//! | anything else | [`BufferedFileSystem`] | whole-file read |
//!
//! All variants are stateless unit structs; the only shared state is the
//! OS descriptor table.

mod buffered;
#[cfg(unix)]
mod posix;
#[cfg(windows)]
mod windows;

pub use buffered::BufferedFileSystem;
#[cfg(unix)]
pub use posix::PosixFileSystem;
#[cfg(windows)]
pub use windows::WindowsFileSystem;

#[cfg(unix)]
pub use posix::PosixFileSystem as CurrentFileSystem;
#[cfg(windows)]
pub use windows::WindowsFileSystem as CurrentFileSystem;
#[cfg(not(any(unix, windows)))]
pub use buffered::BufferedFileSystem as CurrentFileSystem;

use crate::region::{Backing, ReadOnlyMemoryRegion};
use crate::PortError;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::path::Path;

/// Produces read-only memory regions from file paths.
pub trait FileSystem: Send + Sync {
    /// Short identifier of the variant, for logs.
    fn name(&self) -> &'static str;

    /// Opens `path` and returns a region holding its full contents.
    ///
    /// `path` must name an existing, readable, regular file. A zero-length
    /// file yields a zero-length region.
    ///
    /// # Errors
    /// - [`PortError::NotFound`] if the path does not exist.
    /// - [`PortError::PermissionDenied`] if the file cannot be read.
    /// - [`PortError::Io`] if the path is not a regular file, or sizing,
    ///   mapping, or reading fails.
    fn new_read_only_memory_region_from_file(
        &self,
        path: &Path,
    ) -> Result<ReadOnlyMemoryRegion, PortError>;
}

static CURRENT: CurrentFileSystem = CurrentFileSystem;

/// Returns the file-system variant for the platform this crate was built for.
pub fn file_system() -> &'static dyn FileSystem {
    &CURRENT
}

fn not_regular(path: &Path) -> PortError {
    PortError::io(path, io::ErrorKind::InvalidInput, "not a regular file")
}

/// Opens `path` for reading and returns the file together with its size.
///
/// Anything but a regular file is rejected before it is opened, so FIFOs
/// and devices never block the caller.
pub(crate) fn open_regular_file(path: &Path) -> Result<(File, usize), PortError> {
    let pre = std::fs::metadata(path).map_err(|e| PortError::from_io(path, e))?;
    if !pre.is_file() {
        return Err(not_regular(path));
    }

    let mut options = OpenOptions::new();
    options.read(true);
    // Covers a path swapped for a FIFO between the stat and the open.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NONBLOCK);
    }
    let file = options.open(path).map_err(|e| PortError::from_io(path, e))?;

    let meta = file.metadata().map_err(|e| PortError::from_io(path, e))?;
    if !meta.is_file() {
        return Err(not_regular(path));
    }

    let len = usize::try_from(meta.len()).map_err(|_| {
        PortError::io(
            path,
            io::ErrorKind::Other,
            format!("file of {} bytes does not fit the address space", meta.len()),
        )
    })?;

    Ok((file, len))
}

/// Maps the first `len` bytes of `file` read-only.
#[cfg(any(unix, windows))]
pub(crate) fn map_file(file: &File, len: usize) -> io::Result<memmap2::Mmap> {
    // SAFETY: the mapping is read-only. Model artifacts are immutable while
    // loaded; truncating a file that is mapped elsewhere is the caller's
    // responsibility.
    unsafe { memmap2::MmapOptions::new().len(len).map(file) }
}

/// Reads exactly `len` bytes of `file` into an owned buffer.
pub(crate) fn read_into_buffer(
    path: &Path,
    file: &mut File,
    len: usize,
) -> Result<ReadOnlyMemoryRegion, PortError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|e| {
        PortError::io(
            path,
            io::ErrorKind::Other,
            format!("cannot allocate {len} bytes: {e}"),
        )
    })?;
    buf.resize(len, 0);
    file.read_exact(&mut buf)
        .map_err(|e| PortError::from_io(path, e))?;

    Ok(ReadOnlyMemoryRegion::new(Backing::Buffered(
        buf.into_boxed_slice(),
    )))
}

/// Region for a zero-length file.
pub(crate) fn empty_region() -> ReadOnlyMemoryRegion {
    ReadOnlyMemoryRegion::new(Backing::Empty)
}
