// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! POSIX variant (Linux, Android, macOS, iOS).

use super::{empty_region, map_file, open_regular_file, read_into_buffer, FileSystem};
use crate::{PortError, ReadOnlyMemoryRegion};
use std::io;
use std::path::Path;

/// Maps files with `mmap(PROT_READ, MAP_SHARED)`.
///
/// Files living on filesystems that refuse mappings (`ENODEV`, e.g. some
/// FUSE and procfs-like mounts) are read into a buffer instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixFileSystem;

impl FileSystem for PosixFileSystem {
    fn name(&self) -> &'static str {
        "posix-mmap"
    }

    fn new_read_only_memory_region_from_file(
        &self,
        path: &Path,
    ) -> Result<ReadOnlyMemoryRegion, PortError> {
        let (mut file, len) = open_regular_file(path)?;
        if len == 0 {
            tracing::debug!("'{}' is empty, returning zero-length region", path.display());
            return Ok(empty_region());
        }

        match map_file(&file, len) {
            Ok(mmap) => {
                tracing::debug!(
                    "mmap'd {} ({:.2} MB)",
                    path.display(),
                    len as f64 / (1024.0 * 1024.0),
                );
                Ok(ReadOnlyMemoryRegion::new(crate::region::Backing::Mapped(mmap)))
            }
            Err(e) if mapping_unsupported(&e) => {
                tracing::warn!(
                    "'{}' cannot be mapped ({e}), reading into memory",
                    path.display(),
                );
                read_into_buffer(path, &mut file, len)
            }
            Err(e) => Err(PortError::from_io(path, e)),
        }
    }
}

fn mapping_unsupported(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ENODEV) || err.kind() == io::ErrorKind::Unsupported
}
