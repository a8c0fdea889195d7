// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Windows variant.

use super::{empty_region, map_file, open_regular_file, FileSystem};
use crate::{PortError, ReadOnlyMemoryRegion};
use std::path::Path;

/// Maps files through `CreateFileMapping`/`MapViewOfFile`.
///
/// Windows cannot create a view of an empty file, so zero-length files
/// short-circuit to an empty region before mapping.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsFileSystem;

impl FileSystem for WindowsFileSystem {
    fn name(&self) -> &'static str {
        "windows-mapping"
    }

    fn new_read_only_memory_region_from_file(
        &self,
        path: &Path,
    ) -> Result<ReadOnlyMemoryRegion, PortError> {
        let (file, len) = open_regular_file(path)?;
        if len == 0 {
            return Ok(empty_region());
        }

        let mmap = map_file(&file, len).map_err(|e| PortError::from_io(path, e))?;
        tracing::debug!(
            "mapped view of {} ({:.2} MB)",
            path.display(),
            len as f64 / (1024.0 * 1024.0),
        );
        Ok(ReadOnlyMemoryRegion::new(crate::region::Backing::Mapped(mmap)))
    }
}
