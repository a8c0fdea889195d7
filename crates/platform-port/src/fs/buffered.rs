// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Read-into-buffer variant.

use super::{empty_region, open_regular_file, read_into_buffer, FileSystem};
use crate::{PortError, ReadOnlyMemoryRegion};
use std::path::Path;

/// Loads the whole file into an owned heap buffer.
///
/// This is the selected variant on targets without memory mapping. It is
/// available everywhere so hosts can opt out of mapping explicitly, e.g.
/// for files on removable storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferedFileSystem;

impl FileSystem for BufferedFileSystem {
    fn name(&self) -> &'static str {
        "buffered-read"
    }

    fn new_read_only_memory_region_from_file(
        &self,
        path: &Path,
    ) -> Result<ReadOnlyMemoryRegion, PortError> {
        let (mut file, len) = open_regular_file(path)?;
        if len == 0 {
            return Ok(empty_region());
        }

        let region = read_into_buffer(path, &mut file, len)?;
        tracing::debug!("read {} ({} bytes)", path.display(), len);
        Ok(region)
    }
}
