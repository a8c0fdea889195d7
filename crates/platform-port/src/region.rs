// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! RAII read-only view over file-backed bytes.
//!
//! A [`ReadOnlyMemoryRegion`] owns whatever resource backs its bytes: a
//! memory-mapped segment or a heap buffer filled by a plain read. Dropping
//! the region unmaps or frees that resource, on every exit path, exactly
//! once. The type is neither `Clone` nor mutable, so the bytes it hands out
//! stay valid and unchanged for as long as the borrow lasts.

use std::fmt;
use std::ops::Deref;

/// The resource holding a region's bytes.
pub(crate) enum Backing {
    /// Zero-length file. Nothing is mapped or allocated.
    Empty,
    /// Memory-mapped file segment.
    Mapped(memmap2::Mmap),
    /// Whole-file copy, used where mapping is unavailable.
    Buffered(Box<[u8]>),
}

/// An immutable view over the full contents of a file.
///
/// Created only by a [`FileSystem`](crate::FileSystem). Which loading
/// strategy produced the bytes is not observable through this type.
///
/// # Example
/// ```no_run
/// let fs = platform_port::file_system();
/// let region = fs
///     .new_read_only_memory_region_from_file("model.bin".as_ref())
///     .expect("cannot load weights");
/// println!("{} bytes", region.length());
/// ```
pub struct ReadOnlyMemoryRegion {
    backing: Backing,
}

impl ReadOnlyMemoryRegion {
    pub(crate) fn new(backing: Backing) -> Self {
        Self { backing }
    }

    /// Returns the region's bytes.
    ///
    /// For a zero-length region this is an empty slice whose pointer is
    /// non-null and well aligned.
    pub fn data(&self) -> &[u8] {
        match &self.backing {
            Backing::Empty => &[],
            Backing::Mapped(mmap) => mmap,
            Backing::Buffered(buf) => buf,
        }
    }

    /// Returns the region's length in bytes.
    pub fn length(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` if the region holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Returns the base address of the region.
    pub fn as_ptr(&self) -> *const u8 {
        self.data().as_ptr()
    }

    #[cfg(test)]
    pub(crate) fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}

impl Deref for ReadOnlyMemoryRegion {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.data()
    }
}

impl AsRef<[u8]> for ReadOnlyMemoryRegion {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl Drop for ReadOnlyMemoryRegion {
    fn drop(&mut self) {
        if !matches!(self.backing, Backing::Empty) {
            tracing::trace!("releasing memory region ({} bytes)", self.length());
        }
    }
}

impl fmt::Debug for ReadOnlyMemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOnlyMemoryRegion")
            .field("length", &self.length())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_region() {
        let region = ReadOnlyMemoryRegion::new(Backing::Empty);
        assert_eq!(region.length(), 0);
        assert!(region.is_empty());
        assert!(!region.as_ptr().is_null());
        assert_eq!(region.data(), &[] as &[u8]);
    }

    #[test]
    fn test_buffered_region() {
        let region = ReadOnlyMemoryRegion::new(Backing::Buffered(vec![1u8, 2, 3].into_boxed_slice()));
        assert_eq!(region.length(), 3);
        assert_eq!(&region[..], &[1, 2, 3]);
        assert!(!region.is_mapped());
    }

    #[test]
    fn test_region_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReadOnlyMemoryRegion>();
    }

    #[test]
    fn test_debug_hides_backing() {
        let region = ReadOnlyMemoryRegion::new(Backing::Buffered(vec![0u8; 8].into_boxed_slice()));
        let dbg = format!("{region:?}");
        assert!(dbg.contains("length: 8"));
        assert!(!dbg.contains("Buffered"));
    }
}
