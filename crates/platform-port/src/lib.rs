// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # platform-port
//!
//! Zero-copy access to immutable model artifacts across operating systems.
//!
//! # Key Components
//!
//! - [`FileSystem`]: the capability interface. One implementation exists
//!   per target platform; [`file_system()`] returns the one this build
//!   targets.
//! - [`ReadOnlyMemoryRegion`]: an RAII view over a file's bytes. Dropping
//!   it unmaps or frees the backing resource.
//! - [`PortError`]: `NotFound`, `PermissionDenied` and `Io`, kept apart so
//!   loaders can branch on them.
//!
//! # Ownership Model
//!
//! ```text
//! FileSystem::new_read_only_memory_region_from_file(path)
//!       │
//!       ▼
//!   ReadOnlyMemoryRegion  ◄─── owns Mmap | Box<[u8]>
//!       │
//!       │  drop()
//!       ▼
//!   munmap / free
//! ```
//!
//! Regions are `Send + Sync`: once built they never change, so they can be
//! shared across worker threads behind an `Arc`. Calls block on the OS and
//! take no locks of their own.
//!
//! # Example
//! ```no_run
//! use platform_port::file_system;
//! use std::path::Path;
//!
//! let region = file_system()
//!     .new_read_only_memory_region_from_file(Path::new("model.data"))?;
//! assert_eq!(region.length(), region.data().len());
//! # Ok::<(), platform_port::PortError>(())
//! ```

mod error;
pub mod fs;
mod region;

pub use error::{PortError, PortErrorKind};
pub use fs::{file_system, BufferedFileSystem, CurrentFileSystem, FileSystem};
#[cfg(unix)]
pub use fs::PosixFileSystem;
#[cfg(windows)]
pub use fs::WindowsFileSystem;
pub use region::ReadOnlyMemoryRegion;
