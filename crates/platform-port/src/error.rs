// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the file-system port.

use std::io;
use std::path::Path;

/// Errors returned when a file cannot be turned into a memory region.
///
/// Each failure class is its own variant so that model-loading code can
/// branch on it without string matching.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The path does not name an existing file.
    #[error("file not found: {path}")]
    NotFound { path: String },

    /// The file exists but the process may not read it.
    #[error("permission denied: {path}")]
    PermissionDenied { path: String },

    /// Opening, sizing, mapping, or reading the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Coarse classification of a [`PortError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortErrorKind {
    NotFound,
    PermissionDenied,
    Io,
}

impl PortError {
    /// Classifies an OS error raised while accessing `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => PortError::NotFound { path },
            io::ErrorKind::PermissionDenied => PortError::PermissionDenied { path },
            _ => PortError::Io { path, source: err },
        }
    }

    /// Builds an [`PortError::Io`] from a message.
    pub(crate) fn io(path: &Path, kind: io::ErrorKind, detail: impl Into<String>) -> Self {
        PortError::Io {
            path: path.display().to_string(),
            source: io::Error::new(kind, detail.into()),
        }
    }

    /// Returns the failure class.
    pub fn kind(&self) -> PortErrorKind {
        match self {
            PortError::NotFound { .. } => PortErrorKind::NotFound,
            PortError::PermissionDenied { .. } => PortErrorKind::PermissionDenied,
            PortError::Io { .. } => PortErrorKind::Io,
        }
    }

    /// Returns the path the error refers to.
    pub fn path(&self) -> &str {
        match self {
            PortError::NotFound { path }
            | PortError::PermissionDenied { path }
            | PortError::Io { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = PortError::from_io(
            Path::new("/models/missing.bin"),
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), PortErrorKind::NotFound);
        assert_eq!(err.path(), "/models/missing.bin");
    }

    #[test]
    fn test_permission_classification() {
        let err = PortError::from_io(
            Path::new("/models/locked.bin"),
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), PortErrorKind::PermissionDenied);
    }

    #[test]
    fn test_other_errors_are_io() {
        let err = PortError::from_io(
            Path::new("/models/weights.bin"),
            io::Error::new(io::ErrorKind::Other, "mmap failed"),
        );
        assert_eq!(err.kind(), PortErrorKind::Io);
        assert!(err.to_string().contains("mmap failed"));
    }
}
