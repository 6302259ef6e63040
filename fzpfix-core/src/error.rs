//! Error types for archive processing.
//!
//! Two families matter to callers:
//! - Filesystem errors (scratch creation, reading or writing extracted files).
//! - Format errors (the file is not a zip container, or is corrupted).
//!
//! Undecodable text inside a definition is never an error; it is dropped.

use camino::Utf8PathBuf;
use thiserror::Error;
use zip::result::ZipError;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("create scratch directory {path}: {source}")]
    Scratch {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("io error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("invalid archive {path}: {source}")]
    Format { path: Utf8PathBuf, source: ZipError },

    /// An entry name that would land outside the scratch directory.
    #[error("entry {entry:?} in {archive} escapes the extraction directory")]
    UnsafeEntry { archive: Utf8PathBuf, entry: String },

    #[error("repack {path}: {source}")]
    Repack { path: Utf8PathBuf, source: ZipError },
}

impl ArchiveError {
    /// Returns true when the archive itself is malformed, as opposed to a
    /// filesystem problem on our side.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ArchiveError::Format { .. } | ArchiveError::UnsafeEntry { .. }
        )
    }

    pub(crate) fn io(path: impl Into<Utf8PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ArchiveError::Io { path, source }
    }
}
