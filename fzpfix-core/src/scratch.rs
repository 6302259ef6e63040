//! Per-archive scratch directory.

use crate::error::ArchiveError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, warn};

/// Appended to an archive path to name its scratch directory.
pub const SCRATCH_SUFFIX: &str = "_temp";

/// `<archive path>_temp`, a sibling of the archive.
pub fn scratch_path_for(archive: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}{}", archive, SCRATCH_SUFFIX))
}

/// Extraction workspace for one archive, removed with everything in it when
/// dropped.
#[derive(Debug)]
pub struct ScratchDir {
    path: Utf8PathBuf,
}

impl ScratchDir {
    /// Create the scratch directory for `archive`.
    ///
    /// A directory already at that path is left over from an interrupted run and
    /// is removed first, so stale files never end up in a repacked archive.
    /// Anything else at that path is not ours to delete and is an error.
    pub fn create_for(archive: &Utf8Path) -> Result<Self, ArchiveError> {
        let path = scratch_path_for(archive);
        let scratch_err = |source: std::io::Error| ArchiveError::Scratch {
            path: path.clone(),
            source,
        };

        if let Ok(meta) = fs::symlink_metadata(&path) {
            if !meta.is_dir() {
                return Err(scratch_err(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                )));
            }
            warn!(path = %path, "removing stale scratch directory");
            fs::remove_dir_all(&path).map_err(scratch_err)?;
        }

        fs::create_dir_all(&path).map_err(scratch_err)?;
        debug!(path = %path, "created scratch directory");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path, "removed scratch directory"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path, error = %e, "failed to remove scratch directory"),
        }
    }
}
