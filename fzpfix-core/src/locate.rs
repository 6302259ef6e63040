//! Archive discovery.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// File name suffixes of Fritzing part and bin archives. Matched exactly and
/// case-sensitively.
pub const ARCHIVE_EXTENSIONS: [&str; 2] = [".fzpz", ".fzbz"];

pub fn is_archive_name(name: &str) -> bool {
    ARCHIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Every file under `root` whose name has an archive suffix.
///
/// Symlinked directories are not descended into. A symlink to a regular file
/// counts as an archive; when several paths resolve to the same file only the
/// first in sorted order is kept, so each archive is patched once.
/// Unreadable directories, dangling links and non-UTF-8 paths are logged and
/// skipped. The result is sorted so runs are reproducible.
pub fn find_archives(root: &Utf8Path) -> anyhow::Result<Vec<Utf8PathBuf>> {
    let meta = fs::metadata(root).with_context(|| format!("read scan root {}", root))?;
    if !meta.is_dir() {
        anyhow::bail!("scan root {} is not a directory", root);
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable path");
                continue;
            }
        };
        let file_type = entry.file_type();
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non-UTF-8 path");
            continue;
        };
        if !is_archive_name(name) {
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => path,
            Err(path) => {
                warn!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            }
        };
        if file_type.is_symlink() {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path, error = %e, "skipping dangling archive link");
                    continue;
                }
            }
        }
        out.push(path);
    }

    out.sort();

    let mut seen = HashSet::new();
    out.retain(|path| {
        let key = path.canonicalize_utf8().unwrap_or_else(|_| path.clone());
        if seen.insert(key) {
            info!(archive = %path, "found archive");
            true
        } else {
            debug!(archive = %path, "skipping archive already reached through another path");
            false
        }
    });
    Ok(out)
}
