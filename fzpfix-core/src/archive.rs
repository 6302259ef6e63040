//! Extract, repair and repack a single archive.

use crate::error::ArchiveError;
use crate::scratch::ScratchDir;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use fzpfix_patch::repair_definition;
use fzpfix_types::report::{ArchiveResult, ArchiveStatus, DefinitionResult};
use fzpfix_types::PatchMode;
use sha2::{Digest, Sha256};
use std::io::{self, Cursor, Read, Seek, Write};
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Suffix of the part definition files that get repaired.
pub const DEFINITION_EXTENSION: &str = ".fzp";

#[derive(Debug, Clone, Copy, Default)]
pub struct PatchOptions {
    pub mode: PatchMode,
    /// Repair inside the scratch directory only; never rewrite the archive.
    pub dry_run: bool,
}

/// Extract `archive`, repair its definitions, and repack it in place if
/// anything changed.
///
/// The scratch directory is removed before this returns, on success and on
/// error alike. An archive that needs no changes is never written to.
pub fn patch_archive(
    archive: &Utf8Path,
    opts: &PatchOptions,
) -> Result<ArchiveResult, ArchiveError> {
    let original = fs::read(archive).map_err(ArchiveError::io(archive))?;
    let sha256_before = sha256_hex(&original);

    let scratch = ScratchDir::create_for(archive)?;
    let entries = extract(archive, Cursor::new(original.as_slice()), scratch.path())?;
    let files = list_files(scratch.path())?;

    let mut modified = false;
    let mut definitions = Vec::new();
    for rel in files.iter().filter(|rel| is_definition(rel)) {
        let abs = scratch.path().join(rel);
        info!(archive = %archive, definition = %rel, "processing definition");

        let before = fs::read(&abs).map_err(ArchiveError::io(&abs))?;
        let repair = repair_definition(&before, opts.mode);
        if repair.changed {
            modified = true;
            fs::write(&abs, &repair.bytes).map_err(ArchiveError::io(&abs))?;
        }

        definitions.push(DefinitionResult {
            path: entry_name(rel),
            nulls_removed: repair.nulls_removed as u64,
            invalid_bytes_dropped: repair.invalid_bytes_dropped as u64,
            separators_inserted: repair.separators_inserted as u64,
            changed: repair.changed,
        });
    }

    let (status, sha256_after) = if !modified {
        info!(archive = %archive, "no modifications were made, skipping repackaging");
        (ArchiveStatus::Unchanged, None)
    } else if opts.dry_run {
        info!(archive = %archive, "dry run: archive would be rewritten");
        (ArchiveStatus::WouldRewrite, None)
    } else {
        let sha = repack(archive, scratch.path(), &files)?;
        info!(archive = %archive, "original file overwritten");
        (ArchiveStatus::Rewritten, Some(sha))
    };

    Ok(ArchiveResult {
        path: archive.to_path_buf(),
        status,
        definitions,
        entries,
        sha256_before: Some(sha256_before),
        sha256_after,
        error: None,
    })
}

fn is_definition(rel: &Utf8Path) -> bool {
    rel.file_name()
        .is_some_and(|name| name.ends_with(DEFINITION_EXTENSION))
}

/// Unpack every entry of `reader` under `dest`, keeping relative paths.
/// Returns the number of file entries written.
fn extract<R: Read + Seek>(
    archive: &Utf8Path,
    reader: R,
    dest: &Utf8Path,
) -> Result<u64, ArchiveError> {
    let format_err = |source: zip::result::ZipError| ArchiveError::Format {
        path: archive.to_path_buf(),
        source,
    };

    let mut zip = ZipArchive::new(reader).map_err(format_err)?;
    let mut count = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(format_err)?;

        let rel = entry
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .and_then(|p| Utf8PathBuf::from_path_buf(p).ok());
        let Some(rel) = rel else {
            return Err(ArchiveError::UnsafeEntry {
                archive: archive.to_path_buf(),
                entry: entry.name().to_string(),
            });
        };

        let out = dest.join(&rel);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(ArchiveError::io(&out))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(ArchiveError::io(parent))?;
        }

        let mut file = fs::File::create(&out).map_err(ArchiveError::io(&out))?;
        io::copy(&mut entry, &mut file).map_err(ArchiveError::io(&out))?;
        debug!(archive = %archive, entry = %rel, "extracted entry");
        count += 1;
    }
    Ok(count)
}

/// Every regular file under `root`, relative to it, in lexicographic order.
fn list_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ArchiveError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| ArchiveError::Io {
            path: root.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(Utf8Path::from_path)
            .map(Utf8Path::to_path_buf)
            .ok_or_else(|| ArchiveError::Io {
                path: root.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("unexpected path {}", entry.path().display()),
                ),
            })?;
        out.push(rel);
    }
    out.sort();
    Ok(out)
}

/// Archive entry name for a scratch-relative path: `/`-separated on every
/// platform.
fn entry_name(rel: &Utf8Path) -> String {
    rel.components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write `files` from `scratch` into a fresh archive and move it over
/// `archive`. Returns the sha256 of the new archive.
///
/// The new archive is staged in a temporary file beside the original, so a
/// failure part-way through leaves the original intact. When `archive` is a
/// symlink the link target is replaced and the link itself is kept.
///
/// Every entry carries the same fixed timestamp, so repacking identical
/// content always yields identical bytes.
fn repack(
    archive: &Utf8Path,
    scratch: &Utf8Path,
    files: &[Utf8PathBuf],
) -> Result<String, ArchiveError> {
    let target = archive
        .canonicalize_utf8()
        .map_err(ArchiveError::io(archive))?;
    let parent = target
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or(Utf8Path::new("."));
    let permissions = fs::metadata(&target)
        .map_err(ArchiveError::io(archive))?
        .permissions();
    let repack_err = |source: zip::result::ZipError| ArchiveError::Repack {
        path: archive.to_path_buf(),
        source,
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".fzpfix-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(ArchiveError::io(parent))?;

    {
        let mut writer = ZipWriter::new(staged.as_file_mut());
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        for rel in files {
            let abs = scratch.join(rel);
            let bytes = fs::read(&abs).map_err(ArchiveError::io(&abs))?;
            writer.start_file(entry_name(rel), options).map_err(repack_err)?;
            writer
                .write_all(&bytes)
                .map_err(ArchiveError::io(archive))?;
        }
        writer.finish().map_err(repack_err)?;
    }

    fs::set_permissions(staged.path(), permissions).map_err(ArchiveError::io(&target))?;
    staged
        .persist(&target)
        .map_err(|e| ArchiveError::io(&target)(e.error))?;

    let written = fs::read(&target).map_err(ArchiveError::io(&target))?;
    Ok(sha256_hex(&written))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
