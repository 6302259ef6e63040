#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use std::io::{Read, Write};
use tempfile::TempDir;

pub fn utf8_root(td: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8 tempdir")
}

/// Write a zip at `path` with the given entries, in order.
pub fn write_zip(path: &Utf8Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, content) in entries {
        writer.start_file(name.to_string(), options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

/// Entry names and contents of the zip at `path`, in archive order.
pub fn read_zip(path: &Utf8Path) -> Vec<(String, Vec<u8>)> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut out = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        out.push((entry.name().to_string(), buf));
    }
    out
}

pub fn entry<'a>(entries: &'a [(String, Vec<u8>)], name: &str) -> &'a [u8] {
    entries
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, bytes)| bytes.as_slice())
        .unwrap_or_else(|| panic!("missing entry {name}"))
}

pub fn scratch_of(archive: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{archive}_temp"))
}
