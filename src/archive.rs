use std::fs;
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};
use log::debug;
use walkdir::WalkDir;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::errors::ArchiveError;

// @module: Mod archive extraction and repacking

/// Extract a zip-compatible archive into the destination directory.
///
/// Entries are read sequentially; directory entries create directories, file
/// entries create their parents as needed and are written byte-verbatim.
/// Entry paths that would escape the destination are rejected.
///
/// Returns the number of entries written.
pub fn extract_archive<R: Read + Seek>(reader: R, dest: &Path) -> Result<usize, ArchiveError> {
    let mut archive = ZipArchive::new(reader).map_err(|e| ArchiveError::Read(e.to_string()))?;

    let mut extracted = 0;
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::Read(e.to_string()))?;

        let relative = sanitize_entry_path(entry.name())?;
        let target = dest.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| ArchiveError::Read(e.to_string()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| ArchiveError::Read(e.to_string()))?;
            }
            let mut file =
                File::create(&target).map_err(|e| ArchiveError::Read(e.to_string()))?;
            io::copy(&mut entry, &mut file).map_err(|e| ArchiveError::Read(e.to_string()))?;
        }
        extracted += 1;
    }

    debug!("Extracted {} entries to {:?}", extracted, dest);
    Ok(extracted)
}

/// Repack a directory tree into a zip-compatible archive.
///
/// Every regular file under the root becomes one entry whose path is
/// relative to the root, with forward-slash separators for portability;
/// bytes are copied verbatim.
///
/// Returns the number of entries written.
pub fn pack_archive<W: Write + Seek>(root: &Path, writer: W) -> Result<usize, ArchiveError> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    let mut packed = 0;
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| ArchiveError::Write(e.to_string()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        let entry_name = archive_entry_name(relative);

        zip.start_file(entry_name, options)
            .map_err(|e| ArchiveError::Write(e.to_string()))?;
        let mut file = File::open(path).map_err(|e| ArchiveError::Write(e.to_string()))?;
        io::copy(&mut file, &mut zip).map_err(|e| ArchiveError::Write(e.to_string()))?;
        packed += 1;
    }

    zip.finish().map_err(|e| ArchiveError::Write(e.to_string()))?;
    debug!("Packed {} entries from {:?}", packed, root);
    Ok(packed)
}

/// Validate an entry path and strip it down to safe normal components.
///
/// Rejects absolute paths and any `..` component so a crafted archive
/// cannot write outside the extraction root.
fn sanitize_entry_path(name: &str) -> Result<PathBuf, ArchiveError> {
    let path = Path::new(name);
    let mut sanitized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => sanitized.push(part),
            Component::CurDir => {}
            _ => return Err(ArchiveError::UnsafePath(name.to_string())),
        }
    }

    if sanitized.as_os_str().is_empty() {
        return Err(ArchiveError::UnsafePath(name.to_string()));
    }

    Ok(sanitized)
}

/// Build an archive entry name from a relative path, always using `/`
fn archive_entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
