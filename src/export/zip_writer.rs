//! Write rendered parts into a ZIP container.
//!
//! Entries are written in the order given with fixed timestamps, so equal
//! parts always produce equal archives.

use std::fs;
use std::io::{Seek, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use zip::write::FileOptions;
use zip::ZipWriter;

use crate::error::Result;
use crate::options::Compression;

use super::Part;

/// Write every part into a new archive on `writer` and return the writer.
pub(crate) fn write_package<W: Write + Seek>(
    parts: &[Part],
    writer: W,
    compression: Compression,
) -> Result<W> {
    let options = FileOptions::default()
        .compression_method(compression.method())
        .last_modified_time(zip::DateTime::default());
    let mut zip = ZipWriter::new(writer);
    for part in parts {
        zip.start_file(part.name.as_str(), options)?;
        zip.write_all(&part.data)?;
        log::trace!("wrote {} ({} bytes)", part.name, part.data.len());
    }
    Ok(zip.finish()?)
}

/// Write the archive next to `dest` and rename it into place.
///
/// The destination is only replaced once the archive is complete and synced;
/// on failure the temporary file is removed and `dest` is left as it was.
pub(crate) fn save_package(parts: &[Part], dest: &Path, compression: Compression) -> Result<()> {
    let dir = parent_dir_or_dot(dest);
    let mut tmp = NamedTempFile::new_in(dir)?;

    let written = write_package(parts, tmp.as_file_mut(), compression)
        .and_then(|file| Ok(file.sync_all()?));
    if let Err(err) = written {
        log::warn!(
            "discarding temporary file {} after failed save: {err}",
            tmp.path().display()
        );
        return Err(err);
    }

    if let Err(err) = tmp.persist(dest) {
        log::warn!(
            "discarding temporary file {} after failed rename: {}",
            err.file.path().display(),
            err.error
        );
        return Err(err.error.into());
    }

    // Best effort: the file is already in place.
    if let Ok(dir) = fs::File::open(dir) {
        let _ = dir.sync_all();
    }
    Ok(())
}

fn parent_dir_or_dot(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn parts() -> Vec<Part> {
        vec![
            Part {
                name: "b.xml".to_string(),
                data: b"<b/>".to_vec(),
            },
            Part {
                name: "a/a.xml".to_string(),
                data: b"<a/>".to_vec(),
            },
        ]
    }

    #[test]
    fn test_entries_keep_given_order() {
        let cursor = write_package(&parts(), Cursor::new(Vec::new()), Compression::Deflated).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert_eq!(archive.by_index(0).unwrap().name(), "b.xml");
        assert_eq!(names.len(), 2);

        let mut body = String::new();
        archive.by_name("a/a.xml").unwrap().read_to_string(&mut body).unwrap();
        assert_eq!(body, "<a/>");
    }

    #[test]
    fn test_stored_compression() {
        let cursor = write_package(&parts(), Cursor::new(Vec::new()), Compression::Stored).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let entry = archive.by_index(0).unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Stored);
    }

    #[test]
    fn test_output_is_deterministic() {
        let a = write_package(&parts(), Cursor::new(Vec::new()), Compression::Deflated).unwrap();
        let b = write_package(&parts(), Cursor::new(Vec::new()), Compression::Deflated).unwrap();
        assert_eq!(a.into_inner(), b.into_inner());
    }

    #[test]
    fn test_save_replaces_destination() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.zip");
        std::fs::write(&dest, b"old").unwrap();
        save_package(&parts(), &dest, Compression::Deflated).unwrap();
        let bytes = std::fs::read(&dest).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_rename_leaves_destination_and_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory cannot be replaced by a file
        let dest = dir.path().join("taken");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep.txt"), b"keep").unwrap();

        assert!(save_package(&parts(), &dest, Compression::Deflated).is_err());
        assert!(dest.is_dir());
        assert_eq!(std::fs::read(dest.join("keep.txt")).unwrap(), b"keep");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_parent_dir_or_dot() {
        assert_eq!(parent_dir_or_dot(Path::new("book.xlsx")), Path::new("."));
        assert_eq!(parent_dir_or_dot(Path::new("out/book.xlsx")), Path::new("out"));
    }
}
