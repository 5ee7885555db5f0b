//! Convenience functions for one-shot file operations.
//!
//! Every function acquires its file handle for the duration of the call only,
//! and maps failures to [`FileError`] carrying the offending path.

use std::fs;
use std::path::Path;

use super::error::{FileError, FileResult};
use super::writer::AtomicWriter;

/// Reads the entire contents of a file as a string.
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The file is not valid UTF-8
pub fn read_text(path: impl AsRef<Path>) -> FileResult<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FileError::from_io(e, path))
}

/// Writes a file atomically using a temporary file and rename.
///
/// The write either succeeds completely or leaves any existing file
/// untouched.
///
/// ```ignore
/// use yamlview::file::atomic_write;
///
/// atomic_write("document.yaml", |w| w.write_str("a: 1\n"))?;
/// ```
pub fn atomic_write<F>(path: impl AsRef<Path>, f: F) -> FileResult<()>
where
    F: FnOnce(&mut AtomicWriter) -> FileResult<()>,
{
    AtomicWriter::write(path, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileErrorKind;

    #[test]
    fn test_read_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.yaml");
        fs::write(&path, "title: notes\n").unwrap();

        assert_eq!(read_text(&path).unwrap(), "title: notes\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_text(dir.path().join("absent.yaml")).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::NotFound);
    }

    #[test]
    fn test_read_non_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.yaml");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_text(&path).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::InvalidData);
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");

        atomic_write(&path, |w| w.write_str("a: 1\n")).unwrap();
        assert_eq!(read_text(&path).unwrap(), "a: 1\n");
    }
}
