//! Atomic file writing.
//!
//! Documents and preferences are written through [`AtomicWriter`]: data goes
//! to a temporary sibling file which is synced and renamed over the target
//! only on [`commit`](AtomicWriter::commit). A failed or abandoned write
//! leaves any previous file untouched and removes the temporary file.
//! When the target already exists its permissions are carried over to the
//! replacement.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::error::{FileError, FileResult};

/// Performs atomic file writes using a temporary file and rename.
///
/// # Example
///
/// ```ignore
/// use yamlview::file::AtomicWriter;
///
/// AtomicWriter::write("document.yaml", |w| w.write_str("key: value\n"))?;
/// ```
pub struct AtomicWriter {
    target_path: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<fs::File>>,
    committed: bool,
}

impl AtomicWriter {
    /// Creates a new atomic writer for the given target path.
    ///
    /// The temporary file is created in the target's directory so the final
    /// rename never crosses filesystems.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> FileResult<Self> {
        let target_path = path.as_ref().to_path_buf();

        let parent = match target_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = target_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());

        let temp_name = format!(".{}.tmp.{}", file_name, std::process::id());
        let temp_path = parent.join(temp_name);

        let file = fs::File::create(&temp_path).map_err(|e| FileError::from_io(e, &target_path))?;

        Ok(Self {
            target_path,
            temp_path,
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    /// Performs an atomic write with a closure, committing on success.
    pub fn write<F>(path: impl AsRef<Path>, f: F) -> FileResult<()>
    where
        F: FnOnce(&mut AtomicWriter) -> FileResult<()>,
    {
        let mut writer = Self::new(path)?;
        f(&mut writer)?;
        writer.commit()
    }

    fn consumed_error(&self) -> FileError {
        FileError::from_io(io::Error::other("AtomicWriter already consumed"), &self.target_path)
    }

    /// Writes all bytes to the temporary file.
    pub fn write_all(&mut self, buf: &[u8]) -> FileResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.consumed_error());
        };
        writer
            .write_all(buf)
            .map_err(|e| FileError::from_io(e, &self.target_path))
    }

    /// Writes a string to the temporary file.
    pub fn write_str(&mut self, s: &str) -> FileResult<()> {
        self.write_all(s.as_bytes())
    }

    /// Commits the write, replacing the target file atomically.
    ///
    /// An existing target's permissions are applied to the new file first.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush, sync, or rename fails. The temporary
    /// file is then removed by `Drop` and the previous file is unchanged.
    pub fn commit(mut self) -> FileResult<()> {
        let Some(mut writer) = self.writer.take() else {
            return Err(self.consumed_error());
        };

        writer
            .flush()
            .map_err(|e| FileError::from_io(e, &self.target_path))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| FileError::from_io(e, &self.target_path))?;

        // Close the handle before renaming.
        drop(writer);

        if let Ok(metadata) = fs::metadata(&self.target_path) {
            fs::set_permissions(&self.temp_path, metadata.permissions())
                .map_err(|e| FileError::from_io(e, &self.target_path))?;
        }

        fs::rename(&self.temp_path, &self.target_path)
            .map_err(|e| FileError::from_io(e, &self.target_path))?;

        self.committed = true;
        Ok(())
    }
}

impl Drop for AtomicWriter {
    fn drop(&mut self) {
        if !self.committed {
            self.writer.take();
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

impl std::fmt::Debug for AtomicWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtomicWriter")
            .field("target_path", &self.target_path)
            .field("temp_path", &self.temp_path)
            .field("committed", &self.committed)
            .finish_non_exhaustive()
    }
}
