//! Error types for file operations.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error type for file operations.
///
/// Carries the classified [`FileErrorKind`], the path involved (when known)
/// and the underlying I/O error.
#[derive(Debug)]
pub struct FileError {
    kind: FileErrorKind,
    path: Option<PathBuf>,
    source: Option<io::Error>,
}

/// The kind of file error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// File or directory not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path or filename.
    InvalidPath,
    /// The path is a directory, not a file.
    IsDirectory,
    /// No space left on device.
    NoSpace,
    /// Read-only filesystem.
    ReadOnly,
    /// Invalid data or encoding (e.g. a document that is not UTF-8).
    InvalidData,
    /// An unknown or unclassified error occurred.
    Other,
}

impl FileErrorKind {
    fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidFilename => Self::InvalidPath,
            io::ErrorKind::IsADirectory => Self::IsDirectory,
            io::ErrorKind::StorageFull => Self::NoSpace,
            io::ErrorKind::ReadOnlyFilesystem => Self::ReadOnly,
            io::ErrorKind::InvalidData => Self::InvalidData,
            _ => Self::Other,
        }
    }
}

impl FileError {
    /// Creates a new file error.
    pub fn new(kind: FileErrorKind, path: Option<PathBuf>, source: Option<io::Error>) -> Self {
        Self { kind, path, source }
    }

    /// Creates a file error from an I/O error and path.
    pub fn from_io(err: io::Error, path: impl AsRef<Path>) -> Self {
        Self {
            kind: FileErrorKind::from_io(err.kind()),
            path: Some(path.as_ref().to_path_buf()),
            source: Some(err),
        }
    }

    /// Creates a "not found" error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotFound, Some(path.into()), None)
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> FileErrorKind {
        self.kind
    }

    /// Returns the path involved in the error, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }

    /// Returns true if this error indicates the file was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == FileErrorKind::NotFound
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", self.kind, path.display()),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::NotFound => write!(f, "file not found"),
            FileErrorKind::PermissionDenied => write!(f, "permission denied"),
            FileErrorKind::InvalidPath => write!(f, "invalid path"),
            FileErrorKind::IsDirectory => write!(f, "is a directory"),
            FileErrorKind::NoSpace => write!(f, "no space left on device"),
            FileErrorKind::ReadOnly => write!(f, "read-only filesystem"),
            FileErrorKind::InvalidData => write!(f, "invalid data"),
            FileErrorKind::Other => write!(f, "file error"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: FileErrorKind::from_io(err.kind()),
            path: None,
            source: Some(err),
        }
    }
}

/// A specialized Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;
