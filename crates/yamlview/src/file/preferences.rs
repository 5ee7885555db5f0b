//! Persisted user preferences.
//!
//! The viewer remembers the last directory used in an Open or Save dialog.
//! Preferences are a small YAML file:
//!
//! ```yaml
//! directory: /home/user/projects
//! ```
//!
//! Keys this version does not know about are kept and written back unchanged.
//!
//! Reading is best-effort: a missing or malformed file yields defaults.
//! Writing goes through [`atomic_write`] and reports failures to the caller,
//! which logs them and carries on.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use yamlview_core::logging::targets;

use super::error::{FileError, FileErrorKind, FileResult};
use super::operations::{atomic_write, read_text};

/// File name of the preference file inside the configuration directory.
pub const PREFERENCES_FILE: &str = "yamlview.yaml";

/// User preferences carried across sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Directory the file chooser starts in.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_directory() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Preferences {
    /// Default location of the preference file, `<config_dir>/yamlview/yamlview.yaml`.
    ///
    /// Returns `None` when the platform has no notion of a configuration
    /// directory for the current user.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "yamlview").map(|dirs| dirs.config_dir().join(PREFERENCES_FILE))
    }

    /// Reads preferences from `path`, falling back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(prefs) => {
                tracing::debug!(target: targets::PREFERENCES, path = %path.display(), "preferences loaded");
                prefs
            }
            Err(err) => {
                tracing::debug!(target: targets::PREFERENCES, %err, "using default preferences");
                Self::default()
            }
        }
    }

    /// Reads preferences from `path`.
    ///
    /// An empty file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> FileResult<Self> {
        let path = path.as_ref();
        let content = read_text(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| {
            FileError::new(
                FileErrorKind::InvalidData,
                Some(path.to_path_buf()),
                Some(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            )
        })
    }

    /// Writes preferences to `path`, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> FileResult<()> {
        let path = path.as_ref();
        let text = serde_yaml::to_string(self).map_err(|e| {
            FileError::new(
                FileErrorKind::InvalidData,
                Some(path.to_path_buf()),
                Some(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
            )
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| FileError::from_io(e, parent))?;
        }

        atomic_write(path, |writer| writer.write_str(&text))?;
        tracing::debug!(target: targets::PREFERENCES, path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Records the directory containing `file` as the chooser's start point.
    ///
    /// Paths without a parent leave the preference unchanged.
    pub fn remember_file(&mut self, file: &Path) {
        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.directory = parent.to_path_buf();
        }
    }
}
