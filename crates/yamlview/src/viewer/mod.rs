//! The viewer shell.
//!
//! [`Viewer`] is what menu actions and a tree view's expand notifications
//! are wired to. It prompts for files through a [`FileChooser`], hands the
//! work to a [`DocumentController`], and reports failures through a
//! [`MessageSink`]. Nothing here touches a real widget toolkit; the
//! [`terminal`] module provides a line-oriented front-end.
//!
//! ```
//! use yamlview::document::DocumentController;
//! use yamlview::file::Preferences;
//! use yamlview::viewer::{Action, MessageLog, ScriptedChooser, Viewer};
//!
//! let mut viewer = Viewer::new(
//!     DocumentController::default(),
//!     Preferences::default(),
//!     ScriptedChooser::new([None]),
//!     MessageLog::new(),
//! );
//!
//! // A cancelled dialog does nothing.
//! assert!(viewer.trigger(Action::Open));
//! assert!(viewer.sink().messages().is_empty());
//! assert!(!viewer.trigger(Action::Quit));
//! ```

mod action;
mod chooser;
pub mod terminal;

use std::path::Path;

use yamlview_core::logging::targets;

pub use action::Action;
pub use chooser::{FileChooser, Message, MessageLevel, MessageLog, MessageSink, ScriptedChooser};

use crate::document::DocumentController;
use crate::error::{RegistryDesyncError, ViewerError};
use crate::file::Preferences;
use crate::model::{ModelIndex, NodeId};

const OPEN_TITLE: &str = "Open file";
const SAVE_TITLE: &str = "Save file";

/// Connects user actions to the document.
pub struct Viewer<C, M> {
    document: DocumentController,
    preferences: Preferences,
    chooser: C,
    sink: M,
}

impl<C: FileChooser, M: MessageSink> Viewer<C, M> {
    /// Creates a viewer around a controller.
    pub fn new(document: DocumentController, preferences: Preferences, chooser: C, sink: M) -> Self {
        Self {
            document,
            preferences,
            chooser,
            sink,
        }
    }

    /// Runs a menu action.
    ///
    /// Returns `false` for [`Action::Quit`] and `true` otherwise.
    pub fn trigger(&mut self, action: Action) -> bool {
        tracing::debug!(target: targets::VIEWER, ?action, "action triggered");
        match action {
            Action::Open => {
                self.file_open();
            }
            Action::Save => self.file_save(),
            Action::Reload => self.re_load(),
            Action::Quit => return false,
        }
        true
    }

    /// Asks for a file and opens it. Returns true if a document was loaded.
    pub fn file_open(&mut self) -> bool {
        let Some(path) = self
            .chooser
            .open_file_name(OPEN_TITLE, &self.preferences.directory)
        else {
            tracing::debug!(target: targets::VIEWER, "open cancelled");
            return false;
        };
        self.preferences.remember_file(&path);
        self.open_path(&path)
    }

    /// Asks for a file and saves the tree to it.
    pub fn file_save(&mut self) {
        let Some(path) = self
            .chooser
            .save_file_name(SAVE_TITLE, &self.preferences.directory)
        else {
            tracing::debug!(target: targets::VIEWER, "save cancelled");
            return;
        };
        self.preferences.remember_file(&path);
        self.save_path(&path);
    }

    /// Reloads the open file. Does nothing when no file is open.
    pub fn re_load(&mut self) {
        match self.document.reload() {
            Ok(true) => {}
            Ok(false) => tracing::debug!(target: targets::VIEWER, "nothing to reload"),
            Err(err) => self.report("Reload failed", err.into()),
        }
    }

    /// Opens `path` without asking. Returns true on success.
    pub fn open_path(&mut self, path: &Path) -> bool {
        match self.document.load(path) {
            Ok(()) => true,
            Err(err) => {
                self.report("Open failed", err.into());
                false
            }
        }
    }

    /// Saves to `path` without asking. Returns true on success.
    pub fn save_path(&mut self, path: &Path) -> bool {
        match self.document.save(path) {
            Ok(()) => {
                self.sink
                    .show_info("Saved", &format!("wrote {}", path.display()));
                true
            }
            Err(err) => {
                self.report("Save failed", err.into());
                false
            }
        }
    }

    /// Handles a view's expand notification for the row at `index`.
    ///
    /// Returns true if the row is now populated.
    pub fn expanded(&mut self, index: &ModelIndex) -> bool {
        match self.document.model().node_of(index) {
            Some(node) => self.expand_node(node),
            None => {
                let node = NodeId::from_internal_id(index.internal_id());
                self.report("Expand failed", RegistryDesyncError { node }.into());
                false
            }
        }
    }

    /// Populates `node`. Returns true if it is now populated.
    pub fn expand_node(&mut self, node: NodeId) -> bool {
        match self.document.on_expand(node) {
            Ok(()) => true,
            Err(err) => {
                self.report("Expand failed", err.into());
                false
            }
        }
    }

    /// Populates `node` and everything below it.
    ///
    /// Returns the number of nodes populated, or `None` on failure.
    pub fn expand_all(&mut self, node: NodeId) -> Option<usize> {
        match self.document.model().expand_all(node) {
            Ok(count) => Some(count),
            Err(err) => {
                self.report("Expand failed", err.into());
                None
            }
        }
    }

    fn report(&mut self, title: &str, err: ViewerError) {
        tracing::error!(target: targets::VIEWER, %err, "{}", title);
        self.sink.show_error(title, &err.to_string());
    }

    /// The document controller.
    pub fn document(&self) -> &DocumentController {
        &self.document
    }

    /// Mutable access to the document controller.
    pub fn document_mut(&mut self) -> &mut DocumentController {
        &mut self.document
    }

    /// Current preferences.
    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// The file chooser.
    pub fn chooser(&self) -> &C {
        &self.chooser
    }

    /// Mutable access to the file chooser.
    pub fn chooser_mut(&mut self) -> &mut C {
        &mut self.chooser
    }

    /// The message sink.
    pub fn sink(&self) -> &M {
        &self.sink
    }

    /// Mutable access to the message sink.
    pub fn sink_mut(&mut self) -> &mut M {
        &mut self.sink
    }

    /// Consumes the viewer, returning the preferences to persist.
    pub fn into_preferences(self) -> Preferences {
        self.preferences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn viewer(responses: Vec<Option<PathBuf>>) -> Viewer<ScriptedChooser, MessageLog> {
        let mut preferences = Preferences::default();
        preferences.directory = PathBuf::from("/start");
        Viewer::new(
            DocumentController::default(),
            preferences,
            ScriptedChooser::new(responses),
            MessageLog::new(),
        )
    }

    #[test]
    fn test_open_updates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "a: 1\n").unwrap();

        let mut viewer = viewer(vec![Some(path.clone())]);
        viewer.trigger(Action::Open);

        assert_eq!(viewer.chooser().requests()[0].1, PathBuf::from("/start"));
        assert_eq!(viewer.preferences().directory, dir.path());
        assert_eq!(viewer.document().current_path(), Some(path.as_path()));
        assert!(viewer.sink().messages().is_empty());
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "a: [1\n").unwrap();

        let mut viewer = viewer(vec![Some(path)]);
        viewer.trigger(Action::Open);

        let errors: Vec<_> = viewer.sink().errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title, "Open failed");
        assert!(errors[0].text.contains("bad.yaml"));
        assert!(!viewer.document().is_open());
    }

    #[test]
    fn test_cancelled_save_does_nothing() {
        let mut viewer = viewer(vec![None]);
        assert!(viewer.trigger(Action::Save));
        assert_eq!(viewer.preferences().directory, PathBuf::from("/start"));
        assert!(viewer.sink().messages().is_empty());
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.yaml");

        let mut viewer = viewer(vec![Some(path)]);
        viewer.trigger(Action::Save);

        assert_eq!(viewer.sink().errors().count(), 1);
    }

    #[test]
    fn test_expanding_placeholder_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "b: {c: 1}\n").unwrap();

        let mut viewer = viewer(vec![]);
        viewer
            .document_mut()
            .set_policy(crate::document::ExpansionPolicy::RootOnly);
        assert!(viewer.open_path(&path));

        let model = viewer.document().model();
        let b = model.node_at_path(&["b"]).unwrap();
        let placeholder = model.children(b)[0];

        assert!(!viewer.expand_node(placeholder));
        assert_eq!(viewer.sink().errors().count(), 1);
        assert!(viewer.expand_node(b));
    }

    #[test]
    fn test_expanded_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "b: {c: 1}\n").unwrap();

        let mut viewer = viewer(vec![]);
        viewer
            .document_mut()
            .set_policy(crate::document::ExpansionPolicy::RootOnly);
        viewer.open_path(&path);

        let b = viewer.document().model().node_at_path(&["b"]).unwrap();
        let index = viewer.document().model().index_of(b).unwrap();
        assert!(viewer.expanded(&index));
        assert!(viewer.document().model().is_populated(b));
    }

    #[test]
    fn test_quit() {
        let mut viewer = viewer(vec![]);
        assert!(!viewer.trigger(Action::Quit));
        assert_eq!(viewer.into_preferences().directory, PathBuf::from("/start"));
    }
}
