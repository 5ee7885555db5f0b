//! Loading and saving the open document.
//!
//! [`DocumentController`] ties the codec, the tree model and the converter
//! together:
//!
//! - **load**: read the file, parse it, and only then replace the tree
//! - **save**: convert the tree and write it atomically
//! - **reload**: load the current path again
//!
//! A failed load leaves the previous document, tree and path untouched.

use std::path::{Path, PathBuf};

use yamlview_core::PerfSpan;
use yamlview_core::logging::{span_names, targets};

use crate::error::{LoadError, RegistryDesyncError, SaveError};
use crate::file::{atomic_write, read_text, yaml};
use crate::model::{NodeId, YamlTreeModel, convert};

/// How much of a document is built right after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionPolicy {
    /// Build every row, as if the user expanded everything.
    #[default]
    ExpandAll,
    /// Build only the top level; deeper rows wait for an expand.
    RootOnly,
}

/// Owns the tree model and the path of the open document.
#[derive(Default)]
pub struct DocumentController {
    model: YamlTreeModel,
    current_path: Option<PathBuf>,
    policy: ExpansionPolicy,
}

impl DocumentController {
    /// Creates a controller with no open document.
    pub fn new(policy: ExpansionPolicy) -> Self {
        Self {
            model: YamlTreeModel::new(),
            current_path: None,
            policy,
        }
    }

    /// Loads `path`, replacing the current document.
    ///
    /// # Errors
    ///
    /// [`LoadError::Read`] if the file cannot be read and
    /// [`LoadError::Parse`] if it is not valid YAML. In both cases nothing
    /// changes.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let _span = PerfSpan::new(span_names::LOAD);

        let text = read_text(path)?;
        let value = yaml::parse(&text).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        self.model.initialize(value);
        self.current_path = Some(path.to_path_buf());

        if self.policy == ExpansionPolicy::ExpandAll {
            let root = self.model.root();
            if let Err(err) = self.model.expand_all(root) {
                tracing::error!(target: targets::DOCUMENT, %err, "expanding freshly loaded document");
            }
        }

        tracing::info!(
            target: targets::DOCUMENT,
            path = %path.display(),
            nodes = self.model.node_count(),
            "document loaded"
        );
        Ok(())
    }

    /// Writes the current tree, edits included, to `path`.
    ///
    /// The tree and the current path are not changed. The target file is
    /// replaced atomically, so a failed save leaves it as it was.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        let _span = PerfSpan::new(span_names::SAVE);

        let value = convert::document_value(&self.model);
        let text = yaml::serialize(&value)?;
        atomic_write(path, |writer| writer.write_str(&text))?;

        tracing::info!(target: targets::DOCUMENT, path = %path.display(), bytes = text.len(), "document saved");
        Ok(())
    }

    /// Loads the current path again.
    ///
    /// Returns `Ok(false)` when no document is open.
    pub fn reload(&mut self) -> Result<bool, LoadError> {
        let Some(path) = self.current_path.clone() else {
            tracing::debug!(target: targets::DOCUMENT, "reload with no open document");
            return Ok(false);
        };
        self.load(path)?;
        Ok(true)
    }

    /// Forwards a view's expand notification to the model.
    pub fn on_expand(&self, node: NodeId) -> Result<(), RegistryDesyncError> {
        self.model.on_expand(node)
    }

    /// The path of the open document.
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Returns true once a document has been loaded.
    pub fn is_open(&self) -> bool {
        self.current_path.is_some()
    }

    /// The expansion policy applied on load.
    pub fn policy(&self) -> ExpansionPolicy {
        self.policy
    }

    /// Changes the expansion policy for later loads.
    pub fn set_policy(&mut self, policy: ExpansionPolicy) {
        self.policy = policy;
    }

    /// The tree model.
    pub fn model(&self) -> &YamlTreeModel {
        &self.model
    }

    /// Mutable access to the tree model.
    pub fn model_mut(&mut self) -> &mut YamlTreeModel {
        &mut self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_expand_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "a: {b: {c: 1}}\n").unwrap();

        let mut doc = DocumentController::default();
        doc.load(&path).unwrap();

        assert_eq!(doc.current_path(), Some(path.as_path()));
        let c = doc.model().node_at_path(&["a", "b", "c"]).unwrap();
        assert_eq!(doc.model().node(c).unwrap().value(), Some("1"));
    }

    #[test]
    fn test_load_root_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "a: {b: {c: 1}}\n").unwrap();

        let mut doc = DocumentController::new(ExpansionPolicy::RootOnly);
        doc.load(&path).unwrap();

        let a = doc.model().node_at_path(&["a"]).unwrap();
        assert!(!doc.model().is_populated(a));
        doc.on_expand(a).unwrap();
        assert!(doc.model().node_at_path(&["a", "b"]).is_some());
    }

    #[test]
    fn test_reload_without_document() {
        let mut doc = DocumentController::default();
        assert!(!doc.is_open());
        assert!(!doc.reload().unwrap());
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.yaml");
        fs::write(&path, "version: 1\n").unwrap();

        let mut doc = DocumentController::default();
        doc.load(&path).unwrap();
        fs::write(&path, "version: 2\n").unwrap();

        assert!(doc.reload().unwrap());
        let version = doc.model().node_at_path(&["version"]).unwrap();
        assert_eq!(doc.model().node(version).unwrap().value(), Some("2"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc = DocumentController::default();

        let err = doc.load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Read(ref e) if e.is_not_found()));
        assert!(!doc.is_open());
    }

    #[test]
    fn test_save_keeps_current_path() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("in.yaml");
        let target = dir.path().join("out.yaml");
        fs::write(&source, "a: 1\n").unwrap();

        let mut doc = DocumentController::default();
        doc.load(&source).unwrap();
        doc.save(&target).unwrap();

        assert_eq!(doc.current_path(), Some(source.as_path()));
        assert_eq!(fs::read_to_string(&target).unwrap(), "a: 1\n");
    }
}
