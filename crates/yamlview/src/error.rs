//! Error types for yamlview.
//!
//! - [`ParseError`]: malformed YAML
//! - [`LoadError`]: a document could not be read or parsed
//! - [`SaveError`]: a document could not be serialized or written
//! - [`RegistryDesyncError`]: an expand was requested for a node the model
//!   has no population action for. This is an internal invariant violation.
//! - [`ViewerError`]: any of the above, as surfaced by the viewer shell

use std::path::PathBuf;

use thiserror::Error;

use crate::file::FileError;
use crate::model::NodeId;

/// Malformed YAML.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
    line: Option<usize>,
    column: Option<usize>,
}

impl ParseError {
    /// Creates a parse error with an optional 1-based position.
    pub fn new(message: impl Into<String>, position: Option<(usize, usize)>) -> Self {
        Self {
            message: message.into(),
            line: position.map(|(line, _)| line),
            column: position.map(|(_, column)| column),
        }
    }

    /// The parser's description of the problem.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line of the problem, when known.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// 1-based column of the problem, when known.
    pub fn column(&self) -> Option<usize> {
        self.column
    }
}

impl From<serde_yaml::Error> for ParseError {
    fn from(err: serde_yaml::Error) -> Self {
        let position = err.location().map(|loc| (loc.line(), loc.column()));
        Self::new(err.to_string(), position)
    }
}

/// A value could not be rendered as YAML.
#[derive(Debug, Error)]
#[error("cannot serialize document: {0}")]
pub struct SerializeError(#[from] serde_yaml::Error);

/// A document could not be loaded. The previously open document is kept.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read document: {0}")]
    Read(#[from] FileError),
    /// The file is not valid YAML.
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// What the parser reported.
        #[source]
        source: ParseError,
    },
}

/// A document could not be saved. The in-memory tree is unchanged.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The tree could not be rendered as YAML.
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    /// The file could not be written.
    #[error("cannot write document: {0}")]
    Write(#[from] FileError),
}

/// An expand was requested for a node with no registered population action.
///
/// The model and whatever view drives it disagree about which nodes exist.
/// The current action should be abandoned; the process can keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no population action registered for node {node:?}")]
pub struct RegistryDesyncError {
    /// The node the view asked to expand.
    pub node: NodeId,
}

/// Any failure reported by the viewer shell.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Opening or reloading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Saving failed.
    #[error(transparent)]
    Save(#[from] SaveError),
    /// The model and the view went out of sync.
    #[error(transparent)]
    Desync(#[from] RegistryDesyncError),
}
