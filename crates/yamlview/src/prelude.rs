//! Prelude module for yamlview.
//!
//! ```ignore
//! use yamlview::prelude::*;
//! ```
//!
//! This provides access to:
//! - The YAML codec (`yaml`, `YamlValue`)
//! - The tree model (`YamlTreeModel`, `ItemModel`, `ModelIndex`, roles)
//! - The document controller and viewer shell
//! - Error types

// ============================================================================
// Codec and Files
// ============================================================================

pub use crate::file::yaml::{self, YamlValue};
pub use crate::file::{FileError, FileErrorKind, Preferences};

// ============================================================================
// Tree Model
// ============================================================================

pub use crate::model::convert;
pub use crate::model::{
    ItemData, ItemFlags, ItemModel, ItemRole, ModelIndex, NodeId, NodeKind, TreeDebug, YamlTreeModel,
};

// ============================================================================
// Document and Viewer
// ============================================================================

pub use crate::document::{DocumentController, ExpansionPolicy};
pub use crate::viewer::{Action, FileChooser, MessageSink, Viewer};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::{LoadError, ParseError, RegistryDesyncError, SaveError, ViewerError};

// ============================================================================
// Signals
// ============================================================================

pub use yamlview_core::Signal;
