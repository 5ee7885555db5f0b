//! yamlview - a lazily-expanded, editable tree viewer for YAML documents.
//!
//! A document is parsed once into a [`YamlValue`](file::yaml::YamlValue)
//! tree. The [`YamlTreeModel`](model::YamlTreeModel) shows it as rows of
//! label and value, building each container's children only when that row
//! is expanded. Edits made to labels and scalar values are written back out
//! as plain YAML on save.
//!
//! The crate is layered:
//!
//! - [`file`]: YAML codec, atomic file writes and preferences
//! - [`model`]: the lazy tree model and the tree-to-value converter
//! - [`document`]: load, save and reload of the open document
//! - [`viewer`]: menu actions, file dialogs and the terminal front-end
//!
//! # Example
//!
//! ```
//! use yamlview::prelude::*;
//!
//! let model = YamlTreeModel::new();
//! model.initialize(yaml::parse("a: 1\nb:\n  c: 2\n").unwrap());
//!
//! // Only the first level exists until `b` is expanded.
//! let b = model.node_at_path(&["b"]).unwrap();
//! assert!(!model.is_populated(b));
//! model.on_expand(b).unwrap();
//!
//! let c = model.node_at_path(&["b", "c"]).unwrap();
//! model.set_value(c, "3");
//!
//! let text = yaml::serialize(&convert::document_value(&model)).unwrap();
//! assert_eq!(text, "a: 1\nb:\n  c: 3\n");
//! ```

pub mod document;
pub mod error;
pub mod file;
pub mod model;
pub mod prelude;
pub mod viewer;

pub use document::{DocumentController, ExpansionPolicy};
pub use error::{LoadError, ParseError, RegistryDesyncError, SaveError, SerializeError, ViewerError};
pub use model::{NodeId, YamlTreeModel};
pub use viewer::{Action, Viewer};
