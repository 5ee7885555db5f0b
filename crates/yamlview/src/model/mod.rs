//! Tree model for YAML documents.
//!
//! The model is what a tree view talks to. It separates the document from how
//! it is displayed, and builds rows only when a view asks for them.
//!
//! # Core Types
//!
//! - `ModelIndex`: identifies a cell of the model
//! - `ItemRole` / `ItemData`: what is asked for and what comes back
//! - `ItemModel`: the trait views program against
//! - `ModelSignals`: change notifications
//! - `YamlTreeModel`: the lazily populated YAML tree
//!
//! # Lazy Population
//!
//! Containers start out with one placeholder row. A view calls
//! [`ItemModel::fetch_more`] (or the shell calls
//! [`YamlTreeModel::on_expand`]) when the user opens a row; that replaces the
//! placeholder with the container's entries, one level deep.
//!
//! ```
//! use yamlview::file::yaml;
//! use yamlview::model::{ItemModel, ModelIndex, YamlTreeModel};
//!
//! let model = YamlTreeModel::new();
//! model.initialize(yaml::parse("server: {port: 8080}\n").unwrap());
//!
//! let server = model.index(0, 0, &ModelIndex::invalid());
//! assert!(model.can_fetch_more(&server));
//! model.fetch_more(&server);
//! assert_eq!(model.row_count(&server), 1);
//! ```
//!
//! # Saving
//!
//! [`convert::document_value`] turns the tree, edits included, back into a
//! [`YamlValue`](crate::file::yaml::YamlValue).

pub mod convert;
mod debug;
mod index;
mod role;
mod traits;
mod yaml_tree_model;

pub use debug::{TreeDebug, TreeFormatOptions, TreeStyle};
pub use index::ModelIndex;
pub use role::{ItemData, ItemRole};
pub use traits::{ItemFlags, ItemModel, ModelSignals};
pub use yaml_tree_model::{
    COLUMN_COUNT, LABEL_COLUMN, NodeId, NodeKind, PLACEHOLDER_LABEL, PopulationAction,
    PopulationState, TreeNode, VALUE_COLUMN, YamlTreeModel,
};
