//! Rebuilding a [`YamlValue`] from the visible tree.
//!
//! Conversion reads labels and values as the user left them:
//!
//! - scalar rows become their displayed text
//! - populated mappings are keyed by child label, in row order
//! - populated sequences keep row order and ignore labels
//! - unpopulated containers contribute the value still waiting in the
//!   registry, so unexpanded parts of a document survive a save
//!
//! The whole conversion runs under one read lock.

use indexmap::IndexMap;
use indexmap::map::Entry;
use yamlview_core::logging::targets;

use super::yaml_tree_model::{NodeId, NodeKind, PopulationAction, TreeStorage, YamlTreeModel};
use crate::file::yaml::YamlValue;

/// Converts the subtree under `node` to a value.
///
/// Unknown IDs and placeholders convert to an empty scalar.
pub fn to_value(model: &YamlTreeModel, node: NodeId) -> YamlValue {
    let storage = model.read_storage();
    convert(&storage, node)
}

/// Converts the whole document.
pub fn document_value(model: &YamlTreeModel) -> YamlValue {
    let storage = model.read_storage();
    convert(&storage, storage.root)
}

fn convert(storage: &TreeStorage, id: NodeId) -> YamlValue {
    if let Some(PopulationAction::Pending { source, .. }) = storage.registry.get(id) {
        return source.clone();
    }
    let Some(node) = storage.nodes.get(id) else {
        return YamlValue::scalar("");
    };

    match node.kind() {
        NodeKind::Scalar => YamlValue::scalar(node.value().unwrap_or_default()),
        NodeKind::Placeholder => YamlValue::scalar(""),
        NodeKind::Sequence => YamlValue::Sequence(
            node.children()
                .iter()
                .map(|&child| convert(storage, child))
                .collect(),
        ),
        NodeKind::Mapping => {
            let mut map = IndexMap::with_capacity(node.children().len());
            for &child in node.children() {
                let Some(label) = storage.nodes.get(child).map(|c| c.label().to_string()) else {
                    continue;
                };
                let value = convert(storage, child);
                match map.entry(label) {
                    Entry::Occupied(mut entry) => {
                        tracing::warn!(
                            target: targets::MODEL,
                            key = %entry.key(),
                            "duplicate key; keeping the last value"
                        );
                        entry.insert(value);
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                }
            }
            YamlValue::Mapping(map)
        }
    }
}
