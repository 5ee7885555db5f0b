//! Lazily populated tree model for YAML documents.
//!
//! `YamlTreeModel` shows a [`YamlValue`] as a two-column tree (label, value).
//! Only the top level is built when a document is loaded. Every container
//! row starts out with a single placeholder child, so views draw it as
//! expandable, and a registry entry holding the part of the document that
//! belongs under it. Expanding the row moves that value out of the registry
//! and turns it into one level of real children.
//!
//! Each source value is moved, never copied, so a node is populated at most
//! once and the model holds at most one copy of the document.

use parking_lot::{RwLock, RwLockReadGuard};
use slotmap::{Key, KeyData, SecondaryMap, SlotMap, new_key_type};
use yamlview_core::logging::{span_names, targets};

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};
use super::traits::{ItemFlags, ItemModel, ModelSignals};
use crate::error::RegistryDesyncError;
use crate::file::yaml::{ValueKind, YamlValue};

new_key_type! {
    /// Identifies a node in a [`YamlTreeModel`].
    ///
    /// IDs are invalidated when a new document is loaded.
    pub struct NodeId;
}

impl NodeId {
    /// The value stored in a [`ModelIndex`] for this node.
    pub fn to_internal_id(self) -> u64 {
        self.data().as_ffi()
    }

    /// Recovers a node ID from [`ModelIndex::internal_id`].
    pub fn from_internal_id(id: u64) -> Self {
        KeyData::from_ffi(id).into()
    }
}

/// Label shown for the synthetic child of an unexpanded container.
pub const PLACEHOLDER_LABEL: &str = "\u{2026}";

/// Number of columns: label and value.
pub const COLUMN_COUNT: usize = 2;

/// Column holding the mapping key or sequence position.
pub const LABEL_COLUMN: usize = 0;

/// Column holding scalar text or a sequence summary.
pub const VALUE_COLUMN: usize = 1;

const TOOLTIP_LIMIT: usize = 120;

/// What a node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A mapping; children are labelled by key.
    Mapping,
    /// A sequence; children are labelled by position.
    Sequence,
    /// A scalar leaf.
    Scalar,
    /// The stand-in child of an unexpanded container.
    Placeholder,
}

impl NodeKind {
    /// Returns true for mappings and sequences.
    pub fn is_container(self) -> bool {
        matches!(self, NodeKind::Mapping | NodeKind::Sequence)
    }
}

impl From<ValueKind> for NodeKind {
    fn from(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Mapping => NodeKind::Mapping,
            ValueKind::Sequence => NodeKind::Sequence,
            ValueKind::Scalar => NodeKind::Scalar,
        }
    }
}

/// Whether a node's children have been built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationState {
    /// The node still shows its placeholder.
    Unpopulated,
    /// The node's children are real rows (or it never had any).
    Populated,
}

/// The registry entry for a node.
#[derive(Debug, Clone, PartialEq)]
pub enum PopulationAction {
    /// Children not built yet. `source` is the value they are built from.
    Pending {
        /// The value under this node.
        source: YamlValue,
        /// The node's placeholder child.
        placeholder: NodeId,
    },
    /// Nothing to do on expand.
    Noop,
}

/// One row of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    label: String,
    value: Option<String>,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TreeNode {
    fn new(label: String, value: Option<String>, kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            label,
            value,
            kind,
            parent,
            children: Vec::new(),
        }
    }

    fn placeholder(parent: NodeId) -> Self {
        Self::new(PLACEHOLDER_LABEL.to_string(), None, NodeKind::Placeholder, Some(parent))
    }

    /// The mapping key or sequence position.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Scalar text for leaves, the summary for sequences, none for mappings.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// What the node was built from.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The parent node. `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in display order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena and registry, guarded together by the model's lock.
pub(crate) struct TreeStorage {
    pub(crate) nodes: SlotMap<NodeId, TreeNode>,
    pub(crate) registry: SecondaryMap<NodeId, PopulationAction>,
    pub(crate) root: NodeId,
}

impl TreeStorage {
    /// Builds storage for a document with the root already populated.
    fn new_document(value: YamlValue) -> Self {
        let mut storage = Self {
            nodes: SlotMap::with_key(),
            registry: SecondaryMap::new(),
            root: NodeId::null(),
        };
        storage.reset(value);
        storage
    }

    /// Drops the current tree and builds the top level of `value`.
    ///
    /// Cleared slots are reused with new versions, so IDs from the old tree
    /// no longer resolve.
    fn reset(&mut self, value: YamlValue) {
        self.nodes.clear();
        self.registry.clear();

        let root = self.nodes.insert(TreeNode::new(
            String::new(),
            value.summary(),
            value.kind().into(),
            None,
        ));
        self.root = root;
        self.registry.insert(root, PopulationAction::Noop);

        match value {
            YamlValue::Scalar(text) => {
                if let Some(node) = self.nodes.get_mut(root) {
                    node.value = Some(text);
                }
            }
            container => {
                for (label, entry) in container.into_entries() {
                    self.add_entry(root, label, entry);
                }
            }
        }
    }

    /// Appends a child for one mapping entry or sequence element.
    fn add_entry(&mut self, parent: NodeId, label: String, value: YamlValue) -> NodeId {
        let kind = NodeKind::from(value.kind());
        let (display, pending) = match value {
            YamlValue::Scalar(text) => (Some(text), None),
            container => (container.summary(), Some(container)),
        };

        let id = self
            .nodes
            .insert(TreeNode::new(label, display, kind, Some(parent)));

        match pending {
            Some(source) => {
                let placeholder = self.nodes.insert(TreeNode::placeholder(id));
                if let Some(node) = self.nodes.get_mut(id) {
                    node.children.push(placeholder);
                }
                self.registry
                    .insert(id, PopulationAction::Pending { source, placeholder });
            }
            None => {
                self.registry.insert(id, PopulationAction::Noop);
            }
        }

        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Marks `node` populated and hands back what it was waiting for.
    ///
    /// `Ok(None)` means the node was already populated.
    fn take_pending(
        &mut self,
        node: NodeId,
    ) -> Result<Option<(YamlValue, NodeId)>, RegistryDesyncError> {
        let action = self
            .registry
            .get_mut(node)
            .ok_or(RegistryDesyncError { node })?;
        match std::mem::replace(action, PopulationAction::Noop) {
            PopulationAction::Pending {
                source,
                placeholder,
            } => Ok(Some((source, placeholder))),
            PopulationAction::Noop => Ok(None),
        }
    }

    /// Builds one level under `node` without computing any indices.
    fn populate_in_place(&mut self, node: NodeId) -> Result<bool, RegistryDesyncError> {
        let Some((source, placeholder)) = self.take_pending(node)? else {
            return Ok(false);
        };
        self.remove_child(node, placeholder);
        for (label, value) in source.into_entries() {
            self.add_entry(node, label, value);
        }
        Ok(true)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|&id| id != child);
        }
        self.nodes.remove(child);
    }

    fn row_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes.get(id)?.parent?;
        self.nodes
            .get(parent)?
            .children
            .iter()
            .position(|&child| child == id)
    }

    fn child_count(&self, id: NodeId) -> usize {
        self.nodes.get(id).map_or(0, |n| n.children.len())
    }

    /// The column-0 index of a node. The root maps to the invalid index.
    fn index_of(&self, id: NodeId) -> Option<ModelIndex> {
        if id == self.root {
            return Some(ModelIndex::invalid());
        }
        let parent = self.nodes.get(id)?.parent?;
        let row = self.row_of(id)?;
        let parent_index = self.index_of(parent)?;
        Some(ModelIndex::with_internal_id(
            row,
            LABEL_COLUMN,
            parent_index,
            id.to_internal_id(),
        ))
    }

    /// The node an index refers to. The invalid index means the root.
    fn node_of(&self, index: &ModelIndex) -> Option<NodeId> {
        if !index.is_valid() {
            return Some(self.root);
        }
        let id = NodeId::from_internal_id(index.internal_id());
        self.nodes.contains_key(id).then_some(id)
    }

    fn is_pending(&self, id: NodeId) -> bool {
        matches!(
            self.registry.get(id),
            Some(PopulationAction::Pending { .. })
        )
    }
}

/// A lazily expanded, editable tree over a YAML document.
///
/// # Example
///
/// ```
/// use yamlview::file::yaml;
/// use yamlview::model::YamlTreeModel;
///
/// let model = YamlTreeModel::new();
/// model.initialize(yaml::parse("a: 1\nb: {c: 2}\n").unwrap());
///
/// let b = model.node_at_path(&["b"]).unwrap();
/// assert!(!model.is_populated(b));
/// model.on_expand(b).unwrap();
/// assert!(model.node_at_path(&["b", "c"]).is_some());
/// ```
pub struct YamlTreeModel {
    storage: RwLock<TreeStorage>,
    signals: ModelSignals,
}

impl Default for YamlTreeModel {
    fn default() -> Self {
        Self::new()
    }
}

impl YamlTreeModel {
    /// Creates a model showing an empty mapping.
    pub fn new() -> Self {
        Self {
            storage: RwLock::new(TreeStorage::new_document(YamlValue::default())),
            signals: ModelSignals::new(),
        }
    }

    /// Replaces the whole tree with `value`.
    ///
    /// The root's children are built immediately; deeper levels wait for
    /// [`on_expand`](Self::on_expand). All previously issued node IDs and
    /// indices become invalid. Emits `model_reset`.
    pub fn initialize(&self, value: YamlValue) {
        self.signals.emit_reset(|| {
            let mut storage = self.storage.write();
            storage.reset(value);
            tracing::debug!(
                target: targets::MODEL,
                top_level = storage.child_count(storage.root),
                "model initialized"
            );
        });
    }

    /// Builds one level of children for `node`, replacing its placeholder.
    ///
    /// Returns `Ok(true)` if children were built and `Ok(false)` if the node
    /// was already populated.
    ///
    /// # Errors
    ///
    /// [`RegistryDesyncError`] if `node` has no registry entry: a
    /// placeholder, or an ID from an earlier document.
    pub fn populate(&self, node: NodeId) -> Result<bool, RegistryDesyncError> {
        let _span = tracing::trace_span!(target: targets::MODEL, "populate", op = span_names::POPULATE).entered();

        let (source, placeholder, parent_index) = {
            let mut storage = self.storage.write();
            let Some((source, placeholder)) = storage.take_pending(node)? else {
                return Ok(false);
            };
            let parent_index = storage.index_of(node).unwrap_or_default();
            (source, placeholder, parent_index)
        };

        let placeholder_row = self.storage.read().row_of(placeholder);
        match placeholder_row {
            Some(row) => self.signals.emit_rows_removed(parent_index.clone(), row, row, || {
                self.storage.write().remove_child(node, placeholder);
            }),
            None => self.storage.write().remove_child(node, placeholder),
        }

        let entries = source.into_entries();
        let count = entries.len();
        if count > 0 {
            let first = self.storage.read().child_count(node);
            self.signals
                .emit_rows_inserted(parent_index, first, first + count - 1, || {
                    let mut storage = self.storage.write();
                    for (label, value) in entries {
                        storage.add_entry(node, label, value);
                    }
                });
        }

        tracing::trace!(target: targets::MODEL, ?node, children = count, "node populated");
        Ok(true)
    }

    /// Handles a view's expand notification for `node`.
    ///
    /// # Errors
    ///
    /// [`RegistryDesyncError`] if the node is unknown to the registry. The
    /// error is logged here; the caller abandons the action.
    pub fn on_expand(&self, node: NodeId) -> Result<(), RegistryDesyncError> {
        match self.populate(node) {
            Ok(_) => Ok(()),
            Err(err) => {
                tracing::error!(target: targets::MODEL, %err, "expand requested for unregistered node");
                Err(err)
            }
        }
    }

    /// Populates `node` and every container below it, depth first.
    ///
    /// Runs under a single write lock and emits no row signals; views see
    /// one `model_reset` instead. Returns the number of nodes that were
    /// populated by this call.
    pub fn expand_all(&self, node: NodeId) -> Result<usize, RegistryDesyncError> {
        let populated = self.signals.emit_reset_batched(|| {
            let mut storage = self.storage.write();
            let mut populated = 0;
            let mut stack = vec![node];

            while let Some(id) = stack.pop() {
                if storage.populate_in_place(id)? {
                    populated += 1;
                }
                if let Some(current) = storage.nodes.get(id) {
                    stack.extend(current.children.iter().rev().copied().filter(|&child| {
                        storage
                            .nodes
                            .get(child)
                            .is_some_and(|c| c.kind.is_container())
                    }));
                }
            }
            Ok::<_, RegistryDesyncError>(populated)
        })?;

        tracing::debug!(target: targets::MODEL, populated, "subtree expanded");
        Ok(populated)
    }

    // -------------------------------------------------------------------------
    // Arena access
    // -------------------------------------------------------------------------

    /// The hidden root node.
    pub fn root(&self) -> NodeId {
        self.storage.read().root
    }

    /// A snapshot of a node.
    pub fn node(&self, id: NodeId) -> Option<TreeNode> {
        self.storage.read().nodes.get(id).cloned()
    }

    /// Provides read access to a node without copying it.
    pub fn with_node<F, R>(&self, id: NodeId, f: F) -> Option<R>
    where
        F: FnOnce(&TreeNode) -> R,
    {
        self.storage.read().nodes.get(id).map(f)
    }

    /// The children of a node in display order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.with_node(id, |n| n.children.clone()).unwrap_or_default()
    }

    /// Follows labels down from the root.
    ///
    /// Only built nodes are searched; nothing is populated on the way.
    /// The first child with a matching label wins.
    pub fn node_at_path<S: AsRef<str>>(&self, labels: &[S]) -> Option<NodeId> {
        let storage = self.storage.read();
        let mut current = storage.root;
        for label in labels {
            let label = label.as_ref();
            current = storage
                .nodes
                .get(current)?
                .children
                .iter()
                .copied()
                .find(|&child| {
                    storage
                        .nodes
                        .get(child)
                        .is_some_and(|n| n.kind != NodeKind::Placeholder && n.label == label)
                })?;
        }
        Some(current)
    }

    /// Number of nodes in the arena, root and placeholders included.
    pub fn node_count(&self) -> usize {
        self.storage.read().nodes.len()
    }

    /// Returns true once a node's children have been built.
    ///
    /// Placeholders and unknown IDs are never populated.
    pub fn is_populated(&self, id: NodeId) -> bool {
        self.population_state(id) == Some(PopulationState::Populated)
    }

    /// The population state of a registered node.
    pub fn population_state(&self, id: NodeId) -> Option<PopulationState> {
        match self.storage.read().registry.get(id)? {
            PopulationAction::Pending { .. } => Some(PopulationState::Unpopulated),
            PopulationAction::Noop => Some(PopulationState::Populated),
        }
    }

    /// A copy of the value an unpopulated node is waiting to show.
    pub fn pending_value(&self, id: NodeId) -> Option<YamlValue> {
        match self.storage.read().registry.get(id)? {
            PopulationAction::Pending { source, .. } => Some(source.clone()),
            PopulationAction::Noop => None,
        }
    }

    /// Renames a node. The root and placeholders cannot be renamed.
    ///
    /// Emits `data_changed` for the label cell.
    pub fn set_label(&self, id: NodeId, label: impl Into<String>) -> bool {
        let index = {
            let mut storage = self.storage.write();
            if id == storage.root {
                return false;
            }
            match storage.nodes.get_mut(id) {
                Some(node) if node.kind != NodeKind::Placeholder => node.label = label.into(),
                _ => return false,
            }
            storage.index_of(id)
        };
        if let Some(index) = index {
            self.signals
                .emit_data_changed_single(index, vec![ItemRole::Display, ItemRole::Edit]);
        }
        true
    }

    /// Replaces the text of a scalar node. Containers cannot be given a value.
    ///
    /// Emits `data_changed` for the value cell.
    pub fn set_value(&self, id: NodeId, value: impl Into<String>) -> bool {
        let index = {
            let mut storage = self.storage.write();
            match storage.nodes.get_mut(id) {
                Some(node) if node.kind == NodeKind::Scalar => node.value = Some(value.into()),
                _ => return false,
            }
            storage.index_of(id)
        };
        if let Some(index) = index.filter(ModelIndex::is_valid) {
            self.signals.emit_data_changed_single(
                index.sibling_at_column(VALUE_COLUMN),
                vec![ItemRole::Display, ItemRole::Edit],
            );
        }
        true
    }

    /// The column-0 index of a node, or the invalid index for the root.
    pub fn index_of(&self, id: NodeId) -> Option<ModelIndex> {
        self.storage.read().index_of(id)
    }

    /// The node an index refers to. The invalid index means the root.
    pub fn node_of(&self, index: &ModelIndex) -> Option<NodeId> {
        self.storage.read().node_of(index)
    }

    pub(crate) fn read_storage(&self) -> RwLockReadGuard<'_, TreeStorage> {
        self.storage.read()
    }

    fn tooltip(storage: &TreeStorage, id: NodeId) -> ItemData {
        match storage.registry.get(id) {
            Some(PopulationAction::Pending { source, .. }) => {
                let text = source.to_flow_string();
                if text.chars().count() > TOOLTIP_LIMIT {
                    let mut short: String = text.chars().take(TOOLTIP_LIMIT).collect();
                    short.push('\u{2026}');
                    ItemData::String(short)
                } else {
                    ItemData::String(text)
                }
            }
            _ => ItemData::None,
        }
    }
}

impl ItemModel for YamlTreeModel {
    fn row_count(&self, parent: &ModelIndex) -> usize {
        let storage = self.storage.read();
        storage
            .node_of(parent)
            .map_or(0, |id| storage.child_count(id))
    }

    fn column_count(&self, _parent: &ModelIndex) -> usize {
        COLUMN_COUNT
    }

    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData {
        if !index.is_valid() {
            return ItemData::None;
        }

        let storage = self.storage.read();
        let Some(id) = storage.node_of(index) else {
            return ItemData::None;
        };
        let Some(node) = storage.nodes.get(id) else {
            return ItemData::None;
        };

        match (role, index.column()) {
            (ItemRole::Display | ItemRole::Edit, LABEL_COLUMN) => ItemData::from(node.label.as_str()),
            (ItemRole::Display | ItemRole::Edit, VALUE_COLUMN) => ItemData::from(node.value.clone()),
            (ItemRole::ToolTip, _) => Self::tooltip(&storage, id),
            _ => ItemData::None,
        }
    }

    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex {
        if column >= COLUMN_COUNT {
            return ModelIndex::invalid();
        }

        let storage = self.storage.read();
        let child = storage
            .node_of(parent)
            .and_then(|id| storage.nodes.get(id))
            .and_then(|node| node.children.get(row).copied());

        match child {
            Some(id) => ModelIndex::with_internal_id(row, column, parent.clone(), id.to_internal_id()),
            None => ModelIndex::invalid(),
        }
    }

    fn parent(&self, index: &ModelIndex) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }

        let storage = self.storage.read();
        storage
            .node_of(index)
            .and_then(|id| storage.nodes.get(id))
            .and_then(|node| node.parent)
            .and_then(|parent| storage.index_of(parent))
            .unwrap_or_else(ModelIndex::invalid)
    }

    fn signals(&self) -> &ModelSignals {
        &self.signals
    }

    fn set_data(&self, index: &ModelIndex, value: ItemData, role: ItemRole) -> bool {
        if !index.is_valid() || !matches!(role, ItemRole::Edit | ItemRole::Display) {
            return false;
        }
        let (Some(id), Some(text)) = (self.node_of(index), value.into_string()) else {
            return false;
        };
        match index.column() {
            LABEL_COLUMN => self.set_label(id, text),
            VALUE_COLUMN => self.set_value(id, text),
            _ => false,
        }
    }

    fn flags(&self, index: &ModelIndex) -> ItemFlags {
        if !index.is_valid() {
            return ItemFlags::disabled();
        }

        let storage = self.storage.read();
        let Some(node) = storage.node_of(index).and_then(|id| storage.nodes.get(id)) else {
            return ItemFlags::disabled();
        };

        match node.kind {
            NodeKind::Placeholder => ItemFlags::disabled(),
            NodeKind::Scalar => ItemFlags::editable().with_never_has_children(true),
            NodeKind::Mapping | NodeKind::Sequence => {
                ItemFlags::new().with_editable(index.column() == LABEL_COLUMN)
            }
        }
    }

    fn header_data(&self, section: usize, role: ItemRole) -> ItemData {
        match (section, role) {
            (LABEL_COLUMN, ItemRole::Display) => ItemData::from("Key"),
            (VALUE_COLUMN, ItemRole::Display) => ItemData::from("Value"),
            _ => ItemData::None,
        }
    }

    fn can_fetch_more(&self, parent: &ModelIndex) -> bool {
        let storage = self.storage.read();
        storage
            .node_of(parent)
            .is_some_and(|id| storage.is_pending(id))
    }

    fn fetch_more(&self, parent: &ModelIndex) {
        if let Some(id) = self.node_of(parent) {
            // Desync is logged by on_expand.
            let _ = self.on_expand(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::yaml;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn model_for(text: &str) -> YamlTreeModel {
        let model = YamlTreeModel::new();
        model.initialize(yaml::parse(text).unwrap());
        model
    }

    fn labels(model: &YamlTreeModel, id: NodeId) -> Vec<String> {
        model
            .children(id)
            .into_iter()
            .map(|c| model.node(c).unwrap().label().to_string())
            .collect()
    }

    #[test]
    fn test_top_level_rows() {
        let model = model_for(r#"{"a": 1, "b": {"c": 2, "d": 3}, "e": [4, 5]}"#);
        let root = model.root();
        assert_eq!(labels(&model, root), ["a", "b", "e"]);

        let a = model.node(model.node_at_path(&["a"]).unwrap()).unwrap();
        assert_eq!(a.kind(), NodeKind::Scalar);
        assert_eq!(a.value(), Some("1"));

        let b_id = model.node_at_path(&["b"]).unwrap();
        let b = model.node(b_id).unwrap();
        assert_eq!(b.kind(), NodeKind::Mapping);
        assert_eq!(b.value(), None);
        assert_eq!(labels(&model, b_id), [PLACEHOLDER_LABEL]);

        let e = model.node(model.node_at_path(&["e"]).unwrap()).unwrap();
        assert_eq!(e.kind(), NodeKind::Sequence);
        assert_eq!(e.value(), Some("(list with 2 items)"));
    }

    #[test]
    fn test_expand_mapping() {
        let model = model_for(r#"{"a": 1, "b": {"c": 2, "d": 3}, "e": [4, 5]}"#);
        let b = model.node_at_path(&["b"]).unwrap();

        model.on_expand(b).unwrap();

        assert_eq!(labels(&model, b), ["c", "d"]);
        let c = model.node(model.node_at_path(&["b", "c"]).unwrap()).unwrap();
        assert_eq!(c.value(), Some("2"));
        let d = model.node(model.node_at_path(&["b", "d"]).unwrap()).unwrap();
        assert_eq!(d.value(), Some("3"));
    }

    #[test]
    fn test_expand_sequence_uses_positions() {
        let model = model_for("items: [x, [y], {k: v}]\n");
        let items = model.node_at_path(&["items"]).unwrap();
        model.on_expand(items).unwrap();

        assert_eq!(labels(&model, items), ["0", "1", "2"]);
        let one = model.node(model.node_at_path(&["items", "1"]).unwrap()).unwrap();
        assert_eq!(one.value(), Some("(list with 1 item)"));
    }

    #[test]
    fn test_populate_is_idempotent() {
        let model = model_for("b: {c: 2, d: 3}\n");
        let b = model.node_at_path(&["b"]).unwrap();

        assert!(model.populate(b).unwrap());
        let count = model.node_count();
        assert!(!model.populate(b).unwrap());
        assert_eq!(model.node_count(), count);
        assert_eq!(labels(&model, b), ["c", "d"]);
    }

    #[test]
    fn test_populate_replaces_placeholder_exactly_once() {
        let model = model_for("b: {x: 1, y: [1, 2], z: {}}\n");
        let b = model.node_at_path(&["b"]).unwrap();
        assert_eq!(model.population_state(b), Some(PopulationState::Unpopulated));

        model.populate(b).unwrap();

        let children = model.children(b);
        assert_eq!(children.len(), 3);
        assert!(
            children
                .iter()
                .all(|&c| model.node(c).unwrap().kind() != NodeKind::Placeholder)
        );
        assert!(model.is_populated(b));
    }

    #[test]
    fn test_empty_container_expands_to_nothing() {
        let model = model_for("empty: {}\n");
        let empty = model.node_at_path(&["empty"]).unwrap();
        assert_eq!(model.children(empty).len(), 1);

        model.on_expand(empty).unwrap();
        assert!(model.children(empty).is_empty());
    }

    #[test]
    fn test_expand_placeholder_is_desync() {
        let model = model_for("b: {c: 2}\n");
        let b = model.node_at_path(&["b"]).unwrap();
        let placeholder = model.children(b)[0];

        let err = model.on_expand(placeholder).unwrap_err();
        assert_eq!(err.node, placeholder);
    }

    #[test]
    fn test_stale_node_is_desync() {
        let model = model_for("b: {c: 2}\n");
        let b = model.node_at_path(&["b"]).unwrap();

        model.initialize(yaml::parse("other: 1\n").unwrap());

        assert!(model.on_expand(b).is_err());
        assert!(model.node(b).is_none());
    }

    #[test]
    fn test_expand_all() {
        let model = model_for("a: {b: {c: [1, {d: 2}]}}\n");
        let populated = model.expand_all(model.root()).unwrap();

        assert_eq!(populated, 4);
        let d = model.node_at_path(&["a", "b", "c", "1", "d"]).unwrap();
        assert_eq!(model.node(d).unwrap().value(), Some("2"));
    }

    #[test]
    fn test_expand_all_long_sequence() {
        const ITEMS: usize = 100_000;

        let items = (0..ITEMS)
            .map(|n| {
                YamlValue::Mapping(
                    [("id".to_string(), YamlValue::scalar(n.to_string()))]
                        .into_iter()
                        .collect(),
                )
            })
            .collect();
        let model = YamlTreeModel::new();
        model.initialize(YamlValue::Mapping(
            [("big".to_string(), YamlValue::Sequence(items))]
                .into_iter()
                .collect(),
        ));

        let start = std::time::Instant::now();
        assert_eq!(model.expand_all(model.root()).unwrap(), ITEMS + 1);
        let elapsed = start.elapsed();

        // root, big, then one row and one leaf per item
        assert_eq!(model.node_count(), 2 + 2 * ITEMS);
        let last = model.node_at_path(&["big", "99999", "id"]).unwrap();
        assert_eq!(model.node(last).unwrap().value(), Some("99999"));
        assert!(
            elapsed < std::time::Duration::from_secs(10),
            "expand_all took {:?}",
            elapsed
        );
    }

    #[test]
    fn test_lazy_large_document() {
        let items: Vec<String> = (0..10_000).map(|n| format!("- {{id: {n}}}")).collect();
        let text = format!("big:\n{}\nsmall: 1\n", items.join("\n").replace("- ", "  - "));
        let model = model_for(&text);

        // root, big, big's placeholder, small
        assert_eq!(model.node_count(), 4);

        model.expand_all(model.root()).unwrap();
        // 10_000 mappings with one scalar each, plus the three real nodes above
        assert_eq!(model.node_count(), 3 + 20_000);
    }

    #[test]
    fn test_scalar_root() {
        let model = model_for("just text\n");
        let root = model.root();
        assert!(model.children(root).is_empty());
        assert_eq!(model.node(root).unwrap().value(), Some("just text"));
        assert_eq!(model.row_count(&ModelIndex::invalid()), 0);
    }

    #[test]
    fn test_item_model_navigation() {
        let model = model_for("a: 1\nb: {c: 2}\n");
        let top = ModelIndex::invalid();
        assert_eq!(model.row_count(&top), 2);
        assert_eq!(model.column_count(&top), COLUMN_COUNT);

        let a = model.index(0, LABEL_COLUMN, &top);
        let a_value = model.index(0, VALUE_COLUMN, &top);
        assert_eq!(model.data(&a, ItemRole::Display).as_string(), Some("a"));
        assert_eq!(model.data(&a_value, ItemRole::Display).as_string(), Some("1"));
        assert!(!model.index(2, 0, &top).is_valid());
        assert!(!model.index(0, 2, &top).is_valid());

        let b = model.index(1, 0, &top);
        assert!(model.can_fetch_more(&b));
        assert_eq!(
            model.data(&b, ItemRole::ToolTip).as_string(),
            Some("{c: 2}")
        );
        model.fetch_more(&b);
        assert!(!model.can_fetch_more(&b));

        let c = model.index(0, 0, &b);
        assert_eq!(model.data(&c, ItemRole::Display).as_string(), Some("c"));
        assert_eq!(model.parent(&c), b);
        assert_eq!(model.parent(&b), ModelIndex::invalid());
    }

    #[test]
    fn test_flags() {
        let model = model_for("a: 1\nb: {c: 2}\n");
        let top = ModelIndex::invalid();
        let a = model.index(0, 0, &top);
        let b = model.index(1, 0, &top);
        let placeholder = model.index(0, 0, &b);

        assert!(model.flags(&a).editable);
        assert!(model.flags(&a.sibling_at_column(VALUE_COLUMN)).editable);
        assert!(model.flags(&b).editable);
        assert!(!model.flags(&b.sibling_at_column(VALUE_COLUMN)).editable);
        assert!(!model.flags(&placeholder).enabled);
    }

    #[test]
    fn test_set_data() {
        let model = model_for("a: 1\nb: {c: 2}\n");
        let changed = Arc::new(Mutex::new(Vec::new()));
        let recv = changed.clone();
        model
            .signals()
            .data_changed
            .connect(move |(index, _, _)| recv.lock().push(index.column()));

        let top = ModelIndex::invalid();
        let a = model.index(0, 0, &top);
        assert!(model.set_data(&a, ItemData::from("alpha"), ItemRole::Edit));
        assert!(model.set_data(&a.sibling_at_column(VALUE_COLUMN), ItemData::from("42"), ItemRole::Edit));

        let b_value = model.index(1, VALUE_COLUMN, &top);
        assert!(!model.set_data(&b_value, ItemData::from("nope"), ItemRole::Edit));
        assert!(!model.set_data(&a, ItemData::None, ItemRole::Edit));
        assert!(!model.set_data(&a, ItemData::from("x"), ItemRole::ToolTip));

        let alpha = model.node(model.node_at_path(&["alpha"]).unwrap()).unwrap();
        assert_eq!(alpha.value(), Some("42"));
        assert_eq!(*changed.lock(), vec![LABEL_COLUMN, VALUE_COLUMN]);
    }

    #[test]
    fn test_populate_signals() {
        let model = model_for("b: {c: 2, d: 3}\n");
        let events = Arc::new(Mutex::new(Vec::new()));

        let removed = events.clone();
        model
            .signals()
            .rows_removed
            .connect(move |(_, first, last)| removed.lock().push(("removed", *first, *last)));
        let inserted = events.clone();
        model
            .signals()
            .rows_inserted
            .connect(move |(_, first, last)| inserted.lock().push(("inserted", *first, *last)));

        let b = model.node_at_path(&["b"]).unwrap();
        model.on_expand(b).unwrap();

        assert_eq!(*events.lock(), vec![("removed", 0, 0), ("inserted", 0, 1)]);
    }

    #[test]
    fn test_expand_all_emits_single_reset() {
        let model = model_for("a: {b: [1, 2]}\nc: {d: 3}\n");
        let events = Arc::new(Mutex::new(Vec::new()));

        let inserted = events.clone();
        model
            .signals()
            .rows_inserted
            .connect(move |_| inserted.lock().push("inserted"));
        let reset = events.clone();
        model
            .signals()
            .model_reset
            .connect(move |_| reset.lock().push("reset"));

        assert_eq!(model.expand_all(model.root()).unwrap(), 3);
        assert_eq!(*events.lock(), vec!["reset"]);

        let c = model.node_at_path(&["c"]).unwrap();
        assert!(!model.populate(c).unwrap());
        assert!(!model.signals().rows_inserted.is_blocked());
    }

    #[test]
    fn test_initialize_emits_reset() {
        let model = YamlTreeModel::new();
        let resets = Arc::new(Mutex::new(0));
        let counter = resets.clone();
        model.signals().model_reset.connect(move |_| *counter.lock() += 1);

        model.initialize(yaml::parse("a: 1\n").unwrap());
        assert_eq!(*resets.lock(), 1);
    }
}
