//! Core traits for the model/view split.
//!
//! A view only ever talks to an [`ItemModel`]: it asks for row counts,
//! indices and data, and listens to [`ModelSignals`] to learn about changes.

use yamlview_core::Signal;

use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};

/// Flags indicating what operations are allowed on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    /// Item can be selected.
    pub selectable: bool,
    /// Item can be edited.
    pub editable: bool,
    /// Item is enabled (can interact).
    pub enabled: bool,
    /// Item will never have children.
    pub never_has_children: bool,
}

impl ItemFlags {
    /// Creates flags with all defaults (selectable and enabled only).
    pub fn new() -> Self {
        Self {
            selectable: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// Creates flags for a disabled item.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Creates flags for an editable item.
    pub fn editable() -> Self {
        Self {
            selectable: true,
            editable: true,
            enabled: true,
            ..Default::default()
        }
    }

    /// Sets the editable flag.
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Sets the never-has-children flag.
    pub fn with_never_has_children(mut self, leaf: bool) -> Self {
        self.never_has_children = leaf;
        self
    }
}

/// The interface a tree view uses to read and edit a hierarchical model.
///
/// # Implementation Requirements
///
/// At minimum, implement:
/// - [`row_count`](ItemModel::row_count)
/// - [`column_count`](ItemModel::column_count)
/// - [`data`](ItemModel::data)
/// - [`index`](ItemModel::index)
/// - [`parent`](ItemModel::parent)
///
/// Editable models also implement [`set_data`](ItemModel::set_data) and
/// [`flags`](ItemModel::flags). Models that build their rows on demand
/// implement [`can_fetch_more`](ItemModel::can_fetch_more) and
/// [`fetch_more`](ItemModel::fetch_more); a view calls `fetch_more` when the
/// user expands a row for which `can_fetch_more` is true.
pub trait ItemModel: Send + Sync {
    /// Returns the number of rows under the given parent.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Returns the number of columns for children of the given parent.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// Returns the data stored under the given role for the item at index.
    ///
    /// Returns `ItemData::None` for invalid indices and unsupported roles.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// Creates a model index for the given row and column under parent.
    ///
    /// Returns `ModelIndex::invalid()` if the position is out of bounds.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// Returns the parent of the given index.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    /// Returns the signals for this model.
    fn signals(&self) -> &ModelSignals;

    // -------------------------------------------------------------------------
    // Optional methods with default implementations
    // -------------------------------------------------------------------------

    /// Sets the data for the given index and role.
    ///
    /// Returns `true` if the data was set. The default is read-only.
    /// Implementations emit `data_changed` after a successful edit.
    fn set_data(&self, _index: &ModelIndex, _value: ItemData, _role: ItemRole) -> bool {
        false
    }

    /// Returns the flags for the item at the given index.
    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::new()
    }

    /// Returns `true` if the item at parent has any children.
    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    /// Returns header text for a column.
    fn header_data(&self, _section: usize, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// Returns `true` if children of parent have not been built yet.
    fn can_fetch_more(&self, _parent: &ModelIndex) -> bool {
        false
    }

    /// Builds the children of parent.
    fn fetch_more(&self, _parent: &ModelIndex) {}

    // -------------------------------------------------------------------------
    // Convenience methods
    // -------------------------------------------------------------------------

    /// Returns the display text for an item.
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).into_string()
    }

    /// Creates a sibling index at the given row and column, validated
    /// against the model.
    fn sibling(&self, index: &ModelIndex, row: usize, column: usize) -> ModelIndex {
        if !index.is_valid() {
            return ModelIndex::invalid();
        }
        self.index(row, column, &index.parent())
    }
}

/// Signals emitted by item models.
///
/// - **Before modifications**: `rows_about_to_be_*`
/// - **After modifications**: `rows_*`
/// - **Edits**: `data_changed`
/// - **A new document**: `model_about_to_reset` / `model_reset`
pub struct ModelSignals {
    /// Emitted just before rows are inserted.
    /// Args: (parent index, first row, last row)
    pub rows_about_to_be_inserted: Signal<(ModelIndex, usize, usize)>,

    /// Emitted after rows have been inserted.
    /// Args: (parent index, first row, last row)
    pub rows_inserted: Signal<(ModelIndex, usize, usize)>,

    /// Emitted just before rows are removed.
    /// Args: (parent index, first row, last row)
    pub rows_about_to_be_removed: Signal<(ModelIndex, usize, usize)>,

    /// Emitted after rows have been removed.
    /// Args: (parent index, first row, last row)
    pub rows_removed: Signal<(ModelIndex, usize, usize)>,

    /// Emitted when data in existing items changes.
    /// Args: (top-left index, bottom-right index, changed roles)
    pub data_changed: Signal<(ModelIndex, ModelIndex, Vec<ItemRole>)>,

    /// Emitted before the model is reset.
    pub model_about_to_reset: Signal<()>,

    /// Emitted after the model has been reset.
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    /// Creates a new set of model signals.
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            data_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Emits signals for row insertion around `insert_fn`.
    pub fn emit_rows_inserted<F>(&self, parent: ModelIndex, first: usize, last: usize, insert_fn: F)
    where
        F: FnOnce(),
    {
        self.rows_about_to_be_inserted.emit((parent.clone(), first, last));
        insert_fn();
        self.rows_inserted.emit((parent, first, last));
    }

    /// Emits signals for row removal around `remove_fn`.
    pub fn emit_rows_removed<F>(&self, parent: ModelIndex, first: usize, last: usize, remove_fn: F)
    where
        F: FnOnce(),
    {
        self.rows_about_to_be_removed.emit((parent.clone(), first, last));
        remove_fn();
        self.rows_removed.emit((parent, first, last));
    }

    /// Emits the data_changed signal for a single item.
    pub fn emit_data_changed_single(&self, index: ModelIndex, roles: Vec<ItemRole>) {
        self.data_changed.emit((index.clone(), index, roles));
    }

    /// Emits signals for a model reset around `reset_fn`.
    pub fn emit_reset<F>(&self, reset_fn: F)
    where
        F: FnOnce(),
    {
        self.model_about_to_reset.emit(());
        reset_fn();
        self.model_reset.emit(());
    }

    /// Runs `bulk_fn` with row signals blocked, bracketed by a reset.
    ///
    /// Views rebuild once instead of handling every row inserted or removed
    /// along the way.
    pub fn emit_reset_batched<F, R>(&self, bulk_fn: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.model_about_to_reset.emit(());
        self.set_row_signals_blocked(true);
        let result = bulk_fn();
        self.set_row_signals_blocked(false);
        self.model_reset.emit(());
        result
    }

    fn set_row_signals_blocked(&self, blocked: bool) {
        self.rows_about_to_be_inserted.set_blocked(blocked);
        self.rows_inserted.set_blocked(blocked);
        self.rows_about_to_be_removed.set_blocked(blocked);
        self.rows_removed.set_blocked(blocked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_item_flags() {
        let flags = ItemFlags::new();
        assert!(flags.selectable);
        assert!(flags.enabled);
        assert!(!flags.editable);

        let editable = ItemFlags::editable().with_never_has_children(true);
        assert!(editable.editable);
        assert!(editable.never_has_children);

        assert!(!ItemFlags::disabled().enabled);
    }

    #[test]
    fn test_emit_rows_removed_order() {
        let signals = ModelSignals::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv_about = received.clone();
        signals
            .rows_about_to_be_removed
            .connect(move |(_, first, last)| recv_about.lock().push(("about", *first, *last)));
        let recv_done = received.clone();
        signals
            .rows_removed
            .connect(move |(_, first, last)| recv_done.lock().push(("done", *first, *last)));

        let inside = received.clone();
        signals.emit_rows_removed(ModelIndex::invalid(), 0, 0, || inside.lock().push(("remove", 0, 0)));

        assert_eq!(
            *received.lock(),
            vec![("about", 0, 0), ("remove", 0, 0), ("done", 0, 0)]
        );
    }

    #[test]
    fn test_emit_reset() {
        let signals = ModelSignals::new();
        let counter = Arc::new(Mutex::new(0));

        let c1 = counter.clone();
        signals.model_about_to_reset.connect(move |_| *c1.lock() += 1);
        let c2 = counter.clone();
        signals.model_reset.connect(move |_| *c2.lock() += 10);

        signals.emit_reset(|| {});
        assert_eq!(*counter.lock(), 11);
    }

    #[test]
    fn test_emit_reset_batched_blocks_rows() {
        let signals = ModelSignals::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let recv_rows = received.clone();
        signals
            .rows_inserted
            .connect(move |_| recv_rows.lock().push("rows"));
        let recv_reset = received.clone();
        signals
            .model_reset
            .connect(move |_| recv_reset.lock().push("reset"));

        let answer = signals.emit_reset_batched(|| {
            signals.emit_rows_inserted(ModelIndex::invalid(), 0, 3, || {});
            42
        });

        assert_eq!(answer, 42);
        assert_eq!(*received.lock(), vec!["reset"]);

        signals.emit_rows_inserted(ModelIndex::invalid(), 0, 0, || {});
        assert_eq!(*received.lock(), vec!["reset", "rows"]);
    }
}
