//! Model index for addressing rows in a hierarchical model.
//!
//! A `ModelIndex` locates one cell of an `ItemModel`: a row and column under
//! a parent, plus an internal ID the model uses to find its own node.

use std::hash::{Hash, Hasher};

/// Represents a position within an `ItemModel`.
///
/// Each valid index contains:
/// - Row and column within the parent
/// - The parent index (absent for top-level rows)
/// - An internal ID identifying the model's node
///
/// The invalid index stands for the hidden root. Top-level rows are
/// addressed with `ModelIndex::invalid()` as their parent.
///
/// # Index Validity
///
/// Indices should be used immediately and not stored long-term. Loading a
/// new document invalidates every index handed out before.
///
/// # Example
///
/// ```ignore
/// use yamlview::model::{ItemModel, ModelIndex};
///
/// let first = model.index(0, 0, &ModelIndex::invalid());
/// let first_child = model.index(0, 0, &first);
/// let value_cell = first.sibling_at_column(1);
/// ```
#[derive(Clone)]
pub struct ModelIndex {
    row: usize,
    column: usize,
    parent: Option<Box<ModelIndex>>,
    internal_id: u64,
    valid: bool,
}

impl Default for ModelIndex {
    fn default() -> Self {
        Self::invalid()
    }
}

impl ModelIndex {
    /// Creates an invalid (null) model index.
    ///
    /// Used as the parent of top-level rows and returned for anything out of
    /// range.
    #[inline]
    pub const fn invalid() -> Self {
        Self {
            row: 0,
            column: 0,
            parent: None,
            internal_id: 0,
            valid: false,
        }
    }

    /// Creates a valid index carrying a model-specific identifier.
    ///
    /// Called by model implementations; views obtain indices through
    /// [`ItemModel::index`](super::ItemModel::index).
    #[inline]
    pub fn with_internal_id(row: usize, column: usize, parent: ModelIndex, internal_id: u64) -> Self {
        Self {
            row,
            column,
            parent: if parent.is_valid() {
                Some(Box::new(parent))
            } else {
                None
            },
            internal_id,
            valid: true,
        }
    }

    /// Returns `true` if this is a valid index.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the row of this index within its parent.
    #[inline]
    pub fn row(&self) -> usize {
        self.row
    }

    /// Returns the column of this index.
    #[inline]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Returns the parent index, or an invalid index for top-level rows.
    #[inline]
    pub fn parent(&self) -> ModelIndex {
        match &self.parent {
            Some(parent) => (**parent).clone(),
            None => ModelIndex::invalid(),
        }
    }

    /// Returns `true` if this index has a valid parent.
    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// Returns the internal ID associated with this index.
    #[inline]
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Returns the index of the same row in another column.
    ///
    /// Every column of a row refers to the same node, so the internal ID is
    /// kept. Returns an invalid index if this index is invalid.
    #[inline]
    pub fn sibling_at_column(&self, column: usize) -> ModelIndex {
        if !self.is_valid() {
            return ModelIndex::invalid();
        }
        ModelIndex::with_internal_id(self.row, column, self.parent(), self.internal_id)
    }

    /// Returns the depth of this index. Top-level rows have depth 0.
    pub fn depth(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        let mut depth = 0;
        let mut current = self.parent();
        while current.is_valid() {
            depth += 1;
            current = current.parent();
        }
        depth
    }
}

impl std::fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            f.debug_struct("ModelIndex")
                .field("row", &self.row)
                .field("column", &self.column)
                .field("depth", &self.depth())
                .field("internal_id", &self.internal_id)
                .finish()
        } else {
            write!(f, "ModelIndex(invalid)")
        }
    }
}

impl PartialEq for ModelIndex {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_valid(), other.is_valid()) {
            (false, false) => true,
            (true, true) => {
                self.row == other.row
                    && self.column == other.column
                    && self.internal_id == other.internal_id
                    && self.parent == other.parent
            }
            _ => false,
        }
    }
}

impl Eq for ModelIndex {}

impl Hash for ModelIndex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.valid.hash(state);
        if self.valid {
            self.row.hash(state);
            self.column.hash(state);
            // Parent is implied by the node the internal ID names
            self.internal_id.hash(state);
        }
    }
}
