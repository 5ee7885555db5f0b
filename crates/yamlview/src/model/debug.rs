//! Text rendering of an item model as a tree.
//!
//! Used by the terminal front-end to show the document and handy in tests
//! and logs:
//!
//! ```text
//! a: 1
//! b
//! ├── c: 2
//! └── d: 3
//! e: (list with 2 items)
//! └── …
//! ```
//!
//! Only rows the model already has are printed; rendering never populates.

use std::fmt::Write;

use super::index::ModelIndex;
use super::role::ItemRole;
use super::traits::ItemModel;
use super::yaml_tree_model::{LABEL_COLUMN, VALUE_COLUMN};

/// Style options for tree rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Indentation with a dash per row.
    Compact,
}

/// Configuration for [`TreeDebug`] output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree branches.
    pub style: TreeStyle,
    /// Whether to print the value column after the label.
    pub show_values: bool,
    /// Maximum depth to print (None for unlimited). Top-level rows are depth 0.
    pub max_depth: Option<usize>,
    /// Spaces added per level after the branch character.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_values: true,
            max_depth: None,
            indent_size: 3,
        }
    }
}

impl TreeFormatOptions {
    /// Options for plain ASCII output.
    pub fn ascii() -> Self {
        Self {
            style: TreeStyle::Ascii,
            ..Default::default()
        }
    }

    /// Labels only.
    pub fn minimal() -> Self {
        Self {
            show_values: false,
            ..Default::default()
        }
    }
}

/// Renders the rows of an [`ItemModel`] as an indented tree.
#[derive(Debug, Clone, Default)]
pub struct TreeDebug {
    options: TreeFormatOptions,
}

impl TreeDebug {
    /// Create a renderer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &TreeFormatOptions {
        &self.options
    }

    /// Render every row of the model.
    pub fn format_all<M: ItemModel + ?Sized>(&self, model: &M) -> String {
        let mut output = String::new();
        self.format_children_into(model, &ModelIndex::invalid(), &mut Vec::new(), &mut output);
        output
    }

    /// Render the row at `index` and everything below it.
    pub fn format_subtree<M: ItemModel + ?Sized>(&self, model: &M, index: &ModelIndex) -> String {
        if !index.is_valid() {
            return self.format_all(model);
        }
        let mut output = String::new();
        self.write_row(model, index, &[], true, &mut output);
        self.format_children_into(model, index, &mut vec![true], &mut output);
        output
    }

    /// `trail` holds, for each ancestor level, whether that ancestor was the
    /// last of its siblings.
    fn format_children_into<M: ItemModel + ?Sized>(
        &self,
        model: &M,
        parent: &ModelIndex,
        trail: &mut Vec<bool>,
        output: &mut String,
    ) {
        if let Some(max) = self.options.max_depth {
            if trail.len() > max {
                return;
            }
        }

        let rows = model.row_count(parent);
        for row in 0..rows {
            let index = model.index(row, LABEL_COLUMN, parent);
            if !index.is_valid() {
                continue;
            }
            let is_last = row + 1 == rows;
            self.write_row(model, &index, trail, is_last, output);

            trail.push(is_last);
            self.format_children_into(model, &index, trail, output);
            trail.pop();
        }
    }

    fn write_row<M: ItemModel + ?Sized>(
        &self,
        model: &M,
        index: &ModelIndex,
        trail: &[bool],
        is_last: bool,
        output: &mut String,
    ) {
        output.push_str(&self.build_prefix(trail, is_last));

        let label = model
            .data(index, ItemRole::Display)
            .into_string()
            .unwrap_or_default();
        output.push_str(&label);

        if self.options.show_values {
            let value = model.data(&index.sibling_at_column(VALUE_COLUMN), ItemRole::Display);
            if let Some(value) = value.as_string() {
                // Writing to a String cannot fail.
                let _ = write!(output, ": {}", value);
            }
        }

        output.push('\n');
    }

    /// Build the prefix for a row below `trail.len()` ancestors.
    fn build_prefix(&self, trail: &[bool], is_last: bool) -> String {
        // Top-level rows have no connector.
        let Some((_, ancestors)) = trail.split_first() else {
            return String::new();
        };

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for &ancestor_is_last in ancestors {
            if ancestor_is_last || branch.is_empty() {
                prefix.push(' ');
            } else {
                prefix.push_str(branch);
            }
            for _ in 0..self.options.indent_size {
                prefix.push(' ');
            }
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}
