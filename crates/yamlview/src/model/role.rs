//! Data roles for item models.
//!
//! Roles define what kind of data is being requested from or set on a model
//! item. One cell can answer several roles.

/// Roles for accessing different aspects of item data.
///
/// - **Display**: the text to show
/// - **Edit**: the text an editor starts from
/// - **ToolTip**: extra text shown on demand
///
/// # Example
///
/// ```ignore
/// use yamlview::model::{ItemModel, ItemRole};
///
/// let label = model.data(&index, ItemRole::Display);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemRole {
    /// Primary text to display.
    Display,
    /// Value for editing.
    Edit,
    /// Supplementary text, such as the inline form of a collapsed container.
    ToolTip,
}

/// Data returned by an item model for a role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ItemData {
    /// No data.
    #[default]
    None,
    /// Text data.
    String(String),
}

impl ItemData {
    /// Returns `true` if this is `ItemData::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, ItemData::None)
    }

    /// Returns `true` if this contains some data.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Attempts to get the data as a string slice.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            ItemData::String(s) => Some(s.as_str()),
            ItemData::None => None,
        }
    }

    /// Attempts to get the data as an owned string.
    pub fn into_string(self) -> Option<String> {
        match self {
            ItemData::String(s) => Some(s),
            ItemData::None => None,
        }
    }
}

impl From<String> for ItemData {
    fn from(s: String) -> Self {
        ItemData::String(s)
    }
}

impl From<&str> for ItemData {
    fn from(s: &str) -> Self {
        ItemData::String(s.to_string())
    }
}

impl From<Option<String>> for ItemData {
    fn from(opt: Option<String>) -> Self {
        match opt {
            Some(s) => ItemData::String(s),
            None => ItemData::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_data_string() {
        let data = ItemData::from("hello");
        assert_eq!(data.as_string(), Some("hello"));
        assert!(data.is_some());
        assert_eq!(data.into_string(), Some("hello".to_string()));
    }

    #[test]
    fn test_item_data_from_option() {
        assert!(ItemData::from(None::<String>).is_none());
        assert_eq!(
            ItemData::from(Some("x".to_string())).as_string(),
            Some("x")
        );
    }
}
