//! YAML codec.
//!
//! Converts between YAML text and [`YamlValue`], the generic value tree the
//! viewer works with. Parsing is done by `serde_yaml`; the raw value is then
//! flattened into three shapes only:
//!
//! - **Mapping**: string keys, insertion order preserved
//! - **Sequence**: ordered values
//! - **Scalar**: the text form of any scalar
//!
//! Tags are discarded on load, so `!Point {x: 1}` or a
//! `!!python/object:...` node is just a mapping. Nothing in a document can
//! cause a custom type to be constructed.
//!
//! # Example
//!
//! ```
//! use yamlview::file::yaml::{self, YamlValue};
//!
//! let value = yaml::parse("name: demo\nports: [80, 443]\n").unwrap();
//! assert_eq!(value.get("name"), Some(&YamlValue::scalar("demo")));
//!
//! let text = yaml::serialize(&value).unwrap();
//! assert!(text.contains("- 443"));
//! ```

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_yaml::Value;
use yamlview_core::logging::targets;

use crate::error::{ParseError, SerializeError};

/// The kind of a [`YamlValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Ordered string-keyed mapping.
    Mapping,
    /// Ordered list.
    Sequence,
    /// Scalar text.
    Scalar,
}

impl ValueKind {
    /// Returns true for mappings and sequences.
    pub fn is_container(self) -> bool {
        !matches!(self, ValueKind::Scalar)
    }
}

/// A parsed YAML value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlValue {
    /// Key/value pairs in document order.
    Mapping(IndexMap<String, YamlValue>),
    /// Values in document order.
    Sequence(Vec<YamlValue>),
    /// The string form of a scalar.
    Scalar(String),
}

impl Default for YamlValue {
    fn default() -> Self {
        YamlValue::Mapping(IndexMap::new())
    }
}

impl YamlValue {
    /// Creates a scalar value.
    pub fn scalar(text: impl Into<String>) -> Self {
        YamlValue::Scalar(text.into())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            YamlValue::Mapping(_) => ValueKind::Mapping,
            YamlValue::Sequence(_) => ValueKind::Sequence,
            YamlValue::Scalar(_) => ValueKind::Scalar,
        }
    }

    /// Returns true for mappings and sequences.
    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Number of direct entries. Scalars have none.
    pub fn len(&self) -> usize {
        match self {
            YamlValue::Mapping(map) => map.len(),
            YamlValue::Sequence(items) => items.len(),
            YamlValue::Scalar(_) => 0,
        }
    }

    /// Returns true if this value has no direct entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            YamlValue::Scalar(text) => Some(text),
            _ => None,
        }
    }

    /// Looks up a mapping entry by key.
    pub fn get(&self, key: &str) -> Option<&YamlValue> {
        match self {
            YamlValue::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// The summary shown next to a collapsed container.
    ///
    /// Sequences read `(list with N items)`; mappings and scalars have none.
    pub fn summary(&self) -> Option<String> {
        match self {
            YamlValue::Sequence(items) => {
                let n = items.len();
                Some(format!("(list with {} item{})", n, if n == 1 { "" } else { "s" }))
            }
            _ => None,
        }
    }

    /// Consumes the value and returns its labelled entries in natural order.
    ///
    /// Mapping entries are labelled by key, sequence elements by position.
    /// Scalars yield nothing.
    pub fn into_entries(self) -> Vec<(String, YamlValue)> {
        match self {
            YamlValue::Mapping(map) => map.into_iter().collect(),
            YamlValue::Sequence(items) => items
                .into_iter()
                .enumerate()
                .map(|(n, item)| (n.to_string(), item))
                .collect(),
            YamlValue::Scalar(_) => Vec::new(),
        }
    }

    /// Renders the value on one line in YAML flow style.
    pub fn to_flow_string(&self) -> String {
        let mut out = String::new();
        self.write_flow(&mut out);
        out
    }

    fn write_flow(&self, out: &mut String) {
        match self {
            YamlValue::Scalar(text) => out.push_str(text),
            YamlValue::Sequence(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_flow(out);
                }
                out.push(']');
            }
            YamlValue::Mapping(map) => {
                out.push('{');
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(key);
                    out.push_str(": ");
                    value.write_flow(out);
                }
                out.push('}');
            }
        }
    }
}

/// Parses YAML text into a [`YamlValue`].
///
/// An empty document parses to the scalar `null`.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed YAML, multi-document input, alias
/// expansion beyond the parser's recursion and repetition limits, or a
/// mapping whose keys become equal as text (`1` and `"1"`).
pub fn parse(text: &str) -> Result<YamlValue, ParseError> {
    let raw: Value = serde_yaml::from_str(text)?;
    from_raw(raw)
}

/// Serializes a [`YamlValue`] as block-style YAML without tags.
///
/// Scalars that are YAML booleans, numbers or null (and render back to the
/// same text) are written plain; all other scalars are written as strings,
/// quoted when needed. `parse(&serialize(v)?)` therefore equals `v`.
pub fn serialize(value: &YamlValue) -> Result<String, SerializeError> {
    Ok(serde_yaml::to_string(&to_raw(value))?)
}

fn from_raw(value: Value) -> Result<YamlValue, ParseError> {
    match value {
        Value::Mapping(map) => {
            let mut entries = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                let value = from_raw(value)?;
                match entries.entry(key_text(key)?) {
                    Entry::Occupied(entry) => {
                        tracing::warn!(target: targets::FILE, key = %entry.key(), "keys collide as text");
                        return Err(ParseError::new(
                            format!("duplicate key `{}` once keys are read as text", entry.key()),
                            None,
                        ));
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                }
            }
            Ok(YamlValue::Mapping(entries))
        }
        Value::Sequence(items) => Ok(YamlValue::Sequence(
            items.into_iter().map(from_raw).collect::<Result<_, _>>()?,
        )),
        Value::Tagged(tagged) => {
            tracing::trace!(target: targets::FILE, tag = %tagged.tag, "discarding tag");
            from_raw(tagged.value)
        }
        scalar => Ok(YamlValue::Scalar(scalar_text(&scalar))),
    }
}

fn key_text(key: Value) -> Result<String, ParseError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Tagged(tagged) => key_text(tagged.value),
        Value::Mapping(_) | Value::Sequence(_) => Ok(from_raw(key)?.to_flow_string()),
        scalar => Ok(scalar_text(&scalar)),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_) => String::new(),
    }
}

fn to_raw(value: &YamlValue) -> Value {
    match value {
        YamlValue::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(key, value)| (Value::String(key.clone()), to_raw(value)))
                .collect(),
        ),
        YamlValue::Sequence(items) => Value::Sequence(items.iter().map(to_raw).collect()),
        YamlValue::Scalar(text) => plain_scalar(text),
    }
}

fn plain_scalar(text: &str) -> Value {
    if let Ok(resolved) = serde_yaml::from_str::<Value>(text) {
        if matches!(resolved, Value::Null | Value::Bool(_) | Value::Number(_))
            && scalar_text(&resolved) == text
        {
            return resolved;
        }
    }
    Value::String(text.to_string())
}
