//! Untyped structured-text documents.
//!
//! Chart values and install profiles are read without per-schema structs: they are
//! parsed into a [`Value`] tree of strings, mappings and lists, and the few fields a
//! check cares about are addressed by path (see [`resolve`]).
//!
//! Scalars other than strings (numbers, booleans, nulls) are kept only as a type
//! name in [`Value::Other`]; no check ever compares them, and traversal through one
//! is an error.
//!
//! # Examples
//!
//! ```rust
//! use release_validator::document::{parse_values, resolve};
//!
//! let doc = parse_values(b"global:\n  tag: 1.2.3\n", "values.yaml").unwrap();
//! assert_eq!(resolve(&doc, &["global", "tag"]).unwrap(), Some("1.2.3"));
//! ```

mod path;

pub use path::{hub_tag_paths, resolve, split_prefix};

use std::collections::BTreeMap;

use crate::core::ReleaseError;

/// A node of an untyped document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A string scalar; always a terminal result of traversal
    Str(String),
    /// An ordered list, indexed by the next path segment
    List(Vec<Value>),
    /// A mapping from string keys to values
    Map(BTreeMap<String, Value>),
    /// Any other scalar; holds the type name for diagnostics
    Other(&'static str),
}

impl Value {
    /// Name of this value's type as reported in traversal errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Other(kind) => *kind,
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::String(s) => Value::Str(s),
            serde_yaml::Value::Sequence(seq) => Value::List(seq.into_iter().map(Value::from).collect()),
            serde_yaml::Value::Mapping(mapping) => Value::Map(convert_mapping(mapping)),
            serde_yaml::Value::Number(_) => Value::Other("number"),
            serde_yaml::Value::Bool(_) => Value::Other("bool"),
            serde_yaml::Value::Null => Value::Other("null"),
            serde_yaml::Value::Tagged(_) => Value::Other("tagged"),
        }
    }
}

/// Root of a parsed document: a mapping from string keys to values.
pub type Document = BTreeMap<String, Value>;

fn convert_mapping(mapping: serde_yaml::Mapping) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    for (key, value) in mapping {
        let key = match key {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            other => {
                tracing::trace!(target: "document", "Skipping non-scalar mapping key: {:?}", other);
                continue;
            }
        };
        out.insert(key, Value::from(value));
    }
    out
}

/// Parse a YAML values document into an untyped [`Document`].
///
/// An empty input yields an empty document. A top-level value that is not a mapping
/// is a parse error, as is any syntax error; both keep the parser's location in the
/// wrapped error.
///
/// # Arguments
///
/// * `bytes` - Raw document contents
/// * `source_desc` - Where the bytes came from, used in error messages
pub fn parse_values(bytes: &[u8], source_desc: &str) -> Result<Document, ReleaseError> {
    let parsed: Option<serde_yaml::Mapping> =
        serde_yaml::from_slice(bytes).map_err(|source| ReleaseError::ParseError {
            source_desc: source_desc.to_string(),
            len: bytes.len(),
            source,
        })?;

    Ok(parsed.map(convert_mapping).unwrap_or_default())
}
