//! Document metadata.
//!
//! Metadata is an immutable chain of small ordered layers. Deriving new
//! metadata pushes one layer holding only the overrides; lookups walk the
//! chain from the newest layer to the oldest, so derivation is O(1) and the
//! parent's metadata is never touched.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::document::Document;
use crate::path::NormalizedPath;

/// A metadata value.
///
/// The set of value kinds is closed; modules needing richer data store it as
/// a blob or as nested documents.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// A string.
    Text(String),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Number(f64),
    /// A boolean.
    Bool(bool),
    /// A virtual path.
    Path(NormalizedPath),
    /// A nested document list.
    Documents(Vec<Document>),
    /// Opaque bytes.
    Blob(Arc<[u8]>),
}

impl MetaValue {
    /// Returns the string, if this is a `Text` value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is an `Integer` value.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number; integers are widened.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a `Bool` value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the path, if this is a `Path` value.
    #[must_use]
    pub fn as_path(&self) -> Option<&NormalizedPath> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the nested documents, if this is a `Documents` value.
    #[must_use]
    pub fn as_documents(&self) -> Option<&[Document]> {
        match self {
            Self::Documents(docs) => Some(docs),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a `Blob` value.
    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Path(p) => write!(f, "{p}"),
            Self::Documents(docs) => write!(f, "[{} documents]", docs.len()),
            Self::Blob(bytes) => write!(f, "[{} bytes]", bytes.len()),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for MetaValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NormalizedPath> for MetaValue {
    fn from(value: NormalizedPath) -> Self {
        Self::Path(value)
    }
}

impl From<Vec<Document>> for MetaValue {
    fn from(value: Vec<Document>) -> Self {
        Self::Documents(value)
    }
}

impl From<Vec<u8>> for MetaValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Blob(value.into())
    }
}

struct Layer {
    entries: Vec<(String, MetaValue)>,
    parent: Option<Arc<Layer>>,
}

// Unlinks uniquely owned ancestors one at a time so long chains do not
// recurse on drop.
impl Drop for Layer {
    fn drop(&mut self) {
        let mut parent = self.parent.take();
        while let Some(next) = parent {
            match Arc::try_unwrap(next) {
                Ok(mut layer) => parent = layer.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// An immutable, layered metadata mapping.
///
/// # Examples
///
/// ```
/// use docflow::Metadata;
///
/// let base = Metadata::from_entries([("Title", "Home"), ("Layout", "default")]);
/// let derived = base.layer([("Title", "About")]);
///
/// assert_eq!(derived.get_text("Title"), Some("About"));
/// assert_eq!(derived.get_text("Layout"), Some("default"));
/// assert_eq!(base.get_text("Title"), Some("Home"));
/// ```
#[derive(Clone, Default)]
pub struct Metadata {
    head: Option<Arc<Layer>>,
}

impl Metadata {
    /// Creates empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates metadata with a single layer.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetaValue>,
    {
        Self::new().layer(entries)
    }

    /// Derives metadata whose lookups see `overrides` first.
    ///
    /// Within `overrides` a repeated key keeps its last value. Empty
    /// overrides return a clone without adding a layer.
    #[must_use]
    pub fn layer<I, K, V>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<MetaValue>,
    {
        let mut entries: Vec<(String, MetaValue)> = Vec::new();
        for (key, value) in overrides {
            let key = key.into();
            let value = value.into();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
        if entries.is_empty() {
            return self.clone();
        }
        Self {
            head: Some(Arc::new(Layer {
                entries,
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks up a key, newest layer first.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.layers()
            .find_map(|layer| layer.entries.iter().find(|(k, _)| k == key))
            .map(|(_, v)| v)
    }

    /// Returns true if any layer holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Looks up a `Text` value.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_text)
    }

    /// Looks up an `Integer` value.
    #[must_use]
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(MetaValue::as_integer)
    }

    /// Looks up a `Bool` value.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(MetaValue::as_bool)
    }

    /// Looks up a `Path` value.
    #[must_use]
    pub fn get_path(&self, key: &str) -> Option<&NormalizedPath> {
        self.get(key).and_then(MetaValue::as_path)
    }

    /// Looks up a `Documents` value.
    #[must_use]
    pub fn get_documents(&self, key: &str) -> Option<&[Document]> {
        self.get(key).and_then(MetaValue::as_documents)
    }

    /// The visible entries in first-insertion order.
    ///
    /// A key keeps the position where it first appeared in the chain and
    /// shows the value of its newest override.
    #[must_use]
    pub fn iter(&self) -> Vec<(&str, &MetaValue)> {
        let mut chain: Vec<&Layer> = self.layers().collect();
        chain.reverse();

        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut visible: Vec<(&str, &MetaValue)> = Vec::new();
        for layer in chain {
            for (key, value) in &layer.entries {
                match positions.get(key.as_str()) {
                    Some(&idx) => visible[idx].1 = value,
                    None => {
                        positions.insert(key, visible.len());
                        visible.push((key, value));
                    }
                }
            }
        }
        visible
    }

    /// The visible keys in first-insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.iter().into_iter().map(|(k, _)| k).collect()
    }

    /// Number of visible keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().len()
    }

    /// Returns true if no key is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of layers in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers().count()
    }

    fn layers(&self) -> impl Iterator<Item = &Layer> {
        std::iter::successors(self.head.as_deref(), |layer| layer.parent.as_deref())
    }
}

impl PartialEq for Metadata {
    fn eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.iter() == other.iter(),
        }
    }
}

impl fmt::Debug for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
