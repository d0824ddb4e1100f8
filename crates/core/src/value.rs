//! Value type definitions for plistab.
//!
//! This module defines the `Value` enum which represents one node of a parsed
//! property-list document, and `PlistMap`, the dictionary payload of `Value::Map`.
//!
//! Values are immutable once built. Containers and byte/text payloads live behind
//! `Arc`, so cloning a value never deep-copies the tree and finished trees can be
//! shared across threads.

use crate::types::ValueKind;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

/// The canonical null value.
///
/// Returned by reference from every accessor that has nothing to return.
pub static NULL: Value = Value::Null;

/// A node of a parsed document.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Dictionary node
    Map(Arc<PlistMap>),
    /// Array node
    List(Arc<[Value]>),
    /// String node
    Text(Arc<str>),
    /// Integer node (also used for booleans)
    Integer(i64),
    /// Floating point node (also used for dates)
    Real(f64),
    /// Binary data node
    Blob(Arc<[u8]>),
    /// Absent or unrecognized node
    #[default]
    Null,
}

/// A string-keyed dictionary with unique keys.
///
/// Entries are kept sorted by key, so iteration is in ascending key order
/// and lookups are a binary search.
#[derive(Clone, Debug, Default)]
pub struct PlistMap {
    entries: Vec<(String, Value)>,
}

impl PlistMap {
    /// Creates a new empty map.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a map with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Gets a value by key. O(log n)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .ok()
            .map(|idx| &self.entries[idx].1)
    }

    /// Inserts a key-value pair, replacing the value of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.binary_search_by(|(k, _)| k.as_str().cmp(&key)) {
            Ok(idx) => {
                self.entries[idx].1 = value;
            }
            Err(idx) => {
                self.entries.insert(idx, (key, value));
            }
        }
    }

    /// Returns true if the map contains the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .binary_search_by(|(k, _)| k.as_str().cmp(key))
            .is_ok()
    }

    /// Returns an iterator over the keys, in key order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns an iterator over the values, in key order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Returns an iterator over key-value pairs, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PlistMap {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut map = PlistMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl PartialEq for PlistMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|((k1, v1), (k2, v2))| k1 == k2 && v1 == v2)
    }
}

impl Value {
    /// Creates a text value.
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        Value::Text(value.into())
    }

    /// Creates an integer value.
    pub fn integer(value: i64) -> Self {
        Value::Integer(value)
    }

    /// Creates an integer value of 1 or 0.
    pub fn boolean(value: bool) -> Self {
        Value::Integer(value as i64)
    }

    /// Creates a real value.
    pub fn real(value: f64) -> Self {
        Value::Real(value)
    }

    /// Creates a blob value holding an exact copy of the bytes.
    pub fn blob(value: impl Into<Arc<[u8]>>) -> Self {
        Value::Blob(value.into())
    }

    /// Creates a map value.
    pub fn map(value: PlistMap) -> Self {
        Value::Map(Arc::new(value))
    }

    /// Creates a list value.
    pub fn list(value: Vec<Value>) -> Self {
        Value::List(value.into())
    }

    /// Returns the kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Map(_) => ValueKind::Map,
            Value::List(_) => ValueKind::List,
            Value::Text(_) => ValueKind::Text,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::Blob(_) => ValueKind::Blob,
            Value::Null => ValueKind::Null,
        }
    }

    /// Returns the element count of a container, or 1 for anything else.
    pub fn size(&self) -> usize {
        match self {
            Value::Map(map) => map.len(),
            Value::List(list) => list.len(),
            _ => 1,
        }
    }

    /// Returns true unless this value is a map or a list.
    #[inline]
    pub fn is_primitive(&self) -> bool {
        !self.kind().is_container()
    }

    /// Returns false only for `Null`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.is_null()
    }

    /// Returns true if this value is Null.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Looks up `key` in a map.
    ///
    /// Returns [`NULL`] when this is not a map or the key is missing.
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Value::Map(map) => map.get(key).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    /// Returns the element at `index` of a list.
    ///
    /// Returns [`NULL`] when this is not a list or the index is out of range.
    pub fn at(&self, index: usize) -> &Value {
        match self {
            Value::List(list) => list.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }

    /// Returns the map if this is a Map.
    pub fn as_map(&self) -> Option<&PlistMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the elements if this is a List.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the string if this is a Text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer if this is an Integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the number if this is a Real.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the bytes if this is a Blob.
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => {
                // Handle NaN comparison
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Null, Value::Null) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{:?}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::List(list) => {
                f.write_str("[")?;
                for (i, value) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
            Value::Text(text) => write!(f, "{:?}", text),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::Blob(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Value::Null => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_null_value() {
        let v = Value::default();
        assert!(v.is_null());
        assert!(!v.is_valid());
        assert!(v.is_primitive());
        assert_eq!(v.kind(), ValueKind::Null);
        assert_eq!(v.size(), 1);
    }

    #[test]
    fn test_named_constructors() {
        assert_eq!(Value::text("abc").kind(), ValueKind::Text);
        assert_eq!(Value::integer(-1).kind(), ValueKind::Integer);
        assert_eq!(Value::real(0.5).kind(), ValueKind::Real);
        assert_eq!(Value::blob(vec![1u8, 2]).kind(), ValueKind::Blob);
        assert_eq!(Value::map(PlistMap::new()).kind(), ValueKind::Map);
        assert_eq!(Value::list(vec![]).kind(), ValueKind::List);
    }

    #[test]
    fn test_boolean_is_integer() {
        assert_eq!(Value::boolean(true), Value::Integer(1));
        assert_eq!(Value::boolean(false), Value::Integer(0));
    }

    #[test]
    fn test_size() {
        let list = Value::list(vec![Value::integer(1), Value::integer(2), Value::Null]);
        assert_eq!(list.size(), 3);

        let map: PlistMap = [("a", Value::integer(1))].into_iter().collect();
        assert_eq!(Value::map(map).size(), 1);

        assert_eq!(Value::text("").size(), 1);
        assert_eq!(Value::blob(Vec::<u8>::new()).size(), 1);
    }

    #[test]
    fn test_primitive_and_valid() {
        assert!(Value::text("x").is_primitive());
        assert!(Value::blob(vec![0u8]).is_primitive());
        assert!(!Value::list(vec![]).is_primitive());
        assert!(!Value::map(PlistMap::new()).is_primitive());
        assert!(Value::integer(0).is_valid());
    }

    #[test]
    fn test_wrong_kind_access_yields_null() {
        let text = Value::text("x");
        assert!(text.get("key").is_null());
        assert!(text.at(0).is_null());

        let list = Value::list(vec![Value::integer(7)]);
        assert!(list.get("0").is_null());
        assert_eq!(list.at(0), &Value::integer(7));
        assert!(list.at(1).is_null());

        let map: PlistMap = [("k", Value::integer(1))].into_iter().collect();
        let map = Value::map(map);
        assert!(map.at(0).is_null());
        assert!(map.get("missing").is_null());
        assert_eq!(map.get("k"), &Value::integer(1));
    }

    #[test]
    fn test_null_is_shared() {
        let a = Value::integer(1);
        let b = Value::text("b");
        assert!(core::ptr::eq(a.get("x"), b.at(3)));
        assert!(core::ptr::eq(a.get("x"), &NULL));
    }

    #[test]
    fn test_map_sorted_keys() {
        let mut map = PlistMap::new();
        map.insert("z", Value::integer(1));
        map.insert("", Value::integer(2));
        map.insert("m", Value::integer(3));

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["", "m", "z"]);
    }

    #[test]
    fn test_map_insert_replaces() {
        let mut map = PlistMap::new();
        map.insert("key", Value::integer(1));
        map.insert("key", Value::integer(2));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("key"), Some(&Value::integer(2)));
        assert!(map.contains_key("key"));
        assert!(!map.contains_key("other"));
    }

    #[test]
    fn test_clone_shares_storage() {
        let list = Value::list(vec![Value::text("a"), Value::text("b")]);
        let copy = list.clone();
        match (&list, &copy) {
            (Value::List(a), Value::List(b)) => assert!(Arc::ptr_eq(a, b)),
            _ => panic!("Wrong value kind"),
        }
    }

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Value::text("hello").as_text(), Some("hello"));
        assert_eq!(Value::integer(42).as_integer(), Some(42));
        assert_eq!(Value::real(3.5).as_real(), Some(3.5));
        assert_eq!(Value::blob(vec![1u8, 2, 3]).as_blob(), Some(&[1u8, 2, 3][..]));
        assert_eq!(Value::integer(42).as_text(), None);
        assert_eq!(Value::Null.as_list(), None);
        assert!(Value::list(vec![]).as_list().is_some());
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::real(f64::NAN), Value::real(f64::NAN));
        assert_ne!(Value::integer(1), Value::real(1.0));
        assert_ne!(Value::text(""), Value::Null);
        assert_eq!(
            Value::list(vec![Value::integer(1)]),
            Value::list(vec![Value::integer(1)])
        );
    }

    #[test]
    fn test_display() {
        let map: PlistMap = [
            ("a", Value::integer(1)),
            ("b", Value::list(vec![Value::text("x"), Value::Null])),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            Value::map(map).to_string(),
            "{\"a\": 1, \"b\": [\"x\", null]}"
        );
        assert_eq!(Value::blob(vec![0u8; 4]).to_string(), "<4 bytes>");
    }
}
