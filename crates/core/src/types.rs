//! Value kind definitions for plistab.
//!
//! This module defines the discriminant of a parsed document node.

/// The kind of a [`Value`](crate::Value).
///
/// Exactly one kind is active for any value. `Map` and `List` are containers,
/// every other kind is primitive and occupies a single table cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// String-keyed dictionary with unique keys
    Map,
    /// Ordered sequence of values
    List,
    /// UTF-8 string
    Text,
    /// 64-bit signed integer (booleans are stored as 0/1)
    Integer,
    /// 64-bit floating point number (dates are stored as seconds)
    Real,
    /// Raw byte sequence
    Blob,
    /// Absent or unrecognized node
    Null,
}

impl ValueKind {
    /// Returns true for the container kinds.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self, ValueKind::Map | ValueKind::List)
    }

    /// Returns a lowercase name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Map => "map",
            ValueKind::List => "list",
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::Blob => "blob",
            ValueKind::Null => "null",
        }
    }
}
