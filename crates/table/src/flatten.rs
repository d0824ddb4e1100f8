//! Flattening of a value tree into a single table.
//!
//! Every leaf of the document becomes a cell of a column whose name is the
//! path of map keys leading to it. Cardinality follows the containers:
//!
//! - A **map** combines its entries with a cross product, so sibling fields
//!   that expand to several rows multiply.
//! - A **list** stacks its elements with a row union, so each element adds
//!   its own rows.
//! - Anything else is a one-row, one-column table.
//!
//! ## Field names
//!
//! A map entry is named `prefix.key`, or just `key` at the root; an empty key
//! reuses the prefix (`_` at the root). Primitive list elements go into a
//! column named after the list, `_` for a root list. Each further level of
//! directly nested lists appends `._`. Maps inside a list contribute their
//! own keys under the list's prefix, without an extra array level.
//!
//! ## Depth
//!
//! Every map or list entered spends one unit of the depth budget. A container
//! reached with an exhausted budget flattens to the empty table, dropping its
//! whole sub-tree.

use crate::table::Table;
use alloc::format;
use alloc::string::{String, ToString};
use plistab_core::{PlistMap, Result, Value};

/// Name used for anonymous positions: the root scalar, root lists and empty root keys.
pub const ANONYMOUS_FIELD: &str = "_";

/// Recursion budget for flattening.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Depth(usize);

impl Depth {
    /// Normalizes a user-facing maximum depth, where 0 means unlimited.
    pub fn normalize(max_depth: usize) -> Self {
        if max_depth == 0 {
            Self::unlimited()
        } else {
            Self(max_depth)
        }
    }

    /// A budget of exactly `levels` containers. `limited(0)` is already exhausted.
    pub fn limited(levels: usize) -> Self {
        Self(levels)
    }

    /// A budget that no real document exhausts.
    pub fn unlimited() -> Self {
        Self(usize::MAX)
    }

    /// Returns the number of container levels left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.0
    }

    /// Spends one level, or returns None when the budget is exhausted.
    #[inline]
    fn descend(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }
}

/// Flattens values with a fixed depth budget.
#[derive(Clone, Copy, Debug)]
pub struct Flattener {
    depth: Depth,
}

impl Flattener {
    /// Creates a flattener; a `max_depth` of 0 means unlimited.
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: Depth::normalize(max_depth),
        }
    }

    /// Creates a flattener with an explicit budget.
    pub fn with_depth(depth: Depth) -> Self {
        Self { depth }
    }

    /// Returns the depth budget.
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Flattens `value` from the root, with no field prefix.
    pub fn flatten(&self, value: &Value) -> Result<Table<Value>> {
        flatten(value, self.depth, "")
    }

    /// Flattens `value` with every field name placed under `prefix`.
    pub fn flatten_with_prefix(&self, value: &Value, prefix: &str) -> Result<Table<Value>> {
        flatten(value, self.depth, prefix)
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::with_depth(Depth::unlimited())
    }
}

/// Returns the field name of the map entry `key` below `prefix`.
///
/// | prefix | key   | name         |
/// |--------|-------|--------------|
/// | empty  | empty | `_`          |
/// | empty  | `k`   | `k`          |
/// | `p`    | empty | `p`          |
/// | `p`    | `k`   | `p.k`        |
pub fn child_name(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (true, true) => ANONYMOUS_FIELD.to_string(),
        (true, false) => key.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{}.{}", prefix, key),
    }
}

/// Flattens `value` with the given budget and field prefix.
///
/// The only error is [`plistab_core::Error::RowOverflow`], raised when a map's
/// entries multiply to more rows than `usize` can count.
pub fn flatten(value: &Value, depth: Depth, prefix: &str) -> Result<Table<Value>> {
    match value {
        Value::Map(map) => flatten_map(map, depth, prefix),
        Value::List(list) => flatten_list(list, depth, prefix, 0),
        _ => Ok(Table::single(leaf_name(prefix), value.clone())),
    }
}

fn leaf_name(prefix: &str) -> &str {
    if prefix.is_empty() {
        ANONYMOUS_FIELD
    } else {
        prefix
    }
}

fn flatten_map(map: &PlistMap, depth: Depth, prefix: &str) -> Result<Table<Value>> {
    let mut table = Table::new();
    let Some(depth) = depth.descend() else {
        return Ok(table);
    };

    for (key, child) in map.iter() {
        let name = child_name(prefix, key);
        table.cross_product(flatten(child, depth, &name)?)?;
    }
    Ok(table)
}

/// `level` counts how many lists directly enclose this one.
fn flatten_list(list: &[Value], depth: Depth, prefix: &str, level: usize) -> Result<Table<Value>> {
    let mut table = Table::new();
    let Some(depth) = depth.descend() else {
        return Ok(table);
    };

    let name = if prefix.is_empty() {
        ANONYMOUS_FIELD.to_string()
    } else if level == 0 {
        prefix.to_string()
    } else {
        format!("{}.{}", prefix, ANONYMOUS_FIELD)
    };

    for item in list {
        let item_table = match item {
            Value::List(inner) => flatten_list(inner, depth, &name, level + 1)?,
            _ if item.is_primitive() => flatten(item, depth, &name)?,
            _ => flatten(item, depth, prefix)?,
        };
        table.union_rows(item_table);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    fn map(entries: Vec<(&str, Value)>) -> Value {
        Value::map(entries.into_iter().collect())
    }

    fn unlimited(value: &Value) -> Table<Value> {
        Flattener::default().flatten(value).unwrap()
    }

    fn sorted_fields(table: &Table<Value>) -> Vec<&str> {
        let mut fields: Vec<&str> = table.fields().iter().map(String::as_str).collect();
        fields.sort();
        fields
    }

    #[test]
    fn test_child_name() {
        assert_eq!(child_name("", ""), "_");
        assert_eq!(child_name("", "key"), "key");
        assert_eq!(child_name("prefix", ""), "prefix");
        assert_eq!(child_name("prefix", "key"), "prefix.key");
    }

    #[test]
    fn test_depth_normalize() {
        assert_eq!(Depth::normalize(0), Depth::unlimited());
        assert_eq!(Depth::normalize(3).remaining(), 3);
        assert_eq!(Depth::limited(0).descend(), None);
        assert_eq!(Depth::limited(2).descend(), Some(Depth::limited(1)));
    }

    #[test]
    fn test_primitive() {
        let table = unlimited(&Value::boolean(true));
        assert_eq!(table.fields(), &["_"]);
        assert_eq!(table.height(), 1);
        assert_eq!(table.column("_"), &[Value::integer(1)]);
    }

    #[test]
    fn test_primitive_with_prefix() {
        let table = Flattener::default()
            .flatten_with_prefix(&Value::real(1.5), "a.b")
            .unwrap();
        assert_eq!(table.fields(), &["a.b"]);
        assert_eq!(table.column("a.b"), &[Value::real(1.5)]);
    }

    #[test]
    fn test_null_and_blob_are_cells() {
        let table = unlimited(&Value::list(vec![Value::Null, Value::blob(vec![1u8, 2])]));
        assert_eq!(table.fields(), &["_"]);
        assert_eq!(table.column("_"), &[Value::Null, Value::blob(vec![1u8, 2])]);
    }

    #[test]
    fn test_empty_map() {
        let table = unlimited(&Value::map(PlistMap::new()));
        assert_eq!(table.height(), 0);
        assert!(table.fields().is_empty());
    }

    #[test]
    fn test_empty_list() {
        let table = unlimited(&Value::list(vec![]));
        assert_eq!(table.height(), 0);
        assert!(table.fields().is_empty());
    }

    #[test]
    fn test_map_one_level() {
        let doc = map(vec![("", Value::text("text")), ("key", Value::boolean(true))]);
        let table = unlimited(&doc);
        assert_eq!(table.fields(), &["_", "key"]);
        assert_eq!(table.height(), 1);
        assert_eq!(table.column("_"), &[Value::text("text")]);
        assert_eq!(table.column("key"), &[Value::integer(1)]);
    }

    #[test]
    fn test_map_two_levels() {
        let doc = map(vec![
            ("", Value::text("text")),
            (
                "key1",
                map(vec![("", Value::text("")), ("key2", Value::boolean(true))]),
            ),
        ]);
        let table = unlimited(&doc);
        assert_eq!(sorted_fields(&table), vec!["_", "key1", "key1.key2"]);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_map_three_levels() {
        let doc = map(vec![
            ("", Value::text("text")),
            (
                "key1",
                map(vec![
                    ("", Value::text("")),
                    (
                        "key2",
                        map(vec![("", Value::text("")), ("key3", Value::boolean(true))]),
                    ),
                ]),
            ),
        ]);
        let table = unlimited(&doc);
        assert_eq!(
            sorted_fields(&table),
            vec!["_", "key1", "key1.key2", "key1.key2.key3"]
        );
    }

    #[test]
    fn test_list_one_level() {
        let doc = Value::list(vec![Value::boolean(true), Value::text("")]);
        let table = unlimited(&doc);
        assert_eq!(table.fields(), &["_"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.column("_"), &[Value::integer(1), Value::text("")]);
    }

    #[test]
    fn test_list_two_levels() {
        let doc = Value::list(vec![
            Value::boolean(true),
            Value::text(""),
            Value::list(vec![Value::boolean(true), Value::text("")]),
        ]);
        let table = unlimited(&doc);
        assert_eq!(table.fields(), &["_", "_._"]);
        assert_eq!(table.height(), 4);
        assert_eq!(
            table.column("_"),
            &[Value::integer(1), Value::text(""), Value::Null, Value::Null]
        );
        assert_eq!(
            table.column("_._"),
            &[Value::Null, Value::Null, Value::integer(1), Value::text("")]
        );
    }

    #[test]
    fn test_list_three_levels() {
        let doc = Value::list(vec![
            Value::list(vec![
                Value::boolean(true),
                Value::list(vec![Value::boolean(true), Value::text("")]),
            ]),
            Value::boolean(true),
            Value::text(""),
        ]);
        let table = unlimited(&doc);
        assert_eq!(table.fields(), &["_._", "_._._", "_"]);
        assert_eq!(table.height(), 5);
    }

    #[test]
    fn test_list_of_maps() {
        let doc = Value::list(vec![
            map(vec![("key1", Value::text("value1")), ("key3", Value::text("value3"))]),
            map(vec![("key1", Value::text("value1")), ("key2", Value::text("value2"))]),
        ]);
        let table = unlimited(&doc);
        assert_eq!(sorted_fields(&table), vec!["key1", "key2", "key3"]);
        assert_eq!(table.height(), 2);
        assert_eq!(
            table.column("key1"),
            &[Value::text("value1"), Value::text("value1")]
        );
        assert_eq!(table.column("key2"), &[Value::Null, Value::text("value2")]);
        assert_eq!(table.column("key3"), &[Value::text("value3"), Value::Null]);
    }

    #[test]
    fn test_map_of_lists_multiplies() {
        let doc = map(vec![
            ("key1", Value::list(vec![Value::boolean(true), Value::text("")])),
            (
                "key2",
                Value::list(vec![Value::integer(1), Value::integer(2), Value::integer(3)]),
            ),
        ]);
        let table = unlimited(&doc);
        assert_eq!(table.fields(), &["key1", "key2"]);
        assert_eq!(table.height(), 6);
        assert_eq!(
            table.column("key1"),
            &[
                Value::integer(1),
                Value::text(""),
                Value::integer(1),
                Value::text(""),
                Value::integer(1),
                Value::text(""),
            ]
        );
        assert_eq!(
            table.column("key2"),
            &[
                Value::integer(1),
                Value::integer(1),
                Value::integer(2),
                Value::integer(2),
                Value::integer(3),
                Value::integer(3),
            ]
        );
    }

    #[test]
    fn test_map_of_lists_of_maps() {
        let doc = map(vec![
            (
                "key1",
                Value::list(vec![
                    Value::boolean(true),
                    Value::text(""),
                    map(vec![(
                        "key2",
                        Value::list(vec![
                            Value::boolean(true),
                            Value::text(""),
                            Value::list(vec![
                                Value::boolean(true),
                                Value::boolean(false),
                                Value::list(vec![Value::list(vec![]), Value::list(vec![])]),
                            ]),
                        ]),
                    )]),
                ]),
            ),
            ("key3", Value::boolean(true)),
        ]);
        let table = unlimited(&doc);
        assert_eq!(
            sorted_fields(&table),
            vec!["key1", "key1.key2", "key1.key2._", "key3"]
        );
        assert_eq!(table.height(), 6);
        assert_eq!(table.column("key3"), &vec![Value::integer(1); 6]);
    }

    #[test]
    fn test_complex_structure() {
        let doc = map(vec![(
            "key1",
            Value::list(vec![
                map(vec![
                    ("", Value::text("value1")),
                    ("key2", Value::text("value2")),
                    (
                        "key3",
                        Value::list(vec![
                            map(vec![
                                ("key4", Value::text("value4")),
                                ("key5", Value::text("value5")),
                            ]),
                            Value::integer(2),
                            Value::integer(3),
                            Value::integer(4),
                            Value::integer(5),
                            Value::list(vec![Value::integer(2), Value::integer(3)]),
                        ]),
                    ),
                ]),
                map(vec![
                    ("", Value::text("value1")),
                    ("key2", Value::text("value2")),
                    (
                        "key3",
                        Value::list(vec![
                            map(vec![("key6", Value::text("value6"))]),
                            Value::integer(5),
                        ]),
                    ),
                ]),
            ]),
        )]);
        let table = unlimited(&doc);
        assert_eq!(
            table.fields(),
            &[
                "key1",
                "key1.key2",
                "key1.key3.key4",
                "key1.key3.key5",
                "key1.key3",
                "key1.key3._",
                "key1.key3.key6",
            ]
        );
        assert_eq!(table.height(), 9);
        assert_eq!(table.column("key1"), &vec![Value::text("value1"); 9]);
        assert_eq!(
            table.column("key1.key3"),
            &[
                Value::Null,
                Value::integer(2),
                Value::integer(3),
                Value::integer(4),
                Value::integer(5),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::integer(5),
            ]
        );
        assert_eq!(
            table.column("key1.key3.key6"),
            &[
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::text("value6"),
                Value::Null,
            ]
        );
    }

    #[test]
    fn test_depth_one_keeps_only_root_scalars() {
        let doc = map(vec![
            ("a", Value::integer(1)),
            ("b", map(vec![("c", Value::integer(2))])),
            ("d", Value::list(vec![Value::integer(3)])),
        ]);
        let table = Flattener::new(1).flatten(&doc).unwrap();
        assert_eq!(table.fields(), &["a"]);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_depth_two_reaches_nested_scalars() {
        let doc = map(vec![
            ("a", Value::integer(1)),
            ("b", map(vec![("c", Value::integer(2))])),
            ("d", Value::list(vec![Value::integer(3), Value::integer(4)])),
        ]);
        let table = Flattener::new(2).flatten(&doc).unwrap();
        assert_eq!(table.fields(), &["a", "b.c", "d"]);
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_exhausted_depth_is_empty() {
        let doc = map(vec![("a", Value::integer(1))]);
        let table = flatten(&doc, Depth::limited(0), "").unwrap();
        assert_eq!(table.height(), 0);
        assert!(table.fields().is_empty());

        let scalar = flatten(&Value::integer(1), Depth::limited(0), "").unwrap();
        assert_eq!(scalar.height(), 1);
    }

    #[test]
    fn test_exhausted_list_drops_sibling_rows() {
        let doc = map(vec![
            ("a", Value::integer(1)),
            ("b", Value::list(vec![Value::list(vec![Value::integer(2)])])),
        ]);
        let table = Flattener::new(2).flatten(&doc).unwrap();
        assert_eq!(table.fields(), &["a"]);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_empty_sibling_does_not_erase_rows() {
        let doc = map(vec![
            ("a", Value::integer(1)),
            ("b", Value::list(vec![])),
            ("c", Value::map(PlistMap::new())),
        ]);
        let table = unlimited(&doc);
        assert_eq!(table.fields(), &["a"]);
        assert_eq!(table.height(), 1);
    }
}
