//! plistab Table - columnar table algebra and document flattening.
//!
//! This crate turns a [`plistab_core::Value`] tree into a rectangular table:
//!
//! - `Table`: Named, equal-length columns with row union and cross product
//! - `Flattener`: Recursive conversion of a value into a `Table<Value>`
//! - `Depth`: The recursion budget of a flattening pass
//!
//! # Example
//!
//! ```rust
//! use plistab_core::{PlistMap, Value};
//! use plistab_table::Flattener;
//!
//! let mut doc = PlistMap::new();
//! doc.insert("host", Value::text("db1"));
//! doc.insert(
//!     "ports",
//!     Value::list(vec![Value::integer(5432), Value::integer(5433)]),
//! );
//!
//! let table = Flattener::new(0).flatten(&Value::map(doc)).unwrap();
//! assert_eq!(table.fields(), &["host", "ports"]);
//! assert_eq!(table.height(), 2);
//! assert_eq!(table.column("host"), &[Value::text("db1"), Value::text("db1")]);
//! ```

#![no_std]

extern crate alloc;

pub mod flatten;
pub mod table;

pub use flatten::{child_name, flatten, Depth, Flattener, ANONYMOUS_FIELD};
pub use table::Table;
