//! plistab Core - value model and shared types for plistab.
//!
//! This crate provides the foundational types for flattening property-list
//! documents into tables:
//!
//! - `Value`: An immutable, reference-counted document node (Map, List, Text, Integer, Real, Blob, Null)
//! - `PlistMap`: The dictionary payload of a map node, iterated in key order
//! - `ValueKind`: The discriminant of a value
//! - `KeyPath`: Dot-delimited projection of a sub-tree
//! - `Error`: Error types shared by the workspace
//!
//! # Example
//!
//! ```rust
//! use plistab_core::{KeyPath, PlistMap, Value, ValueKind};
//!
//! let mut info = PlistMap::new();
//! info.insert("name", Value::text("Alice"));
//! info.insert("admin", Value::boolean(true));
//!
//! let mut root = PlistMap::new();
//! root.insert("user", Value::map(info));
//! let doc = Value::map(root);
//!
//! assert_eq!(doc.get("user").kind(), ValueKind::Map);
//! assert_eq!(doc.project(&KeyPath::parse("user.admin")), &Value::integer(1));
//! assert!(doc.project(&KeyPath::parse("user.missing")).is_null());
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
mod path;
mod types;
mod value;

pub use error::{Error, Result};
pub use path::KeyPath;
pub use types::ValueKind;
pub use value::{PlistMap, Value, NULL};
