//! plistab Loader - property list files as flat tables.
//!
//! This crate reads Apple property lists and flattens them with
//! `plistab-table`:
//!
//! - `Document`: XML or binary (`bplist00`) parsing into a [`plistab_core::Value`]
//! - `LoadOptions`: Depth limit and key path selection
//! - `PlistTable`: The flattened table with field names, height and cells
//! - `TableCursor`: Row-by-row scanning of a `PlistTable`
//!
//! # Example
//!
//! ```rust
//! use plistab_loader::{LoadOptions, PlistTable};
//!
//! let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
//! <plist version="1.0">
//!   <dict>
//!     <key>servers</key>
//!     <array>
//!       <dict><key>host</key><string>a</string><key>port</key><integer>80</integer></dict>
//!       <dict><key>host</key><string>b</string><key>port</key><integer>443</integer></dict>
//!     </array>
//!   </dict>
//! </plist>"#;
//!
//! let options = LoadOptions::new().with_key_path("servers");
//! let table = PlistTable::load_bytes(xml, &options).unwrap();
//! assert_eq!(table.fields(), &["host", "port"]);
//!
//! let mut cursor = table.cursor();
//! let mut ports = Vec::new();
//! while !cursor.eof() {
//!     ports.push(cursor.column(1).as_integer());
//!     cursor.advance();
//! }
//! assert_eq!(ports, vec![Some(80), Some(443)]);
//! ```

pub mod binary;
pub mod cursor;
pub mod date;
pub mod document;
pub mod options;
pub mod plist_table;
pub mod xml;

/// Deepest container nesting either parser accepts.
pub const MAX_NESTING: usize = 512;

pub use cursor::TableCursor;
pub use document::{Document, Format};
pub use options::LoadOptions;
pub use plist_table::PlistTable;
