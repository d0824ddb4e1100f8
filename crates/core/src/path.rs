//! Key paths for projecting a sub-tree out of a document.
//!
//! A key path is a dot-delimited list of map keys, e.g. `"Info.Versions"`.
//! The empty string selects the whole document.

use crate::value::{Value, NULL};
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// A parsed dot-delimited key path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parses a dot-delimited key path. The empty string yields the root path.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        Self {
            segments: path.split('.').map(ToString::to_string).collect(),
        }
    }

    /// Returns the path that selects the whole document.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns true if this path selects the whole document.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the map keys this path descends through.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl Value {
    /// Descends into nested maps along `path`.
    ///
    /// Returns [`NULL`] as soon as a segment misses or the current node is not a map.
    pub fn project(&self, path: &KeyPath) -> &Value {
        let mut current = self;
        for segment in path.segments() {
            current = current.get(segment);
            if current.is_null() {
                return &NULL;
            }
        }
        current
    }
}
