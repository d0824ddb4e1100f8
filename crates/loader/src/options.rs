//! Load configuration.

use plistab_core::KeyPath;
use plistab_table::Depth;

/// Options for turning a document into a table.
///
/// # Example
///
/// ```rust
/// use plistab_loader::LoadOptions;
///
/// let options = LoadOptions::new().with_max_depth(3).with_key_path("library.tracks");
/// assert_eq!(options.depth().remaining(), 3);
/// assert_eq!(options.key_path().segments(), &["library", "tracks"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    max_depth: usize,
    key_path: String,
}

impl LoadOptions {
    /// Unlimited depth over the whole document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits flattening to `max_depth` container levels; 0 means unlimited.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Selects the sub-tree at a dot-separated key path before flattening.
    pub fn with_key_path(mut self, key_path: impl Into<String>) -> Self {
        self.key_path = key_path.into();
        self
    }

    /// Returns the normalized depth budget.
    pub fn depth(&self) -> Depth {
        Depth::normalize(self.max_depth)
    }

    /// Returns the parsed key path.
    pub fn key_path(&self) -> KeyPath {
        KeyPath::parse(&self.key_path)
    }
}
