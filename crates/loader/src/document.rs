//! Property list documents and format detection.

use crate::{binary, xml};
use plistab_core::{Error, KeyPath, Result, Value};
use std::fs;
use std::path::Path;

/// Serialization of a property list document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Xml,
    Binary,
}

impl Format {
    /// Detects the format from the leading bytes.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.starts_with(binary::MAGIC) {
            Format::Binary
        } else {
            Format::Xml
        }
    }

    /// Returns the format name.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Xml => "XML",
            Format::Binary => "binary",
        }
    }
}

/// A parsed property list.
#[derive(Clone, Debug)]
pub struct Document {
    format: Format,
    root: Value,
}

impl Document {
    /// Parses an in-memory document, detecting XML or binary encoding.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let format = Format::detect(bytes);
        let root = match format {
            Format::Xml => xml::parse(bytes)?,
            Format::Binary => binary::parse(bytes)?,
        };
        tracing::debug!(
            format = format.name(),
            bytes = bytes.len(),
            kind = root.kind().name(),
            "parsed property list"
        );
        Ok(Self { format, root })
    }

    /// Reads and parses the document at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|err| Error::io(path.display().to_string(), err.to_string()))?;
        Self::parse(&bytes)
    }

    /// Returns the detected encoding.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the root value; an empty `<plist>` is `Null`.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Consumes the document, returning the root value.
    pub fn into_root(self) -> Value {
        self.root
    }

    /// Returns the sub-tree selected by `path`, or `Null`.
    pub fn project(&self, path: &KeyPath) -> &Value {
        self.root.project(path)
    }
}
