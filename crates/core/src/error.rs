//! Error types for plistab.
//!
//! Flattening itself is total; the only failures are a document that cannot be
//! parsed or loaded, and a row count that no longer fits in `usize`.

use alloc::string::String;
use core::fmt;

/// Result type alias for plistab operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for plistab operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The document bytes are not a well-formed property list.
    Parse {
        format: &'static str,
        message: String,
    },
    /// The document could not be read.
    Io {
        path: String,
        message: String,
    },
    /// The document (or the sub-tree selected by the key path) is null.
    NullDocument {
        key_path: String,
    },
    /// A cross product or union would produce more rows than `usize` can count.
    RowOverflow {
        height: usize,
        other: usize,
    },
    /// Columns handed to a table constructor have different lengths.
    RaggedColumns {
        field: String,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse { format, message } => {
                write!(f, "Failed to parse {} property list: {}", format, message)
            }
            Error::Io { path, message } => {
                write!(f, "Failed loading plist from '{}': {}", path, message)
            }
            Error::NullDocument { key_path } => {
                if key_path.is_empty() {
                    write!(f, "Document is empty")
                } else {
                    write!(f, "Key path '{}' selects nothing", key_path)
                }
            }
            Error::RowOverflow { height, other } => {
                write!(f, "Row count overflow combining {} and {} rows", height, other)
            }
            Error::RaggedColumns {
                field,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Column {} has {} values, expected {}",
                    field, got, expected
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl Error {
    /// Creates a parse error for the given document format.
    pub fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Error::Parse {
            format,
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a null document error.
    pub fn null_document(key_path: impl Into<String>) -> Self {
        Error::NullDocument {
            key_path: key_path.into(),
        }
    }

    /// Creates a row overflow error.
    pub fn row_overflow(height: usize, other: usize) -> Self {
        Error::RowOverflow { height, other }
    }

    /// Creates a ragged columns error.
    pub fn ragged_columns(field: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::RaggedColumns {
            field: field.into(),
            expected,
            got,
        }
    }
}
