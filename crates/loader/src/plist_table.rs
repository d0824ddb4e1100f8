//! A property list document flattened into a queryable table.

use crate::cursor::TableCursor;
use crate::document::Document;
use crate::options::LoadOptions;
use plistab_core::{Error, Result, Value, NULL};
use plistab_table::{Flattener, Table};
use std::path::Path;

/// The flattened table of one document.
///
/// # Example
///
/// ```rust
/// use plistab_core::Value;
/// use plistab_loader::{LoadOptions, PlistTable};
///
/// let xml = br#"<plist version="1.0">
///   <array>
///     <dict><key>name</key><string>a</string></dict>
///     <dict><key>name</key><string>b</string><key>size</key><integer>2</integer></dict>
///   </array>
/// </plist>"#;
///
/// let table = PlistTable::load_bytes(xml, &LoadOptions::new()).unwrap();
/// assert_eq!(table.fields(), &["name", "size"]);
/// assert_eq!(table.height(), 2);
/// assert_eq!(table.cell(0, 1), &Value::Null);
/// assert_eq!(table.schema_sql(), r#"CREATE TABLE x("name", "size")"#);
/// ```
#[derive(Clone, Debug)]
pub struct PlistTable {
    table: Table<Value>,
}

impl PlistTable {
    /// Loads and flattens the document at `path`.
    pub fn load(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let document = Document::open(path).map_err(|err| {
            tracing::warn!(path = %path.display(), error = %err, "failed loading plist");
            err
        })?;
        Self::from_value(document.root(), options)
    }

    /// Flattens an in-memory XML or binary document.
    pub fn load_bytes(bytes: &[u8], options: &LoadOptions) -> Result<Self> {
        let document = Document::parse(bytes).map_err(|err| {
            tracing::warn!(bytes = bytes.len(), error = %err, "failed parsing plist");
            err
        })?;
        Self::from_value(document.root(), options)
    }

    /// Projects `value` along the configured key path and flattens the result.
    ///
    /// Fails with [`Error::NullDocument`] when there is nothing to flatten.
    pub fn from_value(value: &Value, options: &LoadOptions) -> Result<Self> {
        let key_path = options.key_path();
        let selected = value.project(&key_path);
        if selected.is_null() {
            tracing::warn!(key_path = %key_path, "key path selects nothing");
            return Err(Error::null_document(key_path.to_string()));
        }

        let depth = options.depth();
        let table = Flattener::with_depth(depth).flatten(selected)?;
        tracing::debug!(
            key_path = %key_path,
            depth = depth.remaining(),
            fields = table.width(),
            height = table.height(),
            "flattened plist"
        );
        Ok(Self { table })
    }

    /// Returns the column names in first-seen order.
    pub fn fields(&self) -> &[String] {
        self.table.fields()
    }

    /// Returns the number of rows.
    pub fn height(&self) -> usize {
        self.table.height()
    }

    /// Returns the cell at `row` of the field at position `column`, or `Null`
    /// when either is out of range.
    pub fn cell(&self, row: usize, column: usize) -> &Value {
        self.table.cell(row, column).unwrap_or(&NULL)
    }

    /// Returns the underlying table.
    pub fn table(&self) -> &Table<Value> {
        &self.table
    }

    /// Consumes self, returning the underlying table.
    pub fn into_table(self) -> Table<Value> {
        self.table
    }

    /// Returns a cursor positioned at the first row.
    pub fn cursor(&self) -> TableCursor<'_> {
        TableCursor::new(self)
    }

    /// Declares the table for a SQL host, one quoted column per field.
    pub fn schema_sql(&self) -> String {
        let columns: Vec<String> = self
            .fields()
            .iter()
            .map(|field| format!("\"{}\"", field.replace('"', "\"\"")))
            .collect();
        format!("CREATE TABLE x({})", columns.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plistab_core::PlistMap;

    fn doc() -> Value {
        let mut inner = PlistMap::new();
        inner.insert("b", Value::list(vec![Value::integer(1), Value::integer(2)]));
        let mut root = PlistMap::new();
        root.insert("a", Value::map(inner));
        root.insert("c", Value::text("x"));
        Value::map(root)
    }

    #[test]
    fn test_from_value() {
        let table = PlistTable::from_value(&doc(), &LoadOptions::new()).unwrap();
        assert_eq!(table.fields(), &["a.b", "c"]);
        assert_eq!(table.height(), 2);
        assert_eq!(table.cell(1, 0), &Value::integer(2));
        assert_eq!(table.cell(1, 1), &Value::text("x"));
    }

    #[test]
    fn test_cell_out_of_range_is_null() {
        let table = PlistTable::from_value(&doc(), &LoadOptions::new()).unwrap();
        assert!(table.cell(2, 0).is_null());
        assert!(table.cell(0, 2).is_null());
    }

    #[test]
    fn test_key_path() {
        let options = LoadOptions::new().with_key_path("a");
        let table = PlistTable::from_value(&doc(), &options).unwrap();
        assert_eq!(table.fields(), &["b"]);
        assert_eq!(table.height(), 2);
    }

    #[test]
    fn test_missing_key_path() {
        let options = LoadOptions::new().with_key_path("a.zzz");
        let err = PlistTable::from_value(&doc(), &options).unwrap_err();
        assert_eq!(err, Error::null_document("a.zzz"));
    }

    #[test]
    fn test_null_document() {
        let err = PlistTable::from_value(&Value::Null, &LoadOptions::new()).unwrap_err();
        assert_eq!(err.to_string(), "Document is empty");
    }

    #[test]
    fn test_depth_limit() {
        let options = LoadOptions::new().with_max_depth(1);
        let table = PlistTable::from_value(&doc(), &options).unwrap();
        assert_eq!(table.fields(), &["c"]);
        assert_eq!(table.height(), 1);
    }

    #[test]
    fn test_schema_sql_quotes_fields() {
        let mut root = PlistMap::new();
        root.insert("say \"hi\"", Value::integer(1));
        root.insert("plain", Value::integer(2));
        let table = PlistTable::from_value(&Value::map(root), &LoadOptions::new()).unwrap();
        assert_eq!(
            table.schema_sql(),
            r#"CREATE TABLE x("plain", "say ""hi""")"#
        );
    }

    #[test]
    fn test_schema_sql_without_fields() {
        let table = PlistTable::from_value(&Value::list(vec![]), &LoadOptions::new()).unwrap();
        assert_eq!(table.schema_sql(), "CREATE TABLE x()");
    }
}
