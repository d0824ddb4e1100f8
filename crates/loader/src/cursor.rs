//! Row cursor over a [`PlistTable`].

use crate::plist_table::PlistTable;
use plistab_core::Value;

/// A forward cursor over the rows of a table, in the rewind/advance/eof shape
/// of a virtual table scan.
#[derive(Clone, Copy, Debug)]
pub struct TableCursor<'a> {
    table: &'a PlistTable,
    row: usize,
}

impl<'a> TableCursor<'a> {
    /// Creates a cursor at the first row.
    pub fn new(table: &'a PlistTable) -> Self {
        Self { table, row: 0 }
    }

    /// Moves back to the first row.
    pub fn rewind(&mut self) {
        self.row = 0;
    }

    /// Advances to the next row.
    pub fn advance(&mut self) {
        if !self.eof() {
            self.row += 1;
        }
    }

    /// Returns true once every row has been visited.
    pub fn eof(&self) -> bool {
        self.row >= self.table.height()
    }

    /// Returns the current row number.
    pub fn row_id(&self) -> usize {
        self.row
    }

    /// Returns the cell of the current row at field position `column`.
    pub fn column(&self, column: usize) -> &'a Value {
        self.table.cell(self.row, column)
    }

    /// Iterates over every row, each as its cells in field order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&'a Value>> + 'a {
        let table = self.table;
        let width = table.fields().len();
        (0..table.height()).map(move |row| (0..width).map(|column| table.cell(row, column)).collect())
    }
}
