//! Column-oriented table with row union and cross product.
//!
//! A `Table<T>` maps field names to equal-length columns. Tables are composed
//! with two operators:
//!
//! - [`Table::union_rows`] stacks tables vertically, padding fields missing on
//!   either side with `T::default()`.
//! - [`Table::cross_product`] pairs every row of one table with every row of
//!   the other.
//!
//! ```text
//!   union_rows                          cross_product
//!
//!   a  b       aa        a  b  aa       a  b       aa       a  b  aa
//!   1  2   ∪   11   =    1  2  -        1  2   ×   11   =   1  2  11
//!   3  4       12        3  4  -        3  4       12       3  4  11
//!                        -  -  11                           1  2  12
//!                        -  -  12                           3  4  12
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::iter;
use hashbrown::HashMap;
use plistab_core::{Error, Result};

/// A set of named, equal-length columns.
#[derive(Clone, Debug)]
pub struct Table<T> {
    /// Column values by field name.
    columns: HashMap<String, Vec<T>>,
    /// Field names in first-seen order.
    fields: Vec<String>,
    /// Number of rows; every column holds exactly this many values.
    height: usize,
}

impl<T: Clone + Default> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default> Table<T> {
    /// Creates an empty table: no fields, zero rows.
    pub fn new() -> Self {
        Self {
            columns: HashMap::new(),
            fields: Vec::new(),
            height: 0,
        }
    }

    /// Creates a one-row, one-column table.
    pub fn single(field: impl Into<String>, value: T) -> Self {
        let field = field.into();
        let mut columns = HashMap::with_capacity(1);
        columns.insert(field.clone(), alloc::vec![value]);
        Self {
            columns,
            fields: alloc::vec![field],
            height: 1,
        }
    }

    /// Creates a table from `(field, column)` pairs, keeping their order.
    ///
    /// A repeated field name replaces the earlier column. All columns must have
    /// the same length.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<T>)>,
        S: Into<String>,
    {
        let mut table = Self::new();
        let mut height = None;
        for (field, column) in columns {
            let field = field.into();
            let expected = *height.get_or_insert(column.len());
            if column.len() != expected {
                return Err(Error::ragged_columns(field, expected, column.len()));
            }
            if table.columns.insert(field.clone(), column).is_none() {
                table.fields.push(field);
            }
        }
        table.height = height.unwrap_or(0);
        Ok(table)
    }

    /// Returns the number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of fields.
    #[inline]
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the table has no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// Returns the field names in first-seen order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Returns the column for `field`, or an empty slice if there is none.
    pub fn column(&self, field: &str) -> &[T] {
        self.columns.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the value at `row` of the field at position `field_index`.
    pub fn cell(&self, row: usize, field_index: usize) -> Option<&T> {
        let field = self.fields.get(field_index)?;
        self.column(field).get(row)
    }

    /// Returns the values of one row, in field order.
    pub fn row(&self, row: usize) -> Option<Vec<&T>> {
        if row >= self.height {
            return None;
        }
        Some(
            self.fields
                .iter()
                .filter_map(|field| self.column(field).get(row))
                .collect(),
        )
    }

    /// Consumes the table, returning `(field, column)` pairs in field order.
    pub fn into_columns(mut self) -> Vec<(String, Vec<T>)> {
        let mut out = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let column = self.columns.remove(&field).unwrap_or_default();
            out.push((field, column));
        }
        out
    }

    /// Appends the rows of `other` below the rows of this table.
    ///
    /// Fields only present on one side are padded with `T::default()` for the
    /// rows contributed by the other side. Fields new in `other` are appended
    /// after this table's fields, in `other`'s order.
    pub fn union_rows(&mut self, other: Table<T>) {
        let Table {
            mut columns,
            fields,
            height: other_height,
        } = other;
        let height = self.height + other_height;

        for field in fields {
            let values = columns.remove(&field).unwrap_or_default();
            match self.columns.get_mut(&field) {
                Some(column) => column.extend(values),
                None => {
                    let mut column = Vec::with_capacity(height);
                    column.resize(self.height, T::default());
                    column.extend(values);
                    self.columns.insert(field.clone(), column);
                    self.fields.push(field);
                }
            }
        }

        // Fields absent from `other` still hold only this table's rows.
        for column in self.columns.values_mut() {
            column.resize(height, T::default());
        }
        self.height = height;
    }

    /// Pairs every row of this table with every row of `other`.
    ///
    /// The result has `height * other.height` rows: this table's columns are
    /// repeated block-wise once per row of `other`, and each value of `other`
    /// is repeated `height` times in a contiguous run. An empty `other` leaves
    /// this table unchanged; an empty `self` becomes `other`.
    ///
    /// The two field sets are expected to be disjoint. When a field of `other`
    /// already exists here, the existing column is kept and `other`'s is dropped.
    ///
    /// Returns [`Error::RowOverflow`] without modifying the table if the
    /// resulting row count does not fit in `usize`.
    pub fn cross_product(&mut self, other: Table<T>) -> Result<()> {
        if other.height == 0 {
            return Ok(());
        }
        if self.height == 0 {
            *self = other;
            return Ok(());
        }

        let block = self.height;
        let height = block
            .checked_mul(other.height)
            .ok_or_else(|| Error::row_overflow(block, other.height))?;

        for column in self.columns.values_mut() {
            column.reserve(height - block);
            for _ in 1..other.height {
                column.extend_from_within(..block);
            }
        }

        let Table {
            mut columns,
            fields,
            ..
        } = other;
        for field in fields {
            if self.columns.contains_key(&field) {
                continue;
            }
            let values = columns.remove(&field).unwrap_or_default();
            let mut column = Vec::with_capacity(height);
            for value in values {
                column.extend(iter::repeat(value).take(block));
            }
            self.columns.insert(field.clone(), column);
            self.fields.push(field);
        }

        self.height = height;
        Ok(())
    }
}
