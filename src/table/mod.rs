//! Column-oriented in-memory table
//!
//! A [`Table`] maps column names to equally long sequences of [`Value`]s.
//! The submodules add row access, column utilities, editing and joins.

pub mod columns;
pub mod edit;
pub mod join;
pub mod rows;

use std::ops::Range;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::value::Value;

pub use columns::{uniques, value_counts};
pub use edit::{Change, ColumnValues};
pub use join::JoinType;
pub use rows::{Row, RowView};

/// Mapping from column name to column values, all columns the same length
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table {
    columns: IndexMap<String, Vec<Value>>,
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let columns = IndexMap::<String, Vec<Value>>::deserialize(deserializer)?;
        Table::from_map(columns).map_err(serde::de::Error::custom)
    }
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, values)` pairs
    ///
    /// Every column must have the same length and names must be unique.
    pub fn from_columns<I, S, V>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<V>)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let mut table = Table::new();
        for (name, values) in columns {
            let name = name.into();
            if table.contains_column(&name) {
                return Err(Error::DuplicateColumnName(name));
            }
            let values = values.into_iter().map(Into::into).collect();
            table.set_column(name, values)?;
        }
        Ok(table)
    }

    /// Wrap an already built column map after checking the length invariant
    pub fn from_map(columns: IndexMap<String, Vec<Value>>) -> Result<Self> {
        let mut lengths = columns.values().map(Vec::len);
        if let Some(expected) = lengths.next() {
            if let Some(found) = lengths.find(|&len| len != expected) {
                return Err(Error::InconsistentRowCount { expected, found });
            }
        }
        Ok(Table { columns })
    }

    /// Column values by name
    pub fn get_column(&self, name: &str) -> Result<&[Value]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Add a column, or replace the values of an existing one
    ///
    /// The first column of an empty table fixes the row count.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let name = name.into();
        let is_only_column = self.columns.len() == 1 && self.columns.contains_key(&name);
        if !self.columns.is_empty() && !is_only_column && values.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Remove a column and return its values
    pub fn remove_column(&mut self, name: &str) -> Result<Vec<Value>> {
        self.columns
            .shift_remove(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Number of rows; zero when the table has no columns
    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Vec::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in column order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn first_column_name(&self) -> Option<&str> {
        self.columns.keys().next().map(String::as_str)
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Total number of cells
    pub fn size(&self) -> usize {
        self.row_count() * self.column_count()
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// One cell by column name and row position
    pub fn value(&self, column: &str, index: usize) -> Result<&Value> {
        let values = self.get_column(column)?;
        values.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            size: values.len(),
        })
    }

    /// Row positions `0..row_count`
    pub fn index(&self) -> Range<usize> {
        0..self.row_count()
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Table {
        let end = n.min(self.row_count());
        self.slice_rows(0..end)
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Table {
        let rows = self.row_count();
        self.slice_rows(rows.saturating_sub(n)..rows)
    }

    fn slice_rows(&self, range: Range<usize>) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values[range.clone()].to_vec()))
            .collect();
        Table { columns }
    }

    /// Iterate `(name, values)` in column order
    pub fn itercolumns(&self) -> impl Iterator<Item = (&str, &[Value])> + '_ {
        self.columns
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Underlying column map
    pub fn columns(&self) -> &IndexMap<String, Vec<Value>> {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut IndexMap<String, Vec<Value>> {
        &mut self.columns
    }

    pub fn into_columns(self) -> IndexMap<String, Vec<Value>> {
        self.columns
    }

    /// Validate that every name is a column of this table
    pub(crate) fn require_columns<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        for name in names {
            if !self.contains_column(name.as_ref()) {
                return Err(Error::ColumnNotFound(name.as_ref().to_string()));
            }
        }
        Ok(())
    }
}
