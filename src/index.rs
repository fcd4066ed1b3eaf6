//! Row selection
//!
//! Predicates and masks are turned into ordered row positions, and row
//! positions into new tables. Grouping works the same on a filtered table as
//! on any other, since filtering always yields a plain [`Table`].

use crate::error::{Error, Result};
use crate::table::{RowView, Table};
use crate::value::Value;

/// Evaluate `predicate` on every value of a column
pub fn column_filter<F>(values: &[Value], predicate: F) -> Vec<bool>
where
    F: Fn(&Value) -> bool,
{
    values.iter().map(predicate).collect()
}

/// Positions of the `true` entries of a mask
pub fn indexes_from_mask(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &keep)| keep.then_some(i))
        .collect()
}

/// Positions of the rows satisfying `predicate`, ascending
pub fn indexes_from_filter<F>(table: &Table, predicate: F) -> Vec<usize>
where
    F: Fn(RowView<'_>) -> bool,
{
    table
        .index()
        .filter(|&i| predicate(RowView::new(table, i)))
        .collect()
}

/// Items of `values` at `indexes`, in `indexes` order
pub fn filter_list_by_indexes<T: Clone>(values: &[T], indexes: &[usize]) -> Result<Vec<T>> {
    indexes
        .iter()
        .map(|&i| {
            values.get(i).cloned().ok_or(Error::IndexOutOfBounds {
                index: i,
                size: values.len(),
            })
        })
        .collect()
}

/// Condition on the values of one column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Ge(Value),
    Lt(Value),
    Le(Value),
    /// Inclusive on both ends
    Between(Value, Value),
    IsIn(Vec<Value>),
}

impl ColumnFilter {
    /// Whether `value` passes; ordering filters reject unorderable pairs
    pub fn matches(&self, value: &Value) -> Result<bool> {
        use std::cmp::Ordering::*;

        let compare = |bound: &Value| {
            value.partial_cmp(bound).ok_or_else(|| {
                Error::TypeMismatch(format!(
                    "cannot compare {} with {}",
                    value.type_name(),
                    bound.type_name()
                ))
            })
        };

        Ok(match self {
            ColumnFilter::Eq(v) => value == v,
            ColumnFilter::Ne(v) => value != v,
            ColumnFilter::Gt(v) => compare(v)? == Greater,
            ColumnFilter::Ge(v) => compare(v)? != Less,
            ColumnFilter::Lt(v) => compare(v)? == Less,
            ColumnFilter::Le(v) => compare(v)? != Greater,
            ColumnFilter::Between(lo, hi) => compare(lo)? != Less && compare(hi)? != Greater,
            ColumnFilter::IsIn(values) => values.contains(value),
        })
    }
}

impl Table {
    /// Rows at `indexes`, in that order
    pub fn take(&self, indexes: &[usize]) -> Result<Table> {
        let mut out = Table::new();
        for (name, values) in self.itercolumns() {
            out.columns_mut()
                .insert(name.to_string(), filter_list_by_indexes(values, indexes)?);
        }
        Ok(out)
    }

    /// Rows for which `predicate` holds
    pub fn filter_rows<F>(&self, predicate: F) -> Result<Table>
    where
        F: Fn(RowView<'_>) -> bool,
    {
        self.take(&indexes_from_filter(self, predicate))
    }

    /// Rows whose mask entry is `true`; the mask must cover every row
    pub fn filter_by_mask(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.row_count() {
            return Err(Error::LengthMismatch {
                expected: self.row_count(),
                actual: mask.len(),
            });
        }
        self.take(&indexes_from_mask(mask))
    }

    /// Rows whose `column` value passes `filter`
    pub fn filter_column(&self, column: &str, filter: &ColumnFilter) -> Result<Table> {
        let mask = self
            .get_column(column)?
            .iter()
            .map(|value| filter.matches(value))
            .collect::<Result<Vec<bool>>>()?;
        self.take(&indexes_from_mask(&mask))
    }
}
