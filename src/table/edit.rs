//! Table edits
//!
//! Every edit is a [`Change`] value. [`Table::apply_change`] performs it in
//! place and [`Table::with_change`] returns an edited copy, leaving the
//! source alone. A change is validated completely before the table is
//! touched, so a failed `apply_change` leaves the table as it was.

use super::{Row, Table};
use crate::error::{Error, Result};
use crate::na::{DropOptions, FillOptions};
use crate::value::{ArithOp, Value};

/// New values for a column: one per row, or a scalar repeated for every row
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Many(Vec<Value>),
    One(Value),
}

impl ColumnValues {
    fn expand(&self, rows: usize) -> Result<Vec<Value>> {
        match self {
            ColumnValues::Many(values) if values.len() == rows => Ok(values.clone()),
            ColumnValues::Many(values) => Err(Error::LengthMismatch {
                expected: rows,
                actual: values.len(),
            }),
            ColumnValues::One(value) => Ok(vec![value.clone(); rows]),
        }
    }
}

impl From<Vec<Value>> for ColumnValues {
    fn from(values: Vec<Value>) -> Self {
        ColumnValues::Many(values)
    }
}

impl From<Value> for ColumnValues {
    fn from(value: Value) -> Self {
        ColumnValues::One(value)
    }
}

/// One edit of a table
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Replace one cell
    Value {
        column: String,
        index: usize,
        value: Value,
    },
    /// Replace the named cells of one row
    RowItems { index: usize, items: Row },
    /// Replace a whole row, values in column order
    RowValues { index: usize, values: Vec<Value> },
    /// Replace a column, or add it when absent
    Column { name: String, values: ColumnValues },
    /// Combine a column element-wise with a scalar or an equally long sequence
    ColumnOp {
        column: String,
        op: ArithOp,
        operand: ColumnValues,
    },
    DropRow(usize),
    DropColumn(String),
    /// New names for all columns, in column order
    RenameColumns(Vec<String>),
    FillNa(FillOptions),
    DropNa(DropOptions),
}

impl Change {
    pub fn value(column: impl Into<String>, index: usize, value: impl Into<Value>) -> Self {
        Change::Value {
            column: column.into(),
            index,
            value: value.into(),
        }
    }

    pub fn column(name: impl Into<String>, values: impl Into<ColumnValues>) -> Self {
        Change::Column {
            name: name.into(),
            values: values.into(),
        }
    }

    pub fn add(column: impl Into<String>, operand: impl Into<ColumnValues>) -> Self {
        Self::column_op(column, ArithOp::Add, operand)
    }

    pub fn subtract(column: impl Into<String>, operand: impl Into<ColumnValues>) -> Self {
        Self::column_op(column, ArithOp::Sub, operand)
    }

    pub fn multiply(column: impl Into<String>, operand: impl Into<ColumnValues>) -> Self {
        Self::column_op(column, ArithOp::Mul, operand)
    }

    pub fn divide(column: impl Into<String>, operand: impl Into<ColumnValues>) -> Self {
        Self::column_op(column, ArithOp::Div, operand)
    }

    fn column_op(column: impl Into<String>, op: ArithOp, operand: impl Into<ColumnValues>) -> Self {
        Change::ColumnOp {
            column: column.into(),
            op,
            operand: operand.into(),
        }
    }
}

impl Table {
    /// Perform `change` on this table
    pub fn apply_change(&mut self, change: &Change) -> Result<()> {
        match change {
            Change::Value {
                column,
                index,
                value,
            } => {
                self.value(column, *index)?;
                if let Some(cell) = self
                    .columns_mut()
                    .get_mut(column.as_str())
                    .and_then(|values| values.get_mut(*index))
                {
                    *cell = value.clone();
                }
            }
            Change::RowItems { index, items } => {
                self.check_row(*index)?;
                let names: Vec<&str> = items.keys().map(String::as_str).collect();
                self.require_columns(&names)?;
                for (name, value) in items {
                    if let Some(values) = self.columns_mut().get_mut(name.as_str()) {
                        values[*index] = value.clone();
                    }
                }
            }
            Change::RowValues { index, values } => {
                self.check_row(*index)?;
                if values.len() != self.column_count() {
                    return Err(Error::LengthMismatch {
                        expected: self.column_count(),
                        actual: values.len(),
                    });
                }
                for (column, value) in self.columns_mut().values_mut().zip(values) {
                    column[*index] = value.clone();
                }
            }
            Change::Column { name, values } => {
                let values = match values {
                    ColumnValues::Many(values) => values.clone(),
                    ColumnValues::One(_) => values.expand(self.row_count())?,
                };
                self.set_column(name.clone(), values)?;
            }
            Change::ColumnOp {
                column,
                op,
                operand,
            } => {
                let current = self.get_column(column)?;
                let operands = operand.expand(current.len())?;
                let updated = current
                    .iter()
                    .zip(&operands)
                    .enumerate()
                    .map(|(i, (lhs, rhs))| {
                        lhs.arith(rhs, *op)
                            .map_err(|e| e.context(format_args!("column '{}' row {}", column, i)))
                    })
                    .collect::<Result<Vec<Value>>>()?;
                self.set_column(column.clone(), updated)?;
            }
            Change::DropRow(index) => {
                self.check_row(*index)?;
                for values in self.columns_mut().values_mut() {
                    values.remove(*index);
                }
            }
            Change::DropColumn(name) => {
                self.remove_column(name)?;
            }
            Change::RenameColumns(names) => {
                if names.len() != self.column_count() {
                    return Err(Error::LengthMismatch {
                        expected: self.column_count(),
                        actual: names.len(),
                    });
                }
                for (i, name) in names.iter().enumerate() {
                    if names[..i].contains(name) {
                        return Err(Error::DuplicateColumnName(name.clone()));
                    }
                }
                let columns = std::mem::take(self.columns_mut());
                *self.columns_mut() = names
                    .iter()
                    .cloned()
                    .zip(columns.into_values())
                    .collect();
            }
            Change::FillNa(options) => self.fillna_in_place(options)?,
            Change::DropNa(options) => self.dropna_in_place(options)?,
        }
        Ok(())
    }

    /// Copy of this table with `change` performed
    pub fn with_change(&self, change: &Change) -> Result<Table> {
        let mut table = self.clone();
        table.apply_change(change)?;
        Ok(table)
    }
}
