//! Row access and row-dictionary reshaping

use indexmap::IndexMap;

use super::Table;
use crate::error::{Error, Result};
use crate::groupby::classify::Classifier;
use crate::value::Value;

/// One row as an ordered `column -> value` mapping
pub type Row = IndexMap<String, Value>;

/// Borrowed view of a single row, handed to row predicates
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowView<'a> {
    pub(crate) fn new(table: &'a Table, index: usize) -> Self {
        RowView { table, index }
    }

    /// Row position
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of `column` in this row, `None` if there is no such column
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.table
            .columns
            .get(column)
            .and_then(|values| values.get(self.index))
    }

    /// Owned copy of the row
    pub fn to_row(&self) -> Row {
        self.table
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values[self.index].clone()))
            .collect()
    }
}

impl Table {
    pub(crate) fn check_row(&self, index: usize) -> Result<()> {
        let size = self.row_count();
        if index >= size {
            return Err(Error::IndexOutOfBounds { index, size });
        }
        Ok(())
    }

    /// Row at `index` as a column -> value mapping
    pub fn row(&self, index: usize) -> Result<Row> {
        self.check_row(index)?;
        Ok(RowView::new(self, index).to_row())
    }

    /// Row at `index` as values in column order
    pub fn row_values(&self, index: usize) -> Result<Vec<Value>> {
        self.check_row(index)?;
        Ok(self.columns.values().map(|values| values[index].clone()).collect())
    }

    /// Iterate `(position, row)` pairs
    pub fn iterrows(&self) -> impl Iterator<Item = (usize, Row)> + '_ {
        self.index().map(move |i| (i, RowView::new(self, i).to_row()))
    }

    /// Iterate rows as value vectors
    pub fn itertuples(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        self.index()
            .map(move |i| self.columns.values().map(|values| values[i].clone()).collect())
    }

    /// All rows as value vectors
    pub fn values(&self) -> Vec<Vec<Value>> {
        self.itertuples().collect()
    }

    /// Rows as mappings, the record orientation of the table
    pub fn to_row_dicts(&self) -> Vec<Row> {
        self.iterrows().map(|(_, row)| row).collect()
    }

    /// Count identical rows
    ///
    /// With `sort` the result is ordered by descending count, ties keeping
    /// first-seen order; otherwise rows appear in first-seen order.
    pub fn row_value_counts(&self, sort: bool) -> Vec<(Vec<Value>, usize)> {
        let mut classifier = Classifier::new();
        let mut counts: Vec<usize> = Vec::new();
        for row in self.itertuples() {
            let class = classifier.classify(&row);
            if class == counts.len() {
                counts.push(0);
            }
            counts[class] += 1;
        }
        let mut out: Vec<(Vec<Value>, usize)> = classifier.into_classes().into_iter().zip(counts).collect();
        if sort {
            out.sort_by(|a, b| b.1.cmp(&a.1));
        }
        out
    }

    /// Reshape row dictionaries into a table
    ///
    /// Columns follow first-seen key order across all rows; a row lacking a
    /// key gets `missing_value` in that column.
    pub fn from_row_dicts(rows: &[Row], missing_value: &Value) -> Table {
        let mut keys: Vec<&str> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !keys.contains(&key.as_str()) {
                    keys.push(key.as_str());
                }
            }
        }

        let columns = keys
            .into_iter()
            .map(|key| {
                let values = rows
                    .iter()
                    .map(|row| row.get(key).unwrap_or(missing_value).clone())
                    .collect();
                (key.to_string(), values)
            })
            .collect();
        Table { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn sample() -> Table {
        Table::from_columns(vec![("x", vec![1, 2, 3]), ("y", vec![6, 7, 8])]).unwrap()
    }

    #[test]
    fn test_row_access() {
        let table = sample();
        let row = table.row(1).unwrap();
        assert_eq!(row["x"], Value::Int(2));
        assert_eq!(row["y"], Value::Int(7));
        assert_eq!(table.row_values(0).unwrap(), values![1, 6]);
        assert!(matches!(
            table.row(3),
            Err(Error::IndexOutOfBounds { index: 3, size: 3 })
        ));
    }

    #[test]
    fn test_iteration() {
        let table = sample();
        let rows: Vec<(usize, Row)> = table.iterrows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].0, 2);
        assert_eq!(rows[2].1["y"], Value::Int(8));
        assert_eq!(table.values(), vec![values![1, 6], values![2, 7], values![3, 8]]);
    }

    #[test]
    fn test_row_value_counts() {
        let table = Table::from_columns(vec![("x", vec![1, 2, 3, 3]), ("y", vec![6, 7, 3, 3])]).unwrap();
        let counts = table.row_value_counts(true);
        assert_eq!(counts[0], (values![3, 3], 2));
        assert_eq!(counts[1], (values![1, 6], 1));
        assert_eq!(counts[2], (values![2, 7], 1));
    }

    #[test]
    fn test_from_row_dicts_fills_missing() {
        let mut a = Row::new();
        a.insert("x".into(), Value::Int(1));
        a.insert("y".into(), Value::Int(20));
        let mut b = Row::new();
        b.insert("x".into(), Value::Int(2));
        let mut c = Row::new();
        c.insert("z".into(), Value::Int(9));

        let table = Table::from_row_dicts(&[a, b, c], &Value::Str("NA".into()));
        assert_eq!(table.column_names(), vec!["x", "y", "z"]);
        assert_eq!(table.get_column("x").unwrap(), values![1, 2, "NA"].as_slice());
        assert_eq!(table.get_column("y").unwrap(), values![20, "NA", "NA"].as_slice());
        assert_eq!(table.get_column("z").unwrap(), values!["NA", "NA", 9].as_slice());
    }

    #[test]
    fn test_row_view() {
        let table = sample();
        let view = RowView::new(&table, 2);
        assert_eq!(view.get("x"), Some(&Value::Int(3)));
        assert_eq!(view.get("nope"), None);
        assert_eq!(view.to_row(), table.row(2).unwrap());
    }
}
