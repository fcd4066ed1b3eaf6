//! Column utilities: distinct values and frequency counts

use indexmap::IndexMap;

use super::Table;
use crate::error::Result;
use crate::groupby::classify::Classifier;
use crate::value::Value;

fn classify_all<'a, I>(values: I) -> (Classifier, Vec<usize>)
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut classifier = Classifier::new();
    let mut counts = Vec::new();
    for value in values {
        let class = classifier.classify(std::slice::from_ref(value));
        if class == counts.len() {
            counts.push(0);
        }
        counts[class] += 1;
    }
    (classifier, counts)
}

/// Distinct values in order of first appearance
///
/// Lists and maps are deduplicated by equality, so they are accepted too.
pub fn uniques(values: &[Value]) -> Vec<Value> {
    let (classifier, _) = classify_all(values);
    classifier
        .into_classes()
        .into_iter()
        .filter_map(|mut key| key.pop())
        .collect()
}

/// Count each distinct value
///
/// With `sort` the most frequent value comes first and ties keep order of
/// first appearance.
pub fn value_counts(values: &[Value], sort: bool) -> Vec<(Value, usize)> {
    let (classifier, counts) = classify_all(values);
    let mut out: Vec<(Value, usize)> = classifier
        .into_classes()
        .into_iter()
        .filter_map(|mut key| key.pop())
        .zip(counts)
        .collect();
    if sort {
        out.sort_by(|a, b| b.1.cmp(&a.1));
    }
    out
}

impl Table {
    /// Number of distinct values in every column
    pub fn nunique(&self) -> IndexMap<String, usize> {
        self.itercolumns()
            .map(|(name, values)| (name.to_string(), classify_all(values).0.len()))
            .collect()
    }

    /// Distinct values of one column
    pub fn uniques(&self, column: &str) -> Result<Vec<Value>> {
        Ok(uniques(self.get_column(column)?))
    }

    /// Frequency counts of one column
    pub fn value_counts(&self, column: &str, sort: bool) -> Result<Vec<(Value, usize)>> {
        Ok(value_counts(self.get_column(column)?, sort))
    }

    /// Row tuples restricted to `columns`, in the given column order
    pub fn row_value_tuples<S: AsRef<str>>(&self, columns: &[S]) -> Result<Vec<Vec<Value>>> {
        let selected = columns
            .iter()
            .map(|name| self.get_column(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .index()
            .map(|i| selected.iter().map(|values| values[i].clone()).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::values;

    #[test]
    fn test_uniques_first_seen() {
        let values = values![1, 1, 2, 4, 5, 2, 0, 6, 1];
        assert_eq!(uniques(&values), values![1, 2, 4, 5, 0, 6]);

        let nested = values![Value::List(values![1]), Value::List(values![1]), 1];
        assert_eq!(uniques(&nested).len(), 2);
    }

    #[test]
    fn test_value_counts() {
        let values = values![4, 1, 1, 4, 5, 1];
        assert_eq!(
            value_counts(&values, true),
            vec![(Value::Int(1), 3), (Value::Int(4), 2), (Value::Int(5), 1)]
        );
        assert_eq!(
            value_counts(&values, false),
            vec![(Value::Int(4), 2), (Value::Int(1), 3), (Value::Int(5), 1)]
        );
    }

    #[test]
    fn test_table_level_helpers() {
        let table = Table::from_columns(vec![
            ("x", values![1, 2, 2, 3]),
            ("y", values!["a", "a", "a", "a"]),
            ("z", values![9, 10, 11, 12]),
        ])
        .unwrap();

        let counts = table.nunique();
        assert_eq!(counts["x"], 3);
        assert_eq!(counts["y"], 1);
        assert_eq!(counts["z"], 4);

        let tuples = table.row_value_tuples(&["x", "z"]).unwrap();
        assert_eq!(tuples[0], values![1, 9]);
        assert_eq!(tuples[3], values![3, 12]);
        assert!(matches!(
            table.row_value_tuples(&["q"]),
            Err(Error::ColumnNotFound(_))
        ));

        assert_eq!(table.uniques("x").unwrap(), values![1, 2, 3]);
        assert_eq!(table.value_counts("x", true).unwrap()[0], (Value::Int(2), 2));
    }
}
