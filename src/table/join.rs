//! Joining two tables on a key column

use super::Table;
use crate::error::Result;
use crate::groupby::classify::Classifier;
use crate::value::Value;

/// Join type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Only rows whose key appears on both sides
    Inner,
    /// Every left row, with its right matches if any
    Left,
    /// Every right row, with its left matches if any
    Right,
    /// Every row of both sides
    #[default]
    Full,
}

/// One output row: the key and the source row on each side
struct Match {
    value: Value,
    left: Option<usize>,
    right: Option<usize>,
}

/// Positions of every value of `values`, bucketed by equality
struct Lookup {
    classifier: Classifier,
    positions: Vec<Vec<usize>>,
}

impl Lookup {
    fn new(values: &[Value]) -> Self {
        let mut classifier = Classifier::new();
        let mut positions: Vec<Vec<usize>> = Vec::new();
        for (i, value) in values.iter().enumerate() {
            let class = classifier.classify(std::slice::from_ref(value));
            if class == positions.len() {
                positions.push(Vec::new());
            }
            positions[class].push(i);
        }
        Lookup {
            classifier,
            positions,
        }
    }

    fn locate(&self, value: &Value) -> &[usize] {
        self.classifier
            .find(std::slice::from_ref(value))
            .map_or(&[][..], |class| self.positions[class].as_slice())
    }
}

fn matching_rows(left: &[Value], right: &[Value], how: JoinType) -> Vec<Match> {
    let mut out = Vec::new();
    if how == JoinType::Right {
        let lookup = Lookup::new(left);
        for (r, value) in right.iter().enumerate() {
            let found = lookup.locate(value);
            if found.is_empty() {
                out.push(Match {
                    value: value.clone(),
                    left: None,
                    right: Some(r),
                });
            }
            for &l in found {
                out.push(Match {
                    value: value.clone(),
                    left: Some(l),
                    right: Some(r),
                });
            }
        }
        return out;
    }

    let lookup = Lookup::new(right);
    let mut right_matched = vec![false; right.len()];
    for (l, value) in left.iter().enumerate() {
        let found = lookup.locate(value);
        if found.is_empty() && how != JoinType::Inner {
            out.push(Match {
                value: value.clone(),
                left: Some(l),
                right: None,
            });
        }
        for &r in found {
            right_matched[r] = true;
            out.push(Match {
                value: value.clone(),
                left: Some(l),
                right: Some(r),
            });
        }
    }
    if how == JoinType::Full {
        for (r, value) in right.iter().enumerate() {
            if !right_matched[r] {
                out.push(Match {
                    value: value.clone(),
                    left: None,
                    right: Some(r),
                });
            }
        }
    }
    out
}

fn pick(values: &[Value], rows: impl Iterator<Item = Option<usize>>) -> Vec<Value> {
    rows.map(|row| row.map_or(Value::Null, |i| values[i].clone()))
        .collect()
}

impl Table {
    /// Join `other` onto this table
    ///
    /// Rows pair up where `left_on` in this table equals `right_on` (default
    /// `left_on`) in `other`. The result has this table's columns followed by
    /// the other table's non-key columns; cells without a matching row are
    /// [`Value::Null`] and both key columns carry the matched key. `select`
    /// picks and orders the output columns.
    pub fn join(
        &self,
        other: &Table,
        left_on: &str,
        right_on: Option<&str>,
        how: JoinType,
        select: Option<&[&str]>,
    ) -> Result<Table> {
        let right_on = right_on.unwrap_or(left_on);
        let left_keys = self.get_column(left_on)?;
        let right_keys = other.get_column(right_on)?;

        let matches = matching_rows(left_keys, right_keys, how);
        log::debug!(
            "{:?} join on {}={}: {} rows",
            how,
            left_on,
            right_on,
            matches.len()
        );

        let mut out = Table::new();
        for (name, values) in self.itercolumns() {
            let column = pick(values, matches.iter().map(|m| m.left));
            out.columns_mut().insert(name.to_string(), column);
        }
        for (name, values) in other.itercolumns() {
            if name == left_on || name == right_on {
                continue;
            }
            let column = pick(values, matches.iter().map(|m| m.right));
            out.columns_mut().insert(name.to_string(), column);
        }
        let keys: Vec<Value> = matches.into_iter().map(|m| m.value).collect();
        out.columns_mut().insert(right_on.to_string(), keys.clone());
        out.columns_mut().insert(left_on.to_string(), keys);

        match select {
            Some(columns) => {
                out.require_columns(columns)?;
                let mut all = out.into_columns();
                let mut selected = Table::new();
                for &name in columns {
                    if let Some(values) = all.shift_remove(name) {
                        selected.columns_mut().insert(name.to_string(), values);
                    }
                }
                Ok(selected)
            }
            None => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::values;

    fn left() -> Table {
        Table::from_columns(vec![
            ("id", values!["a", "b", "c", "d"]),
            ("x", values![1, 2, 3, 4]),
        ])
        .unwrap()
    }

    fn right() -> Table {
        Table::from_columns(vec![
            ("id", values!["a", "a", "b", "e"]),
            ("y", values![10, 11, 20, 50]),
        ])
        .unwrap()
    }

    #[test]
    fn test_inner_join() {
        let joined = left().join(&right(), "id", None, JoinType::Inner, None).unwrap();
        assert_eq!(joined.column_names(), vec!["id", "x", "y"]);
        assert_eq!(joined.get_column("id").unwrap(), values!["a", "a", "b"].as_slice());
        assert_eq!(joined.get_column("x").unwrap(), values![1, 1, 2].as_slice());
        assert_eq!(joined.get_column("y").unwrap(), values![10, 11, 20].as_slice());
    }

    #[test]
    fn test_left_join_fills_null() {
        let joined = left().join(&right(), "id", None, JoinType::Left, None).unwrap();
        assert_eq!(joined.row_count(), 5);
        assert_eq!(
            joined.get_column("y").unwrap(),
            values![10, 11, 20, Value::Null, Value::Null].as_slice()
        );
    }

    #[test]
    fn test_right_join_iterates_right_rows() {
        let joined = left().join(&right(), "id", None, JoinType::Right, None).unwrap();
        assert_eq!(joined.get_column("id").unwrap(), values!["a", "a", "b", "e"].as_slice());
        assert_eq!(joined.get_column("x").unwrap(), values![1, 1, 2, Value::Null].as_slice());
    }

    #[test]
    fn test_full_join_appends_unmatched_right() {
        let joined = left().join(&right(), "id", None, JoinType::Full, None).unwrap();
        assert_eq!(
            joined.get_column("id").unwrap(),
            values!["a", "a", "b", "c", "d", "e"].as_slice()
        );
        assert_eq!(
            joined.get_column("x").unwrap(),
            values![1, 1, 2, 3, 4, Value::Null].as_slice()
        );
        assert_eq!(
            joined.get_column("y").unwrap(),
            values![10, 11, 20, Value::Null, Value::Null, 50].as_slice()
        );
    }

    #[test]
    fn test_different_key_names_and_select() {
        let other = Table::from_columns(vec![("key", values!["b", "c"]), ("z", values![7, 8])]).unwrap();
        let joined = left()
            .join(&other, "id", Some("key"), JoinType::Inner, None)
            .unwrap();
        assert_eq!(joined.column_names(), vec!["id", "x", "z", "key"]);
        assert_eq!(joined.get_column("key").unwrap(), values!["b", "c"].as_slice());

        let selected = left()
            .join(&other, "id", Some("key"), JoinType::Inner, Some(&["z", "id"]))
            .unwrap();
        assert_eq!(selected.column_names(), vec!["z", "id"]);

        assert!(matches!(
            left().join(&other, "id", Some("nope"), JoinType::Inner, None),
            Err(Error::ColumnNotFound(_))
        ));
        assert!(matches!(
            left().join(&other, "id", Some("key"), JoinType::Inner, Some(&["q"])),
            Err(Error::ColumnNotFound(_))
        ));
    }
}
