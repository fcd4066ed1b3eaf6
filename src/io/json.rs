use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use crate::value::Value;

/// JSON layout of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonOrient {
    /// `[{"col1": v, "col2": v}, ...]`
    Records,
    /// `{"col1": [v, ...], "col2": [...]}`
    #[default]
    Columns,
}

/// Encode a table column-wise, keeping column and row order
pub fn to_json(table: &Table) -> Result<String> {
    Ok(serde_json::to_string(table)?)
}

/// Encode a table as one object per row
pub fn to_json_records(table: &Table) -> Result<String> {
    Ok(serde_json::to_string(&table.to_row_dicts())?)
}

/// Decode a table from either orientation
///
/// An object must map names to equally long arrays. An array must hold
/// objects; keys absent from a record become [`Value::Null`].
pub fn from_json(s: &str) -> Result<Table> {
    from_value(serde_json::from_str(s)?)
}

fn from_value(value: Value) -> Result<Table> {
    match value {
        Value::Map(map) => read_column_oriented(map.into_iter()),
        Value::List(records) => read_records_array(records),
        other => Err(Error::InvalidInput(format!(
            "JSON table must be an object or an array, found {}",
            other.type_name()
        ))),
    }
}

// {"col": [values]}
fn read_column_oriented(entries: impl Iterator<Item = (String, Value)>) -> Result<Table> {
    let mut columns = indexmap::IndexMap::new();
    for (name, value) in entries {
        match value {
            Value::List(values) => {
                columns.insert(name, values);
            }
            other => {
                return Err(Error::InvalidInput(format!(
                    "column '{}' must be an array, found {}",
                    name,
                    other.type_name()
                )))
            }
        }
    }
    Table::from_map(columns)
}

// [{"col": value}, ...]
fn read_records_array(records: Vec<Value>) -> Result<Table> {
    let rows = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| match record {
            Value::Map(row) => Ok(row),
            other => Err(Error::InvalidInput(format!(
                "record {} must be an object, found {}",
                i,
                other.type_name()
            ))),
        })
        .collect::<Result<Vec<Row>>>()?;
    Ok(Table::from_row_dicts(&rows, &Value::Null))
}

/// Read a table from a JSON file in either orientation
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let value: Value = serde_json::from_reader(reader)?;
    let table = from_value(value)?;
    log::debug!(
        "read {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

/// Write a table to a JSON file
pub fn write_json<P: AsRef<Path>>(table: &Table, path: P, orient: JsonOrient) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);

    match orient {
        JsonOrient::Records => serde_json::to_writer_pretty(writer, &table.to_row_dicts())?,
        JsonOrient::Columns => serde_json::to_writer_pretty(writer, table)?,
    }
    log::debug!("wrote {:?} JSON to {}", orient, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn sample() -> Table {
        Table::from_columns(vec![("x", vec![1, 2, 3]), ("y", vec![6, 7, 8])]).unwrap()
    }

    #[test]
    fn test_column_orient() {
        let json = to_json(&sample()).unwrap();
        assert_eq!(json, r#"{"x":[1,2,3],"y":[6,7,8]}"#);
        assert_eq!(from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_record_orient() {
        let json = to_json_records(&sample()).unwrap();
        assert_eq!(json, r#"[{"x":1,"y":6},{"x":2,"y":7},{"x":3,"y":8}]"#);
        assert_eq!(from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_column_order_is_kept() {
        let table = from_json(r#"{"b":[1],"a":[2]}"#).unwrap();
        assert_eq!(table.column_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_records_with_missing_keys() {
        let table = from_json(r#"[{"x":1,"y":2},{"x":3}]"#).unwrap();
        assert_eq!(table.get_column("y").unwrap(), values![2, Value::Null].as_slice());
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(from_json("5"), Err(Error::InvalidInput(_))));
        assert!(matches!(from_json(r#"{"x":1}"#), Err(Error::InvalidInput(_))));
        assert!(matches!(from_json("[1]"), Err(Error::InvalidInput(_))));
        assert!(matches!(
            from_json(r#"{"x":[1,2],"y":[1]}"#),
            Err(Error::InconsistentRowCount { .. })
        ));
        assert!(matches!(from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_nested_and_mixed_values() {
        let json = r#"{"a":[1,2.5,"s",true,null,[1,2],{"k":"v"}]}"#;
        let table = from_json(json).unwrap();
        let column = table.get_column("a").unwrap();
        assert_eq!(column[0], Value::Int(1));
        assert_eq!(column[1], Value::Float(2.5));
        assert_eq!(column[4], Value::Null);
        assert!(matches!(column[5], Value::List(_)));
        assert!(matches!(column[6], Value::Map(_)));
        assert_eq!(to_json(&table).unwrap(), json);
    }
}
