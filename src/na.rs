//! Missing-value detection, filling and dropping
//!
//! There is no built-in missing sentinel: every operation compares cells
//! against an explicit `na_value` (usually [`Value::Null`]).

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use crate::value::Value;

/// Direction an NA operation walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Row by row
    Rows,
    /// Column by column
    Columns,
}

/// Replacement for missing cells
#[derive(Debug, Clone, PartialEq)]
pub enum FillValue {
    /// Same value everywhere
    Scalar(Value),
    /// Value per column name; columns it does not name are left alone
    PerColumn(IndexMap<String, Value>),
}

impl FillValue {
    fn for_column(&self, column: &str) -> Option<&Value> {
        match self {
            FillValue::Scalar(value) => Some(value),
            FillValue::PerColumn(values) => values.get(column),
        }
    }
}

/// How missing cells get their replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMethod {
    /// Use the explicit fill value
    #[default]
    Value,
    /// Copy the previous non-missing cell (pad / ffill)
    Forward,
    /// Copy the next non-missing cell (backfill / bfill)
    Backward,
}

/// Options for [`Table::fillna`]
#[derive(Debug, Clone, PartialEq)]
pub struct FillOptions {
    /// Required by [`FillMethod::Value`], rejected by the other methods
    pub value: Option<FillValue>,
    pub method: FillMethod,
    /// `Columns` fills down each column, `Rows` across each row
    pub axis: Axis,
    /// Maximum number of cells filled per column (or per row)
    pub limit: Option<usize>,
    pub na_value: Value,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            value: None,
            method: FillMethod::Value,
            axis: Axis::Columns,
            limit: None,
            na_value: Value::Null,
        }
    }
}

impl FillOptions {
    /// Fill with one value everywhere
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(FillValue::Scalar(value.into())),
            ..Self::default()
        }
    }

    /// Fill each named column with its own value
    pub fn per_column(values: IndexMap<String, Value>) -> Self {
        Self {
            value: Some(FillValue::PerColumn(values)),
            ..Self::default()
        }
    }

    pub fn forward() -> Self {
        Self {
            method: FillMethod::Forward,
            ..Self::default()
        }
    }

    pub fn backward() -> Self {
        Self {
            method: FillMethod::Backward,
            ..Self::default()
        }
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_na_value(mut self, na_value: impl Into<Value>) -> Self {
        self.na_value = na_value.into();
        self
    }

    fn validate(&self) -> Result<()> {
        match (self.method, &self.value) {
            (FillMethod::Value, None) => Err(Error::InvalidInput(
                "fill by value requires a fill value".into(),
            )),
            (FillMethod::Forward | FillMethod::Backward, Some(_)) => Err(Error::InvalidInput(
                "cannot specify both a fill value and a fill method".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Which missing cells make a row or column droppable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum How {
    /// Any missing cell
    #[default]
    Any,
    /// Only when every cell is missing
    All,
}

/// Options for [`Table::dropna`]
#[derive(Debug, Clone, PartialEq)]
pub struct DropOptions {
    /// `Rows` drops rows, `Columns` drops columns
    pub axis: Axis,
    pub how: How,
    /// Keep when at least this many cells are present; overrides `how`
    pub thresh: Option<usize>,
    /// Columns checked (rows axis) or eligible for dropping (columns axis)
    pub subset: Option<Vec<String>>,
    pub na_value: Value,
}

impl Default for DropOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Rows,
            how: How::Any,
            thresh: None,
            subset: None,
            na_value: Value::Null,
        }
    }
}

impl DropOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_how(mut self, how: How) -> Self {
        self.how = how;
        self
    }

    pub fn with_thresh(mut self, thresh: usize) -> Self {
        self.thresh = Some(thresh);
        self
    }

    pub fn with_subset<I, S>(mut self, subset: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subset = Some(subset.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_na_value(mut self, na_value: impl Into<Value>) -> Self {
        self.na_value = na_value.into();
        self
    }

    /// Whether a line with these cells should go
    fn drops<'a, I: IntoIterator<Item = &'a Value>>(&self, cells: I) -> bool {
        let (mut present, mut missing) = (0usize, 0usize);
        for cell in cells {
            if *cell == self.na_value {
                missing += 1;
            } else {
                present += 1;
            }
        }
        match (self.thresh, self.how) {
            (Some(thresh), _) => present < thresh,
            (None, How::Any) => missing > 0,
            (None, How::All) => present == 0,
        }
    }

    fn in_subset(&self, column: &str) -> bool {
        self.subset
            .as_ref()
            .map_or(true, |subset| subset.iter().any(|s| s == column))
    }
}

/// Missing mask of a column
pub fn column_isna(values: &[Value], na_value: &Value) -> Vec<bool> {
    values.iter().map(|v| v == na_value).collect()
}

/// Present mask of a column
pub fn column_notna(values: &[Value], na_value: &Value) -> Vec<bool> {
    values.iter().map(|v| v != na_value).collect()
}

/// Row with every cell replaced by whether it is missing
pub fn row_isna(row: &Row, na_value: &Value) -> Row {
    row.iter()
        .map(|(k, v)| (k.clone(), Value::Bool(v == na_value)))
        .collect()
}

pub fn row_notna(row: &Row, na_value: &Value) -> Row {
    row.iter()
        .map(|(k, v)| (k.clone(), Value::Bool(v != na_value)))
        .collect()
}

fn mask_table(table: &Table, na_value: &Value, missing: bool) -> Table {
    let columns = table
        .itercolumns()
        .map(|(name, values)| {
            let mask = values
                .iter()
                .map(|v| Value::Bool((v == na_value) == missing))
                .collect();
            (name.to_string(), mask)
        })
        .collect();
    // Same shape as the source, so the length invariant holds.
    Table::from_map(columns).unwrap_or_default()
}

/// Table of booleans, `true` where a cell is missing
pub fn isna(table: &Table, na_value: &Value) -> Table {
    mask_table(table, na_value, true)
}

/// Table of booleans, `true` where a cell is present
pub fn notna(table: &Table, na_value: &Value) -> Table {
    mask_table(table, na_value, false)
}

/// Fill the missing cells of one line, returning how many were filled
fn fill_line<F>(cells: &mut [&mut Value], options: &FillOptions, mut replacement: F) -> usize
where
    F: FnMut(usize) -> Option<Value>,
{
    let na = &options.na_value;
    let order: Vec<usize> = match options.method {
        FillMethod::Backward => (0..cells.len()).rev().collect(),
        _ => (0..cells.len()).collect(),
    };
    let mut filled = 0;
    for i in order {
        if options.limit.is_some_and(|limit| filled >= limit) {
            break;
        }
        if *cells[i] != *na {
            continue;
        }
        let candidate = match options.method {
            FillMethod::Value => replacement(i),
            FillMethod::Forward => i.checked_sub(1).map(|p| cells[p].clone()),
            FillMethod::Backward => cells.get(i + 1).map(|n| (**n).clone()),
        };
        if let Some(value) = candidate {
            if options.method != FillMethod::Value && value == *na {
                continue;
            }
            *cells[i] = value;
            filled += 1;
        }
    }
    filled
}

impl Table {
    /// Boolean table marking missing cells
    pub fn isna(&self, na_value: &Value) -> Table {
        isna(self, na_value)
    }

    /// Boolean table marking present cells
    pub fn notna(&self, na_value: &Value) -> Table {
        notna(self, na_value)
    }

    /// Copy of the table with missing cells filled
    pub fn fillna(&self, options: &FillOptions) -> Result<Table> {
        let mut table = self.clone();
        table.fillna_in_place(options)?;
        Ok(table)
    }

    /// Copy of the table without rows or columns holding missing cells
    pub fn dropna(&self, options: &DropOptions) -> Result<Table> {
        let mut table = self.clone();
        table.dropna_in_place(options)?;
        Ok(table)
    }

    pub(crate) fn fillna_in_place(&mut self, options: &FillOptions) -> Result<()> {
        options.validate()?;
        let fill = options.value.as_ref();
        let names = self.column_names();

        match options.axis {
            Axis::Columns => {
                for (name, values) in self.columns_mut().iter_mut() {
                    let replacement = match (options.method, fill) {
                        (FillMethod::Value, Some(fill)) => match fill.for_column(name) {
                            Some(value) => Some(value.clone()),
                            None => continue,
                        },
                        _ => None,
                    };
                    let mut cells: Vec<&mut Value> = values.iter_mut().collect();
                    fill_line(&mut cells, options, |_| replacement.clone());
                }
            }
            Axis::Rows => {
                for row in 0..self.row_count() {
                    let mut cells: Vec<&mut Value> = self
                        .columns_mut()
                        .values_mut()
                        .map(|values| &mut values[row])
                        .collect();
                    fill_line(&mut cells, options, |i| {
                        fill.and_then(|f| f.for_column(&names[i])).cloned()
                    });
                }
            }
        }
        Ok(())
    }

    pub(crate) fn dropna_in_place(&mut self, options: &DropOptions) -> Result<()> {
        if let Some(subset) = &options.subset {
            self.require_columns(subset.as_slice())?;
        }

        match options.axis {
            Axis::Rows => {
                let checked: Vec<&[Value]> = self
                    .itercolumns()
                    .filter(|(name, _)| options.in_subset(name))
                    .map(|(_, values)| values)
                    .collect();
                let keep: Vec<bool> = self
                    .index()
                    .map(|i| !options.drops(checked.iter().map(|values| &values[i])))
                    .collect();
                for values in self.columns_mut().values_mut() {
                    let mut flags = keep.iter();
                    values.retain(|_| flags.next().copied().unwrap_or(true));
                }
            }
            Axis::Columns => {
                let dropped: Vec<String> = self
                    .itercolumns()
                    .filter(|(name, values)| options.in_subset(name) && options.drops(values.iter()))
                    .map(|(name, _)| name.to_string())
                    .collect();
                for name in dropped {
                    self.columns_mut().shift_remove(&name);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn with_gaps() -> Table {
        Table::from_columns(vec![
            ("x", values![1, Value::Null, Value::Null, 4]),
            ("y", values![Value::Null, 6, Value::Null, 8]),
        ])
        .unwrap()
    }

    #[test]
    fn test_isna_notna() {
        let table = with_gaps();
        let mask = isna(&table, &Value::Null);
        assert_eq!(mask.get_column("x").unwrap(), values![false, true, true, false].as_slice());
        let mask = table.notna(&Value::Null);
        assert_eq!(mask.get_column("y").unwrap(), values![false, true, false, true].as_slice());
        assert_eq!(column_isna(&values![1, "NA"], &Value::from("NA")), vec![false, true]);
    }

    #[test]
    fn test_fill_value_with_limit() {
        let table = with_gaps();
        let filled = table.fillna(&FillOptions::value(0)).unwrap();
        assert_eq!(filled.get_column("x").unwrap(), values![1, 0, 0, 4].as_slice());

        let limited = table.fillna(&FillOptions::value(0).with_limit(1)).unwrap();
        assert_eq!(limited.get_column("x").unwrap(), values![1, 0, Value::Null, 4].as_slice());
    }

    #[test]
    fn test_forward_and_backward_chain() {
        let table = with_gaps();
        let ffilled = table.fillna(&FillOptions::forward()).unwrap();
        assert_eq!(ffilled.get_column("x").unwrap(), values![1, 1, 1, 4].as_slice());
        assert_eq!(ffilled.get_column("y").unwrap(), values![Value::Null, 6, 6, 8].as_slice());

        let bfilled = table.fillna(&FillOptions::backward()).unwrap();
        assert_eq!(bfilled.get_column("x").unwrap(), values![1, 4, 4, 4].as_slice());
        assert_eq!(bfilled.get_column("y").unwrap(), values![6, 6, 8, 8].as_slice());
    }

    #[test]
    fn test_fill_across_rows() {
        let table = with_gaps();
        let filled = table
            .fillna(&FillOptions::forward().with_axis(Axis::Rows))
            .unwrap();
        assert_eq!(filled.get_column("y").unwrap(), values![1, 6, Value::Null, 8].as_slice());
    }

    #[test]
    fn test_per_column_fill_skips_unnamed() {
        let table = with_gaps();
        let mut values = IndexMap::new();
        values.insert("y".to_string(), Value::Int(-1));
        let filled = table.fillna(&FillOptions::per_column(values)).unwrap();
        assert_eq!(filled.get_column("x").unwrap(), table.get_column("x").unwrap());
        assert_eq!(filled.get_column("y").unwrap(), values![-1, 6, -1, 8].as_slice());
    }

    #[test]
    fn test_value_and_method_conflict() {
        let mut options = FillOptions::forward();
        options.value = Some(FillValue::Scalar(Value::Int(0)));
        assert!(matches!(with_gaps().fillna(&options), Err(Error::InvalidInput(_))));
        assert!(matches!(
            with_gaps().fillna(&FillOptions::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_dropna_rows() {
        let table = Table::from_columns(vec![
            ("x", values![1, Value::Null, Value::Null]),
            ("y", values![5, 6, Value::Null]),
        ])
        .unwrap();

        let any = table.dropna(&DropOptions::new()).unwrap();
        assert_eq!(any.row_count(), 1);

        let all = table.dropna(&DropOptions::new().with_how(How::All)).unwrap();
        assert_eq!(all.get_column("y").unwrap(), values![5, 6].as_slice());

        let subset = table.dropna(&DropOptions::new().with_subset(["y"])).unwrap();
        assert_eq!(subset.get_column("x").unwrap(), values![1, Value::Null].as_slice());

        let thresh = table.dropna(&DropOptions::new().with_thresh(1)).unwrap();
        assert_eq!(thresh.row_count(), 2);

        assert!(matches!(
            table.dropna(&DropOptions::new().with_subset(["nope"])),
            Err(Error::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_dropna_columns() {
        let table = Table::from_columns(vec![
            ("x", values![1, 2]),
            ("y", values![Value::Null, 6]),
            ("z", values![Value::Null, Value::Null]),
        ])
        .unwrap();
        let any = table.dropna(&DropOptions::new().with_axis(Axis::Columns)).unwrap();
        assert_eq!(any.column_names(), vec!["x"]);

        let all = table
            .dropna(&DropOptions::new().with_axis(Axis::Columns).with_how(How::All))
            .unwrap();
        assert_eq!(all.column_names(), vec!["x", "y"]);

        let subset = table
            .dropna(&DropOptions::new().with_axis(Axis::Columns).with_subset(["z"]))
            .unwrap();
        assert_eq!(subset.column_names(), vec!["x", "y"]);
    }
}
