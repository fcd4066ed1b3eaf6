//! Grouped handle over a table and the shapes of its results

use rayon::prelude::*;

use super::aggregate::{aggregate, Statistic};
use super::{group, GroupKey, Groups, Partition};
use crate::config::{GroupByConfig, OutputShape};
use crate::error::{Error, Result};
use crate::table::{Row, Table};
use crate::value::Value;

/// Output of [`GroupedView::aggregate_all`] and [`GroupedView::aggregate_one`]
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateResult {
    /// One row per group: key columns followed by `<target>_<statistic>` columns
    Data(Table),
    /// One value per group, when a single column was aggregated
    Groups(Groups<Value>),
    /// Column name -> value per group, when every column was aggregated
    GroupRows(Groups<Row>),
}

impl AggregateResult {
    pub fn shape(&self) -> OutputShape {
        match self {
            AggregateResult::Data(_) => OutputShape::Data,
            AggregateResult::Groups(_) | AggregateResult::GroupRows(_) => OutputShape::Groups,
        }
    }

    pub fn as_data(&self) -> Option<&Table> {
        match self {
            AggregateResult::Data(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Table> {
        match self {
            AggregateResult::Data(table) => Some(table),
            _ => None,
        }
    }

    pub fn into_groups(self) -> Option<Groups<Value>> {
        match self {
            AggregateResult::Groups(groups) => Some(groups),
            _ => None,
        }
    }

    pub fn into_group_rows(self) -> Option<Groups<Row>> {
        match self {
            AggregateResult::GroupRows(groups) => Some(groups),
            _ => None,
        }
    }
}

/// A table bound to a partition of its rows
///
/// The partition is computed once, when the view is created; every
/// aggregation reuses it and never touches the table's values.
#[derive(Debug, Clone)]
pub struct GroupedView<'a> {
    table: &'a Table,
    partition: Partition,
    config: GroupByConfig,
}

impl Table {
    /// Group rows by the values of `keys`
    ///
    /// # Example
    ///
    /// ```
    /// use tinytable::{values, Table, Value};
    ///
    /// let table = Table::from_columns(vec![
    ///     ("x", values![1, 1, 2]),
    ///     ("y", values![10, 20, 30]),
    /// ])
    /// .unwrap();
    /// let sums = table.group_by(["x"]).unwrap().sum_column_groups("y").unwrap();
    /// assert_eq!(sums.get(1), Some(&Value::Int(30)));
    /// ```
    pub fn group_by<I, S>(&self, keys: I) -> Result<GroupedView<'_>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.group_by_with(keys, GroupByConfig::default())
    }

    /// Group rows with explicit settings
    pub fn group_by_with<I, S>(&self, keys: I, config: GroupByConfig) -> Result<GroupedView<'_>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        GroupedView::new(self, &keys, config)
    }
}

impl<'a> GroupedView<'a> {
    pub fn new<S: AsRef<str>>(table: &'a Table, key_columns: &[S], config: GroupByConfig) -> Result<Self> {
        let partition = group(table, key_columns)?;
        Ok(GroupedView {
            table,
            partition,
            config,
        })
    }

    pub fn with_config(mut self, config: GroupByConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GroupByConfig {
        &self.config
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn key_columns(&self) -> &[String] {
        self.partition.key_columns()
    }

    pub fn group_count(&self) -> usize {
        self.partition.len()
    }

    /// Rows per group
    pub fn size(&self) -> Groups<usize> {
        self.partition
            .iter()
            .map(|(key, rows)| (key.clone(), rows.len()))
            .collect()
    }

    /// Columns that are aggregated by `aggregate_all`: every non-key column
    pub fn target_columns(&self) -> Vec<String> {
        self.table
            .column_names()
            .into_iter()
            .filter(|name| !self.key_columns().contains(name))
            .collect()
    }

    /// Each group's rows as its own table
    pub fn split(&self) -> Result<Vec<(GroupKey, Table)>> {
        self.partition
            .iter()
            .map(|(key, rows)| Ok((key.clone(), self.table.take(rows)?)))
            .collect()
    }

    /// Apply `statistic` to every non-key column, shaped per the configuration
    pub fn aggregate_all(&self, statistic: Statistic) -> Result<AggregateResult> {
        self.aggregate_all_as(statistic, self.config.output)
    }

    /// Apply `statistic` to one column, shaped per the configuration
    pub fn aggregate_one(&self, column: &str, statistic: Statistic) -> Result<AggregateResult> {
        self.aggregate_one_as(column, statistic, self.config.output)
    }

    pub fn aggregate_all_as(&self, statistic: Statistic, shape: OutputShape) -> Result<AggregateResult> {
        let aggregates = self.aggregate_columns(statistic)?;
        Ok(match shape {
            OutputShape::Data => AggregateResult::Data(self.data_table(statistic, aggregates)?),
            OutputShape::Groups => AggregateResult::GroupRows(self.group_rows(aggregates)),
        })
    }

    pub fn aggregate_one_as(
        &self,
        column: &str,
        statistic: Statistic,
        shape: OutputShape,
    ) -> Result<AggregateResult> {
        let groups = aggregate(self.table, &self.partition, column, statistic)?;
        Ok(match shape {
            OutputShape::Data => {
                AggregateResult::Data(self.data_table(statistic, vec![(column.to_string(), groups)])?)
            }
            OutputShape::Groups => AggregateResult::Groups(groups),
        })
    }

    /// Several `(column, statistic)` aggregates side by side in one table
    pub fn agg<S: AsRef<str>>(&self, specs: &[(S, Statistic)]) -> Result<Table> {
        let columns: Vec<&str> = specs.iter().map(|(c, _)| c.as_ref()).collect();
        self.table.require_columns(&columns)?;

        let mut table = self.key_table();
        for (column, statistic) in specs {
            let column = column.as_ref();
            let groups = aggregate(self.table, &self.partition, column, *statistic)?;
            let name = format!("{}_{}", column, statistic);
            if table.contains_column(&name) {
                return Err(Error::DuplicateColumnName(name));
            }
            table.set_column(name, groups.into_iter().map(|(_, v)| v).collect())?;
        }
        Ok(table)
    }

    fn aggregate_columns(&self, statistic: Statistic) -> Result<Vec<(String, Groups<Value>)>> {
        let targets = self.target_columns();
        let run = |name: &String| {
            aggregate(self.table, &self.partition, name, statistic).map(|groups| (name.clone(), groups))
        };

        let results: Vec<Result<(String, Groups<Value>)>> =
            if self.table.row_count() >= self.config.parallel_threshold && targets.len() > 1 {
                log::debug!(
                    "aggregating {} columns in parallel ({} rows)",
                    targets.len(),
                    self.table.row_count()
                );
                targets.par_iter().map(run).collect()
            } else {
                targets.iter().map(run).collect()
            };

        let mut aggregates = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(pair) => aggregates.push(pair),
                Err(Error::TypeMismatch(msg)) if self.config.skip_incompatible_columns => {
                    log::debug!("skipping column: {}", msg);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(aggregates)
    }

    fn key_table(&self) -> Table {
        let mut table = Table::new();
        for (k, name) in self.key_columns().iter().enumerate() {
            let values: Vec<Value> = self
                .partition
                .keys()
                .map(|key| key.values()[k].clone())
                .collect();
            table.columns_mut().insert(name.clone(), values);
        }
        table
    }

    fn data_table(&self, statistic: Statistic, aggregates: Vec<(String, Groups<Value>)>) -> Result<Table> {
        let mut table = self.key_table();
        for (column, groups) in aggregates {
            let name = format!("{}_{}", column, statistic);
            if table.contains_column(&name) {
                return Err(Error::DuplicateColumnName(name));
            }
            table.set_column(name, groups.into_iter().map(|(_, v)| v).collect())?;
        }
        Ok(table)
    }

    fn group_rows(&self, aggregates: Vec<(String, Groups<Value>)>) -> Groups<Row> {
        let mut rows = vec![Row::new(); self.partition.len()];
        for (column, groups) in aggregates {
            for (row, (_, value)) in rows.iter_mut().zip(groups) {
                row.insert(column.clone(), value);
            }
        }
        self.partition.keys().cloned().zip(rows).collect()
    }

    fn all_data(&self, statistic: Statistic) -> Result<Table> {
        let aggregates = self.aggregate_columns(statistic)?;
        self.data_table(statistic, aggregates)
    }

    fn all_groups(&self, statistic: Statistic) -> Result<Groups<Row>> {
        Ok(self.group_rows(self.aggregate_columns(statistic)?))
    }

    fn column_data(&self, column: &str, statistic: Statistic) -> Result<Table> {
        let groups = aggregate(self.table, &self.partition, column, statistic)?;
        self.data_table(statistic, vec![(column.to_string(), groups)])
    }

    fn column_groups(&self, column: &str, statistic: Statistic) -> Result<Groups<Value>> {
        aggregate(self.table, &self.partition, column, statistic)
    }
}

macro_rules! statistic_shortcuts {
    ($($stat:ident => $data:ident, $groups:ident, $column_data:ident, $column_groups:ident;)*) => {
        impl<'a> GroupedView<'a> {
            $(
                #[doc = concat!("`", stringify!($data), "`: ", stringify!($stat), " of every non-key column as a table")]
                pub fn $data(&self) -> Result<Table> {
                    self.all_data(Statistic::$stat)
                }

                #[doc = concat!("`", stringify!($groups), "`: ", stringify!($stat), " of every non-key column per group")]
                pub fn $groups(&self) -> Result<Groups<Row>> {
                    self.all_groups(Statistic::$stat)
                }

                #[doc = concat!("`", stringify!($column_data), "`: ", stringify!($stat), " of one column as a table")]
                pub fn $column_data(&self, column: &str) -> Result<Table> {
                    self.column_data(column, Statistic::$stat)
                }

                #[doc = concat!("`", stringify!($column_groups), "`: ", stringify!($stat), " of one column per group")]
                pub fn $column_groups(&self, column: &str) -> Result<Groups<Value>> {
                    self.column_groups(column, Statistic::$stat)
                }
            )*
        }
    };
}

statistic_shortcuts! {
    Count => count_data, count_groups, count_column_data, count_column_groups;
    Sum => sum_data, sum_groups, sum_column_data, sum_column_groups;
    Mean => mean_data, mean_groups, mean_column_data, mean_column_groups;
    Min => min_data, min_groups, min_column_data, min_column_groups;
    Max => max_data, max_groups, max_column_data, max_column_groups;
    Mode => mode_data, mode_groups, mode_column_data, mode_column_groups;
    Nunique => nunique_data, nunique_groups, nunique_column_data, nunique_column_groups;
    Pstdev => pstdev_data, pstdev_groups, pstdev_column_data, pstdev_column_groups;
    Stdev => stdev_data, stdev_groups, stdev_column_data, stdev_column_groups;
}

/// Group `table` by `key_columns` and apply `statistic` to every other column
pub fn aggregate_all<S: AsRef<str>>(
    table: &Table,
    key_columns: &[S],
    statistic: Statistic,
    shape: OutputShape,
) -> Result<AggregateResult> {
    GroupedView::new(table, key_columns, GroupByConfig::default())?.aggregate_all_as(statistic, shape)
}

/// Group `table` by `key_columns` and apply `statistic` to `target_column`
///
/// The target column is checked before any row is partitioned.
pub fn aggregate_one<S: AsRef<str>>(
    table: &Table,
    key_columns: &[S],
    target_column: &str,
    statistic: Statistic,
    shape: OutputShape,
) -> Result<AggregateResult> {
    if key_columns.is_empty() {
        return Err(Error::EmptyKey);
    }
    table.require_columns(key_columns)?;
    table.require_columns(&[target_column])?;
    GroupedView::new(table, key_columns, GroupByConfig::default())?
        .aggregate_one_as(target_column, statistic, shape)
}
