//! Per-group reduction of one column

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Groups, Partition};
use crate::error::{Error, Result};
use crate::stats;
use crate::table::Table;
use crate::value::Value;

/// Statistic computed over the values of each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Count,
    Sum,
    Mean,
    Min,
    Max,
    Mode,
    Nunique,
    /// Population standard deviation
    Pstdev,
    /// Sample standard deviation
    Stdev,
}

impl Statistic {
    pub const ALL: [Statistic; 9] = [
        Statistic::Count,
        Statistic::Sum,
        Statistic::Mean,
        Statistic::Min,
        Statistic::Max,
        Statistic::Mode,
        Statistic::Nunique,
        Statistic::Pstdev,
        Statistic::Stdev,
    ];

    /// Lowercase name, also the suffix of aggregate column names
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Count => "count",
            Statistic::Sum => "sum",
            Statistic::Mean => "mean",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Mode => "mode",
            Statistic::Nunique => "nunique",
            Statistic::Pstdev => "pstdev",
            Statistic::Stdev => "stdev",
        }
    }

    /// Reduce one group's values
    pub fn apply(&self, values: &[&Value]) -> Result<Value> {
        match self {
            Statistic::Count => Ok(stats::count(values)),
            Statistic::Sum => stats::sum(values),
            Statistic::Mean => stats::mean(values),
            Statistic::Min => stats::min(values),
            Statistic::Max => stats::max(values),
            Statistic::Mode => stats::mode(values),
            Statistic::Nunique => Ok(stats::nunique(values)),
            Statistic::Pstdev => stats::pstdev(values),
            Statistic::Stdev => stats::stdev(values),
        }
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Statistic::ALL
            .iter()
            .copied()
            .find(|stat| stat.name() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown statistic '{}'", s)))
    }
}

impl Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute `statistic` over `target_column` for every group of `partition`
///
/// Results follow the partition's key order. The first failing group aborts
/// the whole computation.
pub fn aggregate(
    table: &Table,
    partition: &Partition,
    target_column: &str,
    statistic: Statistic,
) -> Result<Groups<Value>> {
    let column = table.get_column(target_column)?;
    if partition.row_count() != column.len() {
        return Err(Error::LengthMismatch {
            expected: partition.row_count(),
            actual: column.len(),
        });
    }

    partition
        .iter()
        .map(|(key, rows)| {
            let values: Vec<&Value> = rows.iter().map(|&i| &column[i]).collect();
            let value = statistic.apply(&values).map_err(|e| {
                e.context(format_args!(
                    "{} of column '{}' in group {}",
                    statistic, target_column, key
                ))
            })?;
            Ok((key.clone(), value))
        })
        .collect()
}
