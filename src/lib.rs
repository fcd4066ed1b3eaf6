//! tinytable: a small column-oriented table with grouping and aggregation
//!
//! A [`Table`] maps column names to equally long columns of dynamically
//! typed [`Value`]s. Rows can be grouped by one or more key columns and each
//! group reduced with a [`Statistic`]; results come back either as a flat
//! table or as a mapping from group key to value.
//!
//! ```
//! use tinytable::{values, Table, Value};
//!
//! let table = Table::from_columns(vec![
//!     ("x", values![1, 1, 2]),
//!     ("y", values![10, 20, 30]),
//! ])
//! .unwrap();
//!
//! let data = table.group_by(["x"]).unwrap().sum_data().unwrap();
//! assert_eq!(data.get_column("y_sum").unwrap(), values![30, 30].as_slice());
//! ```

#![allow(clippy::needless_lifetimes)]

pub mod config;
pub mod error;
pub mod groupby;
pub mod index;
pub mod io;
pub mod na;
pub mod stats;
pub mod table;
pub mod value;

// Re-export commonly used types
pub use config::{GroupByConfig, OutputShape};
pub use error::{Error, Result};
pub use groupby::{
    aggregate, aggregate_all, aggregate_one, group, AggregateResult, GroupKey, GroupedView, Groups,
    KeyStrategy, Partition, Statistic,
};
pub use index::{
    column_filter, filter_list_by_indexes, indexes_from_filter, indexes_from_mask, ColumnFilter,
};
pub use io::{from_json, read_json, to_json, to_json_records, write_json, JsonOrient};
pub use na::{isna, notna, Axis, DropOptions, FillMethod, FillOptions, FillValue, How};
pub use table::{uniques, value_counts, Change, ColumnValues, JoinType, Row, RowView, Table};
pub use value::{ArithOp, Value};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
