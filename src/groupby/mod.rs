//! Grouping and aggregation
//!
//! [`group`] partitions the rows of a [`Table`] by the values of one or more
//! key columns, [`aggregate`] reduces one column per group with a
//! [`Statistic`], and [`GroupedView`] (returned by [`Table::group_by`])
//! shapes the results either as a flat table or as a key -> value mapping.

pub mod aggregate;
pub(crate) mod classify;
pub mod view;

use std::fmt::{self, Display};

use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::Value;

pub use aggregate::{aggregate, Statistic};
pub use classify::KeyStrategy;
pub use view::{aggregate_all, aggregate_one, AggregateResult, GroupedView};

use classify::Classifier;

/// Values of the key columns shared by every row of a group
///
/// Grouping by a single column yields bare values; grouping by several
/// yields tuples in key column order.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupKey {
    Single(Value),
    Multi(Vec<Value>),
}

impl GroupKey {
    /// Tuple key for multi-column groups
    pub fn multi(values: Vec<Value>) -> Self {
        GroupKey::Multi(values)
    }

    fn from_parts(mut parts: Vec<Value>) -> Self {
        if parts.len() == 1 {
            GroupKey::Single(parts.remove(0))
        } else {
            GroupKey::Multi(parts)
        }
    }

    /// Key components in key column order
    pub fn values(&self) -> &[Value] {
        match self {
            GroupKey::Single(value) => std::slice::from_ref(value),
            GroupKey::Multi(values) => values,
        }
    }
}

impl Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Single(value) => write!(f, "{}", value),
            GroupKey::Multi(values) => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<Value> for GroupKey {
    fn from(value: Value) -> Self {
        GroupKey::Single(value)
    }
}

impl From<&GroupKey> for GroupKey {
    fn from(key: &GroupKey) -> Self {
        key.clone()
    }
}

macro_rules! group_key_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for GroupKey {
                fn from(value: $t) -> Self {
                    GroupKey::Single(Value::from(value))
                }
            }
        )*
    };
}

group_key_from_scalar!(i64, i32, f64, bool, &str, String);

/// Ordered mapping from group key to a per-group result
///
/// Keys keep the order of the partition they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Groups<V> {
    entries: Vec<(GroupKey, V)>,
}

impl<V> Groups<V> {
    /// Look up one group's result
    pub fn get<K: Into<GroupKey>>(&self, key: K) -> Option<&V> {
        let key = key.into();
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &V)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<V> FromIterator<(GroupKey, V)> for Groups<V> {
    fn from_iter<I: IntoIterator<Item = (GroupKey, V)>>(iter: I) -> Self {
        Groups {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for Groups<V> {
    type Item = (GroupKey, V);
    type IntoIter = std::vec::IntoIter<(GroupKey, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Row positions of a table bucketed by group key
///
/// Buckets appear in order of first occurrence; within a bucket positions
/// are ascending. Every row of the source table lands in exactly one bucket.
#[derive(Debug, Clone)]
pub struct Partition {
    key_columns: Vec<String>,
    groups: Vec<(GroupKey, Vec<usize>)>,
    row_count: usize,
    strategy: KeyStrategy,
}

impl Partition {
    /// Key columns the partition was built from
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Row count of the table the partition was built from
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn strategy(&self) -> KeyStrategy {
        self.strategy
    }

    /// Row positions of one group
    pub fn get<K: Into<GroupKey>>(&self, key: K) -> Option<&[usize]> {
        let key = key.into();
        self.groups
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> + '_ {
        self.groups.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[usize])> + '_ {
        self.groups.iter().map(|(k, rows)| (k, rows.as_slice()))
    }
}

/// Partition the rows of `table` by the values in `key_columns`
///
/// Fails with [`Error::EmptyKey`] when no key column is given and with
/// [`Error::ColumnNotFound`] when one of them is missing, before any row
/// is scanned.
pub fn group<S: AsRef<str>>(table: &Table, key_columns: &[S]) -> Result<Partition> {
    if key_columns.is_empty() {
        return Err(Error::EmptyKey);
    }
    let columns = key_columns
        .iter()
        .map(|name| table.get_column(name.as_ref()))
        .collect::<Result<Vec<&[Value]>>>()?;

    let mut classifier = Classifier::new();
    let mut buckets: Vec<Vec<usize>> = Vec::new();
    let mut key: Vec<Value> = Vec::with_capacity(columns.len());

    for row in table.index() {
        key.clear();
        key.extend(columns.iter().map(|values| values[row].clone()));
        let class = classifier.classify(&key);
        if class == buckets.len() {
            buckets.push(Vec::new());
        }
        buckets[class].push(row);
    }

    let strategy = classifier.strategy();
    if strategy == KeyStrategy::EqualityFallback {
        log::trace!("group keys without a hashable form, matched by equality");
    }

    let groups: Vec<(GroupKey, Vec<usize>)> = classifier
        .into_classes()
        .into_iter()
        .map(GroupKey::from_parts)
        .zip(buckets)
        .collect();

    let key_columns: Vec<String> = key_columns.iter().map(|k| k.as_ref().to_string()).collect();
    log::debug!(
        "partitioned {} rows into {} groups by {:?}",
        table.row_count(),
        groups.len(),
        key_columns
    );

    Ok(Partition {
        key_columns,
        groups,
        row_count: table.row_count(),
        strategy,
    })
}
