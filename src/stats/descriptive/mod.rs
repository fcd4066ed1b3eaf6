// Descriptive statistics over a group's values

use std::cmp::Ordering;

use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::groupby::classify::Classifier;
use crate::value::Value;

fn not_numeric(statistic: &str, value: &Value) -> Error {
    Error::TypeMismatch(format!(
        "{} requires numeric values, found {} {}",
        statistic,
        value.type_name(),
        value
    ))
}

/// Numeric view of every value, failing on the first non-numeric one
fn numeric(statistic: &str, values: &[&Value]) -> Result<Vec<f64>> {
    values
        .iter()
        .map(|v| match v {
            Value::Int(_) | Value::Float(_) => v.to_f64().ok_or_else(|| not_numeric(statistic, v)),
            other => Err(not_numeric(statistic, other)),
        })
        .collect()
}

/// Number of values
pub fn count(values: &[&Value]) -> Value {
    Value::from(values.len())
}

/// Sum of numeric values
///
/// Integers stay integers unless the total leaves the `i64` range; any
/// float makes the sum a float. The sum of nothing is `0`.
pub fn sum(values: &[&Value]) -> Result<Value> {
    let mut int_total: i128 = 0;
    let mut float_total = 0.0;
    let mut saw_float = false;
    for value in values {
        match value {
            Value::Int(i) => {
                int_total += i128::from(*i);
                float_total += *i as f64;
            }
            Value::Float(f) => {
                saw_float = true;
                float_total += f;
            }
            other => return Err(not_numeric("sum", other)),
        }
    }
    if saw_float {
        return Ok(Value::Float(float_total));
    }
    Ok(match i64::try_from(int_total) {
        Ok(total) => Value::Int(total),
        Err(_) => Value::Float(int_total as f64),
    })
}

/// Arithmetic mean, always a float
pub fn mean(values: &[&Value]) -> Result<Value> {
    let data = numeric("mean", values)?;
    if data.is_empty() {
        return Err(Error::InsufficientData("mean requires at least one data point".into()));
    }
    Ok(Value::Float(mean_of(&data)))
}

fn mean_of(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn sum_squared_diff(data: &[f64]) -> f64 {
    let mean = mean_of(data);
    data.iter().map(|&x| (x - mean).powi(2)).sum()
}

/// Population variance; a single value has variance 0
pub fn pvariance(values: &[&Value]) -> Result<f64> {
    let data = numeric("pvariance", values)?;
    if data.is_empty() {
        return Err(Error::InsufficientData(
            "pvariance requires at least one data point".into(),
        ));
    }
    Ok(sum_squared_diff(&data) / data.len() as f64)
}

/// Sample variance, needs at least two values
pub fn variance(values: &[&Value]) -> Result<f64> {
    let data = numeric("variance", values)?;
    if data.len() < 2 {
        return Err(Error::InsufficientData(format!(
            "variance requires at least two data points, got {}",
            data.len()
        )));
    }
    Ok(sum_squared_diff(&data) / (data.len() - 1) as f64)
}

/// Population standard deviation
pub fn pstdev(values: &[&Value]) -> Result<Value> {
    pvariance(values)
        .map(|v| Value::Float(v.sqrt()))
        .map_err(|e| e.context("pstdev"))
}

/// Sample standard deviation
pub fn stdev(values: &[&Value]) -> Result<Value> {
    variance(values)
        .map(|v| Value::Float(v.sqrt()))
        .map_err(|e| e.context("stdev"))
}

/// Whether `candidate` should replace `current` as the running extreme
///
/// Numbers that fail to compare (NaN) never replace; any other unordered
/// pair is a type error.
fn replaces(candidate: &Value, current: &Value, wanted: Ordering, statistic: &str) -> Result<bool> {
    match candidate.partial_cmp(current) {
        Some(ordering) => Ok(ordering == wanted),
        None if candidate.is_numeric() && current.is_numeric() => Ok(false),
        None => Err(Error::TypeMismatch(format!(
            "{} cannot order {} against {}",
            statistic,
            candidate.type_name(),
            current.type_name()
        ))),
    }
}

fn extreme(values: &[&Value], wanted: Ordering, statistic: &str) -> Result<Value> {
    let mut iter = values.iter();
    let mut best = *iter.next().ok_or_else(|| {
        Error::InsufficientData(format!("{} of an empty sequence", statistic))
    })?;
    for value in iter {
        if replaces(value, best, wanted, statistic)? {
            best = *value;
        }
    }
    Ok(best.clone())
}

/// Smallest value, the first one on ties
pub fn min(values: &[&Value]) -> Result<Value> {
    extreme(values, Ordering::Less, "min")
}

/// Largest value, the first one on ties
pub fn max(values: &[&Value]) -> Result<Value> {
    extreme(values, Ordering::Greater, "max")
}

/// Most frequent value
///
/// Among values sharing the highest count the one seen first wins.
pub fn mode(values: &[&Value]) -> Result<Value> {
    let mut classifier = Classifier::new();
    let mut counts: Vec<usize> = Vec::new();
    for value in values {
        let class = classifier.classify(std::slice::from_ref(*value));
        if class == counts.len() {
            counts.push(0);
        }
        counts[class] += 1;
    }

    let mut winner: Option<(usize, usize)> = None;
    for (class, &n) in counts.iter().enumerate() {
        if winner.map_or(true, |(_, best)| n > best) {
            winner = Some((class, n));
        }
    }
    let (class, _) = winner.ok_or_else(|| Error::InsufficientData("no mode for empty data".into()))?;
    classifier
        .into_classes()
        .into_iter()
        .nth(class)
        .and_then(|mut key| key.pop())
        .ok_or_else(|| Error::ComputationError("mode class vanished".into()))
}

/// Number of distinct values
pub fn nunique(values: &[&Value]) -> Value {
    let mut classifier = Classifier::new();
    for value in values {
        classifier.classify(std::slice::from_ref(*value));
    }
    Value::from(classifier.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    fn refs(values: &[Value]) -> Vec<&Value> {
        values.iter().collect()
    }

    #[test]
    fn test_sum_keeps_integers() {
        let data = values![1, 2, 3];
        assert_eq!(sum(&refs(&data)).unwrap(), Value::Int(6));

        let mixed = values![1, 2.5];
        assert_eq!(sum(&refs(&mixed)).unwrap(), Value::Float(3.5));

        let big = values![i64::MAX, 1];
        assert!(matches!(sum(&refs(&big)).unwrap(), Value::Float(_)));

        assert_eq!(sum(&[]).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_numeric_statistics_reject_strings() {
        let data = values![1, "a"];
        assert!(matches!(sum(&refs(&data)), Err(Error::TypeMismatch(_))));
        assert!(matches!(mean(&refs(&data)), Err(Error::TypeMismatch(_))));
        assert!(matches!(stdev(&refs(&data)), Err(Error::TypeMismatch(_))));

        let bools = values![true, false];
        assert!(matches!(sum(&refs(&bools)), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn test_mean_and_deviation() {
        let data = values![2, 4, 4, 4, 5, 5, 7, 9];
        assert_eq!(mean(&refs(&data)).unwrap(), Value::Float(5.0));
        assert_eq!(pstdev(&refs(&data)).unwrap(), Value::Float(2.0));
        let s = stdev(&refs(&data)).unwrap().to_f64().unwrap();
        assert!((s - 2.138089935299395).abs() < 1e-12);
    }

    #[test]
    fn test_single_observation() {
        let data = values![42];
        assert_eq!(pstdev(&refs(&data)).unwrap(), Value::Float(0.0));
        assert!(matches!(stdev(&refs(&data)), Err(Error::InsufficientData(_))));
    }

    #[test]
    fn test_min_max() {
        let data = values![3, 1.5, 7, 1.5];
        assert_eq!(min(&refs(&data)).unwrap(), Value::Float(1.5));
        assert_eq!(max(&refs(&data)).unwrap(), Value::Int(7));

        let words = values!["pear", "apple"];
        assert_eq!(min(&refs(&words)).unwrap(), Value::from("apple"));

        let mixed = values![1, "a"];
        assert!(matches!(max(&refs(&mixed)), Err(Error::TypeMismatch(_))));
        let nulls = values![Value::Null, 1];
        assert!(matches!(min(&refs(&nulls)), Err(Error::TypeMismatch(_))));
    }

    #[test]
    fn test_mode_first_seen_wins_ties() {
        let data = values![1, 1, 2, 2];
        assert_eq!(mode(&refs(&data)).unwrap(), Value::Int(1));

        let data = values!["b", "a", "a", "b", "c"];
        assert_eq!(mode(&refs(&data)).unwrap(), Value::from("b"));

        let data = values![3, 4, 4];
        assert_eq!(mode(&refs(&data)).unwrap(), Value::Int(4));
    }

    #[test]
    fn test_nunique_and_count() {
        let data = values![1, 1.0, "1", Value::List(values![1]), Value::List(values![1])];
        assert_eq!(nunique(&refs(&data)), Value::Int(3));
        assert_eq!(count(&refs(&data)), Value::Int(5));
    }
}
