use std::cmp::Ordering;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 2^63, the first float that no longer fits in an i64
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// A single cell of a table
///
/// Columns are heterogeneous: every cell carries its own variant, and the
/// statistics match on it to decide what they accept. Serializes to and
/// from plain JSON values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value (JSON `null`)
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Str(String),
    /// Nested sequence
    List(Vec<Value>),
    /// Nested object, keys kept in insertion order
    Map(IndexMap<String, Value>),
}

/// Hashable stand-in for a value, used to bucket values without comparing
/// every pair. Equal values always share a discriminant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Discriminant {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
}

/// Binary arithmetic operators supported on values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Returns the integer an integral, in-range float is equal to
fn integral(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= -TWO_POW_63 && f < TWO_POW_63 {
        Some(f as i64)
    } else {
        None
    }
}

fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    match integral(f) {
        Some(fi) => Some(i.cmp(&fi)),
        None if f >= TWO_POW_63 => Some(Ordering::Less),
        None if f < -TWO_POW_63 => Some(Ordering::Greater),
        None => (i as f64).partial_cmp(&f),
    }
}

impl Value {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether the value takes part in numeric statistics
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Hashable discriminant, or `None` for values that can only be
    /// classified by equality (lists, maps, NaN)
    pub(crate) fn discriminant(&self) -> Option<Discriminant> {
        match self {
            Value::Null => Some(Discriminant::Null),
            Value::Bool(b) => Some(Discriminant::Bool(*b)),
            Value::Int(i) => Some(Discriminant::Int(*i)),
            Value::Float(f) if f.is_nan() => None,
            Value::Float(f) => Some(match integral(*f) {
                Some(i) => Discriminant::Int(i),
                None => Discriminant::Float(f.to_bits()),
            }),
            Value::Str(s) => Some(Discriminant::Str(s.clone())),
            Value::List(_) | Value::Map(_) => None,
        }
    }

    pub fn checked_add(&self, rhs: &Value) -> Result<Value> {
        self.arith(rhs, ArithOp::Add)
    }

    pub fn checked_sub(&self, rhs: &Value) -> Result<Value> {
        self.arith(rhs, ArithOp::Sub)
    }

    pub fn checked_mul(&self, rhs: &Value) -> Result<Value> {
        self.arith(rhs, ArithOp::Mul)
    }

    pub fn checked_div(&self, rhs: &Value) -> Result<Value> {
        self.arith(rhs, ArithOp::Div)
    }

    /// Apply a binary operator
    ///
    /// Integer results that overflow are promoted to floats; division always
    /// yields a float and rejects a zero divisor.
    pub fn arith(&self, rhs: &Value, op: ArithOp) -> Result<Value> {
        match (self, rhs) {
            (Value::Int(a), Value::Int(b)) => {
                let (a, b) = (*a, *b);
                let exact = match op {
                    ArithOp::Add => a.checked_add(b),
                    ArithOp::Sub => a.checked_sub(b),
                    ArithOp::Mul => a.checked_mul(b),
                    ArithOp::Div => {
                        if b == 0 {
                            return Err(Error::ComputationError("division by zero".into()));
                        }
                        return Ok(Value::Float(a as f64 / b as f64));
                    }
                };
                Ok(match exact {
                    Some(v) => Value::Int(v),
                    None => Value::Float(float_op(a as f64, b as f64, op)),
                })
            }
            (a, b) if a.is_numeric() && b.is_numeric() => {
                let x = a.to_f64().unwrap_or(f64::NAN);
                let y = b.to_f64().unwrap_or(f64::NAN);
                if op == ArithOp::Div && y == 0.0 {
                    return Err(Error::ComputationError("division by zero".into()));
                }
                Ok(Value::Float(float_op(x, y, op)))
            }
            (Value::Str(a), Value::Str(b)) if op == ArithOp::Add => {
                Ok(Value::Str(format!("{}{}", a, b)))
            }
            (Value::List(a), Value::List(b)) if op == ArithOp::Add => {
                Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
            }
            _ => Err(Error::TypeMismatch(format!(
                "unsupported operand types for {}: {} and {}",
                op.symbol(),
                self.type_name(),
                rhs.type_name()
            ))),
        }
    }
}

fn float_op(x: f64, y: f64, op: ArithOp) -> f64 {
    match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div => x / y,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(i), Value::Float(f)) | (Value::Float(f), Value::Int(i)) => {
                integral(*f) == Some(*i)
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(i), Value::Float(f)) => cmp_int_float(*i, *f),
            (Value::Float(f), Value::Int(i)) => cmp_int_float(*i, *f).map(Ordering::reverse),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.partial_cmp(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

impl ToPrimitive for Value {
    fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) => f.to_i64(),
            _ => None,
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match self {
            Value::Int(i) => i.to_u64(),
            Value::Float(f) => f.to_u64(),
            _ => None,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => i.to_f64(),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, item)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        match i64::try_from(v) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::Float(v as f64),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(v: IndexMap<String, Value>) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// Build a `Vec<Value>` from heterogeneous literals
///
/// ```
/// use tinytable::{values, Value};
///
/// let row = values![1, "a", 2.5, true];
/// assert_eq!(row[1], Value::Str("a".into()));
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($v:expr),+ $(,)?) => {
        vec![$($crate::Value::from($v)),+]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_variants() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_ne!(Value::Int(1), Value::Float(1.5));
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Int(1), Value::Bool(true));
        assert_ne!(Value::Int(1), Value::Str("1".into()));
    }

    #[test]
    fn test_discriminant_agrees_with_equality() {
        assert_eq!(Value::Int(3).discriminant(), Value::Float(3.0).discriminant());
        assert_eq!(Value::Float(0.0).discriminant(), Value::Float(-0.0).discriminant());
        assert_ne!(Value::Float(0.5).discriminant(), Value::Int(0).discriminant());
        assert!(Value::Float(f64::NAN).discriminant().is_none());
        assert!(Value::List(values![1, 2]).discriminant().is_none());
    }

    #[test]
    fn test_ordering() {
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::Float(2.5) > Value::Int(2));
        assert!(Value::Str("a".into()) < Value::Str("b".into()));
        assert!(Value::List(values![1, 2]) < Value::List(values![1, 3]));
        assert!(Value::List(values![1]) < Value::List(values![1, 0]));
        assert_eq!(Value::Int(1).partial_cmp(&Value::Str("a".into())), None);
        assert_eq!(Value::Null.partial_cmp(&Value::Null), None);
        assert_eq!(Value::Int(i64::MAX).partial_cmp(&Value::Float(TWO_POW_63)), Some(Ordering::Less));
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(Value::Int(2).checked_add(&Value::Int(3)).unwrap(), Value::Int(5));
        assert_eq!(Value::Int(1).checked_div(&Value::Int(2)).unwrap(), Value::Float(0.5));
        assert_eq!(Value::Int(2).checked_mul(&Value::Float(1.5)).unwrap(), Value::Float(3.0));
        assert_eq!(
            Value::Str("ab".into()).checked_add(&Value::Str("c".into())).unwrap(),
            Value::Str("abc".into())
        );
        assert!(matches!(
            Value::Int(i64::MAX).checked_add(&Value::Int(1)).unwrap(),
            Value::Float(_)
        ));
        assert!(matches!(
            Value::Int(1).checked_div(&Value::Int(0)),
            Err(Error::ComputationError(_))
        ));
        assert!(matches!(
            Value::Str("a".into()).checked_sub(&Value::Int(1)),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_to_primitive() {
        assert_eq!(Value::Int(4).to_f64(), Some(4.0));
        assert_eq!(Value::Float(2.5).to_f64(), Some(2.5));
        assert_eq!(Value::Bool(true).to_f64(), None);
        assert_eq!(Value::Str("1".into()).to_i64(), None);
    }

    #[test]
    fn test_serde_untagged() {
        let parsed: Vec<Value> = serde_json::from_str(r#"[1, 2.5, "a", true, null, [1], {"k": 2}]"#).unwrap();
        assert!(matches!(parsed[0], Value::Int(1)));
        assert!(matches!(parsed[1], Value::Float(_)));
        assert_eq!(parsed[2], Value::Str("a".into()));
        assert_eq!(parsed[3], Value::Bool(true));
        assert!(parsed[4].is_null());
        assert_eq!(parsed[5], Value::List(values![1]));
        assert!(matches!(parsed[6], Value::Map(_)));

        let text = serde_json::to_string(&Value::Float(1.0)).unwrap();
        assert_eq!(text, "1.0");
    }
}
