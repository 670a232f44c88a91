//! Value expressions.
//!
//! A modifier's value is either a constant parsed from the stat line or an
//! expression over other stats, e.g. `floor(Strength / 10)` for
//! "per 10 Strength". Arithmetic on constants folds eagerly so the common
//! case stays a plain `Value::Const`.

use crate::stat_id::StatId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An arithmetic expression producing a modifier value.
///
/// # Examples
///
/// ```rust
/// use statline::{StatId, Value};
///
/// let per_ten_strength = (Value::stat("Strength") / 10.0).floor();
/// let value = Value::from(2.0) * per_ten_strength;
///
/// let strength = StatId::from_str("Strength");
/// let lookup = |stat: &StatId| (stat == &strength).then_some(55.0);
/// assert_eq!(value.evaluate(&lookup), Some(10.0));
///
/// // Constants fold
/// assert_eq!(Value::from(30.0) / 3.0, Value::Const(10.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Const(f64),
    Stat(StatId),
    Add(Box<Value>, Box<Value>),
    Sub(Box<Value>, Box<Value>),
    Mul(Box<Value>, Box<Value>),
    Div(Box<Value>, Box<Value>),
    Floor(Box<Value>),
    Ceil(Box<Value>),
}

impl Value {
    /// The current value of a stat.
    pub fn stat(stat: impl Into<StatId>) -> Self {
        Value::Stat(stat.into())
    }

    /// Returns the constant if this expression is one.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Value::Const(v) => Some(*v),
            _ => None,
        }
    }

    pub fn floor(self) -> Self {
        match self {
            Value::Const(v) => Value::Const(v.floor()),
            other => Value::Floor(Box::new(other)),
        }
    }

    pub fn ceil(self) -> Self {
        match self {
            Value::Const(v) => Value::Const(v.ceil()),
            other => Value::Ceil(Box::new(other)),
        }
    }

    /// Evaluate the expression, looking up stat values through `lookup`.
    ///
    /// Returns `None` if a referenced stat is unknown or a division by
    /// zero occurs.
    pub fn evaluate(&self, lookup: &dyn Fn(&StatId) -> Option<f64>) -> Option<f64> {
        match self {
            Value::Const(v) => Some(*v),
            Value::Stat(stat) => lookup(stat),
            Value::Add(a, b) => Some(a.evaluate(lookup)? + b.evaluate(lookup)?),
            Value::Sub(a, b) => Some(a.evaluate(lookup)? - b.evaluate(lookup)?),
            Value::Mul(a, b) => Some(a.evaluate(lookup)? * b.evaluate(lookup)?),
            Value::Div(a, b) => {
                let divisor = b.evaluate(lookup)?;
                if divisor == 0.0 {
                    None
                } else {
                    Some(a.evaluate(lookup)? / divisor)
                }
            }
            Value::Floor(a) => Some(a.evaluate(lookup)?.floor()),
            Value::Ceil(a) => Some(a.evaluate(lookup)?.ceil()),
        }
    }

    /// All stats this expression reads, in first-use order.
    pub fn stats(&self) -> Vec<StatId> {
        let mut out = Vec::new();
        self.collect_stats(&mut out);
        out
    }

    fn collect_stats(&self, out: &mut Vec<StatId>) {
        match self {
            Value::Const(_) => {}
            Value::Stat(stat) => {
                if !out.contains(stat) {
                    out.push(stat.clone());
                }
            }
            Value::Add(a, b) | Value::Sub(a, b) | Value::Mul(a, b) | Value::Div(a, b) => {
                a.collect_stats(out);
                b.collect_stats(out);
            }
            Value::Floor(a) | Value::Ceil(a) => a.collect_stats(out),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Const(v)
    }
}

impl Add for Value {
    type Output = Value;

    fn add(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Const(a), Value::Const(b)) => Value::Const(a + b),
            (Value::Const(z), other) | (other, Value::Const(z)) if z == 0.0 => other,
            (a, b) => Value::Add(Box::new(a), Box::new(b)),
        }
    }
}

impl Sub for Value {
    type Output = Value;

    fn sub(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Const(a), Value::Const(b)) => Value::Const(a - b),
            (other, Value::Const(z)) if z == 0.0 => other,
            (a, b) => Value::Sub(Box::new(a), Box::new(b)),
        }
    }
}

impl Mul for Value {
    type Output = Value;

    fn mul(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Const(a), Value::Const(b)) => Value::Const(a * b),
            (Value::Const(one), other) | (other, Value::Const(one)) if one == 1.0 => other,
            (a, b) => Value::Mul(Box::new(a), Box::new(b)),
        }
    }
}

impl Div for Value {
    type Output = Value;

    fn div(self, rhs: Value) -> Value {
        match (self, rhs) {
            (Value::Const(a), Value::Const(b)) if b != 0.0 => Value::Const(a / b),
            (other, Value::Const(one)) if one == 1.0 => other,
            (a, b) => Value::Div(Box::new(a), Box::new(b)),
        }
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        match self {
            Value::Const(v) => Value::Const(-v),
            other => Value::Const(0.0) - other,
        }
    }
}

impl Add<f64> for Value {
    type Output = Value;

    fn add(self, rhs: f64) -> Value {
        self + Value::Const(rhs)
    }
}

impl Sub<f64> for Value {
    type Output = Value;

    fn sub(self, rhs: f64) -> Value {
        self - Value::Const(rhs)
    }
}

impl Mul<f64> for Value {
    type Output = Value;

    fn mul(self, rhs: f64) -> Value {
        self * Value::Const(rhs)
    }
}

impl Div<f64> for Value {
    type Output = Value;

    fn div(self, rhs: f64) -> Value {
        self / Value::Const(rhs)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(v) => write!(f, "{}", v),
            Value::Stat(stat) => write!(f, "{}", stat),
            Value::Add(a, b) => write!(f, "({} + {})", a, b),
            Value::Sub(a, b) => write!(f, "({} - {})", a, b),
            Value::Mul(a, b) => write!(f, "({} * {})", a, b),
            Value::Div(a, b) => write!(f, "({} / {})", a, b),
            Value::Floor(a) => write!(f, "floor({})", a),
            Value::Ceil(a) => write!(f, "ceil({})", a),
        }
    }
}
