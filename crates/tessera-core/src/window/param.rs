use std::fmt;
use std::str::FromStr;

use num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::FilterError;

/// Loosely typed `size` / `origin` argument as supplied by a caller or a
/// config file. Normalisation turns it into per-axis integers or reals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    #[serde(skip)]
    Complex(Complex<f64>),
    Seq(Vec<ParamValue>),
}

impl ParamValue {
    /// Short name of the value's kind for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "integer",
            ParamValue::Float(_) => "float",
            ParamValue::Complex(_) => "complex",
            ParamValue::Seq(_) => "sequence",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, ParamValue::Seq(_))
    }

    /// True if a complex number appears anywhere in the value.
    pub fn contains_complex(&self) -> bool {
        match self {
            ParamValue::Complex(_) => true,
            ParamValue::Seq(items) => items.iter().any(ParamValue::contains_complex),
            _ => false,
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Int(0)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Complex(c) => write!(f, "{}{:+}j", c.re, c.im),
            ParamValue::Seq(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Parses `"5"`, `"2.5"` or a comma-separated list such as `"5,3"`.
impl FromStr for ParamValue {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_one = |item: &str| -> Result<ParamValue, FilterError> {
            let item = item.trim();
            if let Ok(v) = item.parse::<i64>() {
                return Ok(ParamValue::Int(v));
            }
            item.parse::<f64>()
                .map(ParamValue::Float)
                .map_err(|_| FilterError::Config(format!("'{item}' is not a number")))
        };
        if s.contains(',') {
            s.split(',').map(parse_one).collect::<Result<Vec<_>, _>>().map(ParamValue::Seq)
        } else {
            parse_one(s)
        }
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
            }
        })*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Float(v as f64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<Complex<f64>> for ParamValue {
    fn from(v: Complex<f64>) -> Self {
        ParamValue::Complex(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>, const N: usize> From<[T; N]> for ParamValue {
    fn from(v: [T; N]) -> Self {
        ParamValue::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<ParamValue>> From<(A,)> for ParamValue {
    fn from(v: (A,)) -> Self {
        ParamValue::Seq(vec![v.0.into()])
    }
}

impl<A: Into<ParamValue>, B: Into<ParamValue>> From<(A, B)> for ParamValue {
    fn from(v: (A, B)) -> Self {
        ParamValue::Seq(vec![v.0.into(), v.1.into()])
    }
}

impl<A: Into<ParamValue>, B: Into<ParamValue>, C: Into<ParamValue>> From<(A, B, C)>
    for ParamValue
{
    fn from(v: (A, B, C)) -> Self {
        ParamValue::Seq(vec![v.0.into(), v.1.into(), v.2.into()])
    }
}
