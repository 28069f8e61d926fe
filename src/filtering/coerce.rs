//! Textual filter values to native attribute values.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::metamodel::ValueType;

/// A typed value, either coerced from filter input or read from a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Decimal(Decimal),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    /// Symbolic variant name
    Enum(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text content of string and enum values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Compare two values of compatible types.
    ///
    /// Integers and floats compare across widths. Returns `None` for `Null`
    /// on either side and for mismatched types, which callers treat as
    /// "unknown" rather than as equal or unequal.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        use Value as V;
        match (self, other) {
            (V::Null, _) | (_, V::Null) => None,
            (V::String(a) | V::Enum(a), V::String(b) | V::Enum(b)) => Some(a.cmp(b)),
            (V::Boolean(a), V::Boolean(b)) => Some(a.cmp(b)),
            (V::Decimal(a), V::Decimal(b)) => Some(a.cmp(b)),
            (V::Date(a), V::Date(b)) => Some(a.cmp(b)),
            (V::DateTime(a), V::DateTime(b)) => Some(a.cmp(b)),
            (V::Uuid(a), V::Uuid(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_i64(), b.as_i64()) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
            },
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i64::from(*i)),
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(f64::from(*i)),
            Self::Long(l) => Some(*l as f64),
            Self::Double(d) => Some(*d),
            Self::Float(f) => Some(f64::from(*f)),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(s) | Self::Enum(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Date(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Uuid(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )+
    };
}

impl_from_for_value! {
    String => String,
    i32 => Integer,
    i64 => Long,
    f64 => Double,
    f32 => Float,
    Decimal => Decimal,
    bool => Boolean,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    Uuid => Uuid,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

const ISO_DATE: &str = "%Y-%m-%d";
const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// 96-bit mantissa: magnitudes above `Decimal::MAX` (29 digits) do not convert.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn parse_boolean(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Convert `raw` into the native representation of `target`.
///
/// Blank input and anything that does not parse as the target type yield
/// `None`. Strings pass through untouched (including surrounding
/// whitespace); every other type is parsed from the exact input.
#[must_use]
pub fn coerce(raw: &str, target: &ValueType) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }

    let value = match target {
        ValueType::String => Value::String(raw.to_string()),
        ValueType::Integer => Value::Integer(raw.parse().ok()?),
        ValueType::Long => Value::Long(raw.parse().ok()?),
        ValueType::Double => Value::Double(raw.parse().ok()?),
        ValueType::Float => Value::Float(raw.parse().ok()?),
        ValueType::Decimal => Value::Decimal(parse_decimal(raw)?),
        ValueType::Boolean => Value::Boolean(parse_boolean(raw)?),
        ValueType::Date => Value::Date(NaiveDate::parse_from_str(raw, ISO_DATE).ok()?),
        ValueType::DateTime => {
            Value::DateTime(NaiveDateTime::parse_from_str(raw, ISO_DATE_TIME).ok()?)
        }
        ValueType::Uuid => Value::Uuid(Uuid::parse_str(raw).ok()?),
        ValueType::Enum(enum_type) => {
            Value::Enum(enum_type.variant(&raw.to_uppercase())?.to_string())
        }
    };
    Some(value)
}
