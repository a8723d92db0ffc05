//! The untyped cell value exchanged by the uniform column facade, and the
//! `FromValue` trait behind every `field::<T>()` accessor.

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use std::fmt;
use uuid::Uuid;

use crate::error::LightTableError;
use crate::types::DataType;

/// A single cell as seen through the untyped facade.
///
/// `Null` is the logical null: it is distinct from whatever default value
/// occupies the storage slot of a null row.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    Float64(f64),
    Decimal(BigDecimal),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Guid(Uuid),
    String(String),
    Binary(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The element type carried by this value, or `None` for the logical null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int16(_) => Some(DataType::Int16),
            Value::Int32(_) => Some(DataType::Int32),
            Value::Int64(_) => Some(DataType::Int64),
            Value::UInt8(_) => Some(DataType::UInt8),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Decimal(_) => Some(DataType::Decimal),
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::DateTime(_) => Some(DataType::DateTime),
            Value::Guid(_) => Some(DataType::Guid),
            Value::String(_) => Some(DataType::String),
            Value::Binary(_) => Some(DataType::Binary),
        }
    }

    /// Type name used in `InvalidCast` diagnostics.
    pub(crate) fn type_label(&self) -> &'static str {
        self.data_type().map(|dt| dt.name()).unwrap_or("Null")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::DateTime(v) => write!(f, "{}", v),
            Value::Guid(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::Binary(v) => write!(f, "<{} bytes>", v.len()),
        }
    }
}

//==================================================================================
// 1. Typed Extraction
//==================================================================================

/// Exact conversion from an untyped `Value` into a concrete Rust type.
///
/// No widening or parsing happens here: an `Int32` cell cannot be read as `i64`.
/// A logical null only converts into `Option<T>` (as `None`) or `Value`.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, LightTableError>;
}

macro_rules! impl_from_value {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, LightTableError> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(LightTableError::invalid_cast(
                            DataType::$variant,
                            other.type_label(),
                        )),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )+
    };
}

impl_from_value!(
    Int16 => i16,
    Int32 => i32,
    Int64 => i64,
    UInt8 => u8,
    Float64 => f64,
    Decimal => BigDecimal,
    Boolean => bool,
    DateTime => NaiveDateTime,
    Guid => Uuid,
    String => String,
    Binary => Vec<u8>,
);

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, LightTableError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, LightTableError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_extraction() {
        assert_eq!(i32::from_value(Value::Int32(7)).unwrap(), 7);
        assert_eq!(
            String::from_value(Value::from("abc")).unwrap(),
            "abc".to_string()
        );
    }

    #[test]
    fn test_no_implicit_widening() {
        let err = i64::from_value(Value::Int32(7)).unwrap_err();
        match err {
            LightTableError::InvalidCast { expected, found } => {
                assert_eq!(expected, "Int64");
                assert_eq!(found, "Int32");
            }
            other => panic!("Expected InvalidCast, got {:?}", other),
        }
    }

    #[test]
    fn test_null_requires_option() {
        assert!(matches!(
            f64::from_value(Value::Null),
            Err(LightTableError::InvalidCast { .. })
        ));
        assert_eq!(Option::<f64>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<f64>::from_value(Value::Float64(1.5)).unwrap(),
            Some(1.5)
        );
    }

    #[test]
    fn test_option_into_value() {
        assert_eq!(Value::from(None::<i16>), Value::Null);
        assert_eq!(Value::from(Some(3i16)), Value::Int16(3));
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Boolean(true).to_string(), "true");
    }
}
