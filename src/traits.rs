//! This module defines the trait bundle that lets one generic `TypedColumn<T>`
//! stand in for every per-type column variant.
//!
//! * `ColumnElement` - default value, conversion to/from `Value`, the null-encoding
//!   strategy, and the link back into the closed `Column` enum.
//! * `NumericElement` - the widened accumulator used by Sum/Mean.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use num_traits::Zero;
use std::fmt::Debug;
use uuid::Uuid;

use crate::column::{Column, TypedColumn};
use crate::error::LightTableError;
use crate::null_handling::{BitmapNulls, NullStrategy, SentinelNulls};
use crate::types::{DataType, FromValue, Value};

/// An element type that can back a column.
pub trait ColumnElement: Clone + Debug + Sized + 'static {
    /// The declared type this element implements.
    const DATA_TYPE: DataType;

    /// How rows of this element type record nullness.
    type Nulls: NullStrategy<Self>;

    /// The value written into a slot when the row is set to the logical null.
    fn default_value() -> Self;

    /// Boxes a concrete element for the untyped facade.
    fn into_value(self) -> Value;

    /// Validates and unboxes a non-null `Value`.
    fn try_from_value(value: Value) -> Result<Self, LightTableError>;

    fn wrap(column: TypedColumn<Self>) -> Column;

    fn downcast(column: &Column) -> Option<&TypedColumn<Self>>;

    fn downcast_mut(column: &mut Column) -> Option<&mut TypedColumn<Self>>;
}

macro_rules! impl_column_element {
    ($($variant:ident => $ty:ty, $default:expr);+ $(;)?) => {
        $(
            impl ColumnElement for $ty {
                const DATA_TYPE: DataType = DataType::$variant;
                type Nulls = BitmapNulls;

                #[inline]
                fn default_value() -> Self {
                    $default
                }

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn try_from_value(value: Value) -> Result<Self, LightTableError> {
                    <$ty as FromValue>::from_value(value)
                }

                fn wrap(column: TypedColumn<Self>) -> Column {
                    Column::$variant(column)
                }

                fn downcast(column: &Column) -> Option<&TypedColumn<Self>> {
                    match column {
                        Column::$variant(c) => Some(c),
                        _ => None,
                    }
                }

                fn downcast_mut(column: &mut Column) -> Option<&mut TypedColumn<Self>> {
                    match column {
                        Column::$variant(c) => Some(c),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_column_element!(
    Int16 => i16, 0;
    Int32 => i32, 0;
    Int64 => i64, 0;
    UInt8 => u8, 0;
    Float64 => f64, 0.0;
    Decimal => BigDecimal, BigDecimal::zero();
    Boolean => bool, false;
    DateTime => NaiveDateTime, NaiveDateTime::MIN;
    Guid => Uuid, Uuid::nil();
    String => String, String::new();
);

/// Byte arrays are the one element type whose nullness is the unset value itself.
impl ColumnElement for Option<Vec<u8>> {
    const DATA_TYPE: DataType = DataType::Binary;
    type Nulls = SentinelNulls;

    fn default_value() -> Self {
        None
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }

    fn try_from_value(value: Value) -> Result<Self, LightTableError> {
        <Option<Vec<u8>> as FromValue>::from_value(value)
    }

    fn wrap(column: TypedColumn<Self>) -> Column {
        Column::Binary(column)
    }

    fn downcast(column: &Column) -> Option<&TypedColumn<Self>> {
        match column {
            Column::Binary(c) => Some(c),
            _ => None,
        }
    }

    fn downcast_mut(column: &mut Column) -> Option<&mut TypedColumn<Self>> {
        match column {
            Column::Binary(c) => Some(c),
            _ => None,
        }
    }
}

//==================================================================================
// Numeric Capability
//==================================================================================

/// Element types that aggregate to a value rather than the logical null.
///
/// Sum and Mean accumulate in `Wide` so that summing a full column cannot
/// overflow the element type.
pub trait NumericElement: ColumnElement + PartialOrd {
    type Wide: Zero;

    fn widen(&self) -> Self::Wide;

    fn sum_value(sum: Self::Wide) -> Value;

    /// `count` is always non-zero.
    fn mean_value(sum: Self::Wide, count: usize) -> Value;

    /// Values that compare false against everything (NaN). Min and Max skip them
    /// unless nothing else is present.
    #[inline]
    fn is_unordered(&self) -> bool {
        false
    }
}

macro_rules! impl_integer_numeric {
    ($($ty:ty => $wide:ty),+ $(,)?) => {
        $(
            impl NumericElement for $ty {
                type Wide = $wide;

                #[inline]
                fn widen(&self) -> $wide {
                    *self as $wide
                }

                fn sum_value(sum: $wide) -> Value {
                    Value::Int64(sum as i64)
                }

                // Integer division truncates toward zero; the mean of a column is
                // always within the element range.
                fn mean_value(sum: $wide, count: usize) -> Value {
                    ((sum / count as $wide) as $ty).into_value()
                }
            }
        )+
    };
}

impl_integer_numeric!(i16 => i64, i32 => i64, u8 => i64);

impl NumericElement for i64 {
    type Wide = i128;

    #[inline]
    fn widen(&self) -> i128 {
        *self as i128
    }

    fn sum_value(sum: i128) -> Value {
        match i64::try_from(sum) {
            Ok(v) => Value::Int64(v),
            Err(_) => Value::Decimal(BigDecimal::new(BigInt::from(sum), 0)),
        }
    }

    fn mean_value(sum: i128, count: usize) -> Value {
        Value::Int64((sum / count as i128) as i64)
    }
}

impl NumericElement for f64 {
    type Wide = f64;

    #[inline]
    fn widen(&self) -> f64 {
        *self
    }

    fn sum_value(sum: f64) -> Value {
        Value::Float64(sum)
    }

    fn mean_value(sum: f64, count: usize) -> Value {
        Value::Float64(sum / count as f64)
    }

    #[inline]
    fn is_unordered(&self) -> bool {
        self.is_nan()
    }
}

impl NumericElement for BigDecimal {
    type Wide = BigDecimal;

    fn widen(&self) -> BigDecimal {
        self.clone()
    }

    fn sum_value(sum: BigDecimal) -> Value {
        Value::Decimal(sum)
    }

    fn mean_value(sum: BigDecimal, count: usize) -> Value {
        Value::Decimal(sum / BigDecimal::from(count as u64))
    }
}
