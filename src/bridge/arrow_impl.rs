// In: src/bridge/arrow_impl.rs

//! The Arrow `RecordBatch` import adapter.
//!
//! Arrow arrays already hold exactly what the table wants: one contiguous value
//! buffer plus a validity bitmap per column. Export is therefore a bulk copy of
//! the value buffer and an inversion of the `NullBuffer` (Arrow marks valid rows,
//! the table marks null rows).

use arrow::array::{Array, ArrayRef, AsArray, PrimitiveArray};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType as ArrowDataType, Decimal128Type, Float64Type, Int16Type,
    Int32Type, Int64Type, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::temporal_conversions::{
    timestamp_ms_to_datetime, timestamp_ns_to_datetime, timestamp_s_to_datetime,
    timestamp_us_to_datetime,
};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;
use bitvec::vec::BitVec;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::bridge::{ColumnBuffer, ColumnSchema, ExportedColumn, ImportAdapter};
use crate::error::LightTableError;
use crate::types::DataType;

/// Exposes one `RecordBatch` as an import source.
#[derive(Debug, Clone)]
pub struct RecordBatchAdapter {
    name: String,
    batch: RecordBatch,
}

impl RecordBatchAdapter {
    pub fn new(name: impl Into<String>, batch: RecordBatch) -> Self {
        Self {
            name: name.into(),
            batch,
        }
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }
}

/// Maps an Arrow type onto the declared type name the table resolves.
///
/// Types without a column counterpart keep their Arrow name, which the table then
/// rejects as `UnsupportedType`.
pub fn declared_type_name(arrow_type: &ArrowDataType) -> String {
    let mapped = match arrow_type {
        ArrowDataType::Int16 => Some(DataType::Int16),
        ArrowDataType::Int32 => Some(DataType::Int32),
        ArrowDataType::Int64 => Some(DataType::Int64),
        ArrowDataType::UInt8 => Some(DataType::UInt8),
        ArrowDataType::Float64 => Some(DataType::Float64),
        ArrowDataType::Decimal128(_, _) => Some(DataType::Decimal),
        ArrowDataType::Boolean => Some(DataType::Boolean),
        ArrowDataType::Timestamp(_, _) => Some(DataType::DateTime),
        ArrowDataType::FixedSizeBinary(16) => Some(DataType::Guid),
        ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => Some(DataType::String),
        ArrowDataType::Binary | ArrowDataType::LargeBinary => Some(DataType::Binary),
        _ => None,
    };
    match mapped {
        Some(dt) => dt.name().to_string(),
        None => arrow_type.to_string(),
    }
}

impl ImportAdapter for RecordBatchAdapter {
    fn table_name(&self) -> &str {
        &self.name
    }

    fn row_count(&self) -> usize {
        self.batch.num_rows()
    }

    fn schema(&self) -> Vec<ColumnSchema> {
        self.batch
            .schema()
            .fields()
            .iter()
            .enumerate()
            .map(|(ordinal, field)| {
                ColumnSchema::new(
                    field.name().clone(),
                    declared_type_name(field.data_type()),
                    ordinal,
                    field.is_nullable(),
                )
            })
            .collect()
    }

    fn export_column_buffer(&self, ordinal: usize) -> Result<ExportedColumn, LightTableError> {
        if ordinal >= self.batch.num_columns() {
            return Err(LightTableError::ColumnOutOfBounds {
                ordinal,
                column_count: self.batch.num_columns(),
            });
        }
        export_array(self.batch.column(ordinal))
    }
}

//==================================================================================
// 1. Array Export
//==================================================================================

/// Converts one Arrow array into an owned column buffer and null bitmap.
pub fn export_array(array: &ArrayRef) -> Result<ExportedColumn, LightTableError> {
    let nulls = null_bits(array.as_ref());

    let buffer = match array.data_type() {
        ArrowDataType::Int16 => ColumnBuffer::Int16(copy_values::<Int16Type>(array)),
        ArrowDataType::Int32 => ColumnBuffer::Int32(copy_values::<Int32Type>(array)),
        ArrowDataType::Int64 => ColumnBuffer::Int64(copy_values::<Int64Type>(array)),
        ArrowDataType::UInt8 => ColumnBuffer::UInt8(copy_values::<UInt8Type>(array)),
        ArrowDataType::Float64 => ColumnBuffer::Float64(copy_values::<Float64Type>(array)),
        ArrowDataType::Boolean => {
            ColumnBuffer::Boolean(array.as_boolean().values().iter().collect())
        }
        ArrowDataType::Decimal128(_, scale) => {
            let scale = *scale as i64;
            let decimals = array.as_primitive::<Decimal128Type>();
            ColumnBuffer::Decimal(map_valid(decimals, |raw| {
                Ok(BigDecimal::new(BigInt::from(raw), scale))
            })?)
        }
        ArrowDataType::Timestamp(unit, _) => ColumnBuffer::DateTime(export_timestamps(array, unit)?),
        ArrowDataType::FixedSizeBinary(16) => {
            let guids = array.as_fixed_size_binary();
            let values = (0..guids.len())
                .map(|row| {
                    if guids.is_null(row) {
                        return Ok(Uuid::nil());
                    }
                    Uuid::from_slice(guids.value(row)).map_err(|e| {
                        LightTableError::SchemaMismatch(format!("row {}: {}", row, e))
                    })
                })
                .collect::<Result<Vec<_>, LightTableError>>()?;
            ColumnBuffer::Guid(values)
        }
        ArrowDataType::Utf8 => {
            let strings = array.as_string::<i32>();
            ColumnBuffer::String(
                strings
                    .iter()
                    .map(|s| s.map(str::to_string).unwrap_or_default())
                    .collect(),
            )
        }
        ArrowDataType::LargeUtf8 => {
            let strings = array.as_string::<i64>();
            ColumnBuffer::String(
                strings
                    .iter()
                    .map(|s| s.map(str::to_string).unwrap_or_default())
                    .collect(),
            )
        }
        ArrowDataType::Binary => {
            let blobs = array.as_binary::<i32>();
            ColumnBuffer::Binary(blobs.iter().map(|b| b.map(<[u8]>::to_vec)).collect())
        }
        ArrowDataType::LargeBinary => {
            let blobs = array.as_binary::<i64>();
            ColumnBuffer::Binary(blobs.iter().map(|b| b.map(<[u8]>::to_vec)).collect())
        }
        other => return Err(LightTableError::UnsupportedType(other.to_string())),
    };

    Ok(ExportedColumn::new(buffer, nulls))
}

/// Inverts Arrow's validity bitmap into a null bitmap (set bit = null row).
fn null_bits(array: &dyn Array) -> Option<BitVec> {
    array
        .nulls()
        .map(|validity| validity.iter().map(|valid| !valid).collect())
}

/// Bulk-copies a primitive value buffer, slot for slot.
fn copy_values<T>(array: &ArrayRef) -> Vec<T::Native>
where
    T: ArrowPrimitiveType,
{
    array.as_primitive::<T>().values().to_vec()
}

/// Converts the valid slots of a primitive array, leaving null slots at the default.
fn map_valid<T, U, F>(array: &PrimitiveArray<T>, convert: F) -> Result<Vec<U>, LightTableError>
where
    T: ArrowPrimitiveType,
    U: Default,
    F: Fn(T::Native) -> Result<U, LightTableError>,
{
    array
        .values()
        .iter()
        .enumerate()
        .map(|(row, raw)| {
            if array.is_null(row) {
                Ok(U::default())
            } else {
                convert(*raw)
            }
        })
        .collect()
}

fn export_timestamps(
    array: &ArrayRef,
    unit: &TimeUnit,
) -> Result<Vec<NaiveDateTime>, LightTableError> {
    fn convert<T: ArrowPrimitiveType<Native = i64>>(
        array: &ArrayRef,
        to_datetime: fn(i64) -> Option<NaiveDateTime>,
    ) -> Result<Vec<NaiveDateTime>, LightTableError> {
        let timestamps = array.as_primitive::<T>();
        (0..timestamps.len())
            .map(|row| {
                if timestamps.is_null(row) {
                    return Ok(NaiveDateTime::MIN);
                }
                let raw = timestamps.value(row);
                to_datetime(raw).ok_or_else(|| {
                    LightTableError::SchemaMismatch(format!(
                        "row {}: timestamp {} is out of range",
                        row, raw
                    ))
                })
            })
            .collect()
    }

    match unit {
        TimeUnit::Second => convert::<TimestampSecondType>(array, timestamp_s_to_datetime),
        TimeUnit::Millisecond => {
            convert::<TimestampMillisecondType>(array, timestamp_ms_to_datetime)
        }
        TimeUnit::Microsecond => {
            convert::<TimestampMicrosecondType>(array, timestamp_us_to_datetime)
        }
        TimeUnit::Nanosecond => convert::<TimestampNanosecondType>(array, timestamp_ns_to_datetime),
    }
}
