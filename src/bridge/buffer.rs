//! Owned, typed column buffers exchanged between import sources and the table.

use bigdecimal::BigDecimal;
use bitvec::vec::BitVec;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::LightTableError;
use crate::types::DataType;
use crate::utils::safe_bytes_to_typed_slice;

/// A column's backing buffer, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnBuffer {
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    Float64(Vec<f64>),
    Decimal(Vec<BigDecimal>),
    Boolean(Vec<bool>),
    DateTime(Vec<NaiveDateTime>),
    Guid(Vec<Uuid>),
    String(Vec<String>),
    /// `None` entries are null rows.
    Binary(Vec<Option<Vec<u8>>>),
}

impl ColumnBuffer {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt8(_) => DataType::UInt8,
            Self::Float64(_) => DataType::Float64,
            Self::Decimal(_) => DataType::Decimal,
            Self::Boolean(_) => DataType::Boolean,
            Self::DateTime(_) => DataType::DateTime,
            Self::Guid(_) => DataType::Guid,
            Self::String(_) => DataType::String,
            Self::Binary(_) => DataType::Binary,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::Decimal(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::DateTime(v) => v.len(),
            Self::Guid(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Binary(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reinterprets a native-endian, fixed-width byte buffer as a typed buffer.
    ///
    /// This is the bulk path for sources that hand out their raw storage.
    ///
    /// # Errors
    /// * `UnsupportedType` if `data_type` has no fixed-width layout.
    /// * `PodCast` if the byte length is not a multiple of the element size.
    pub fn from_raw_bytes(data_type: DataType, bytes: &[u8]) -> Result<Self, LightTableError> {
        macro_rules! cast {
            ($variant:ident, $ty:ty) => {
                Self::$variant(read_pod::<$ty>(bytes)?)
            };
        }

        if !data_type.is_fixed_width() {
            return Err(LightTableError::UnsupportedType(format!(
                "{} cannot be imported from raw bytes",
                data_type
            )));
        }
        let buffer = match data_type {
            DataType::Int16 => cast!(Int16, i16),
            DataType::Int32 => cast!(Int32, i32),
            DataType::Int64 => cast!(Int64, i64),
            DataType::Float64 => cast!(Float64, f64),
            // UInt8 is the one fixed-width type left.
            _ => Self::UInt8(bytes.to_vec()),
        };
        Ok(buffer)
    }
}

/// Copies a byte buffer into a typed vector, going through an aligned cast when
/// possible and an unaligned per-element read otherwise.
fn read_pod<T: bytemuck::Pod>(bytes: &[u8]) -> Result<Vec<T>, LightTableError> {
    let width = std::mem::size_of::<T>();
    if bytes.len() % width != 0 {
        return Err(LightTableError::PodCast(format!(
            "{} bytes is not a multiple of the {}-byte element width",
            bytes.len(),
            width
        )));
    }
    match safe_bytes_to_typed_slice::<T>(bytes) {
        Ok(typed) => Ok(typed.to_vec()),
        Err(_) => Ok(bytes
            .chunks_exact(width)
            .map(bytemuck::pod_read_unaligned::<T>)
            .collect()),
    }
}

/// One column as bulk-exported by a source: its buffer and its null bitmap.
///
/// In `nulls`, a set bit marks a null row. `None` means the source tracked no nulls.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedColumn {
    pub buffer: ColumnBuffer,
    pub nulls: Option<BitVec>,
}

impl ExportedColumn {
    pub fn new(buffer: ColumnBuffer, nulls: Option<BitVec>) -> Self {
        Self { buffer, nulls }
    }

    /// A buffer with no null tracking.
    pub fn dense(buffer: ColumnBuffer) -> Self {
        Self {
            buffer,
            nulls: None,
        }
    }
}

macro_rules! impl_buffer_from_vec {
    ($($variant:ident => $ty:ty),+ $(,)?) => {
        $(
            impl From<Vec<$ty>> for ColumnBuffer {
                fn from(v: Vec<$ty>) -> Self {
                    ColumnBuffer::$variant(v)
                }
            }
        )+
    };
}

impl_buffer_from_vec!(
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
    Binary => Option<Vec<u8>>,
);
