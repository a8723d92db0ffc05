// In: src/column/mod.rs

//! The polymorphic column facade.
//!
//! `Column` is a closed enum over the eleven `TypedColumn<T>` instantiations. It
//! gives tables and rows one uniform, `Value`-based surface, while
//! `as_typed::<T>()` hands hot loops the zero-boxing typed column underneath.

pub mod aggregate;
pub mod typed;

pub use aggregate::AggregateKind;
pub use typed::{ColumnMeta, TypedColumn};

use bigdecimal::BigDecimal;
use bitvec::vec::BitVec;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::bridge::ColumnBuffer;
use crate::error::LightTableError;
use crate::traits::ColumnElement;
use crate::types::{DataType, Value};

/// A table column of any supported element type.
#[derive(Debug, Clone)]
pub enum Column {
    Int16(TypedColumn<i16>),
    Int32(TypedColumn<i32>),
    Int64(TypedColumn<i64>),
    UInt8(TypedColumn<u8>),
    Float64(TypedColumn<f64>),
    Decimal(TypedColumn<BigDecimal>),
    Boolean(TypedColumn<bool>),
    DateTime(TypedColumn<NaiveDateTime>),
    Guid(TypedColumn<Uuid>),
    String(TypedColumn<String>),
    Binary(TypedColumn<Option<Vec<u8>>>),
}

/// Runs `$body` with `$col` bound to the inner `TypedColumn`, whatever its variant.
macro_rules! dispatch {
    ($column:expr, $col:ident => $body:expr) => {
        match $column {
            Column::Int16($col) => $body,
            Column::Int32($col) => $body,
            Column::Int64($col) => $body,
            Column::UInt8($col) => $body,
            Column::Float64($col) => $body,
            Column::Decimal($col) => $body,
            Column::Boolean($col) => $body,
            Column::DateTime($col) => $body,
            Column::Guid($col) => $body,
            Column::String($col) => $body,
            Column::Binary($col) => $body,
        }
    };
}

impl Column {
    /// Builds the column variant matching `buffer`'s element type.
    ///
    /// The buffer is moved into the column as-is; no cell is inspected except
    /// where the null strategy must stamp sentinels into null rows.
    pub(crate) fn from_buffer(
        meta: ColumnMeta,
        buffer: ColumnBuffer,
        nulls: Option<BitVec>,
        collapse_empty_nulls: bool,
    ) -> Result<Self, LightTableError> {
        fn build<T: ColumnElement>(
            meta: ColumnMeta,
            values: Vec<T>,
            nulls: Option<BitVec>,
            collapse: bool,
        ) -> Result<Column, LightTableError> {
            TypedColumn::from_import(meta, values, nulls, collapse).map(T::wrap)
        }

        let c = collapse_empty_nulls;
        match buffer {
            ColumnBuffer::Int16(v) => build(meta, v, nulls, c),
            ColumnBuffer::Int32(v) => build(meta, v, nulls, c),
            ColumnBuffer::Int64(v) => build(meta, v, nulls, c),
            ColumnBuffer::UInt8(v) => build(meta, v, nulls, c),
            ColumnBuffer::Float64(v) => build(meta, v, nulls, c),
            ColumnBuffer::Decimal(v) => build(meta, v, nulls, c),
            ColumnBuffer::Boolean(v) => build(meta, v, nulls, c),
            ColumnBuffer::DateTime(v) => build(meta, v, nulls, c),
            ColumnBuffer::Guid(v) => build(meta, v, nulls, c),
            ColumnBuffer::String(v) => build(meta, v, nulls, c),
            ColumnBuffer::Binary(v) => build(meta, v, nulls, c),
        }
    }

    //==============================================================================
    // 1. Metadata
    //==============================================================================

    pub fn data_type(&self) -> DataType {
        match self {
            Column::Int16(_) => DataType::Int16,
            Column::Int32(_) => DataType::Int32,
            Column::Int64(_) => DataType::Int64,
            Column::UInt8(_) => DataType::UInt8,
            Column::Float64(_) => DataType::Float64,
            Column::Decimal(_) => DataType::Decimal,
            Column::Boolean(_) => DataType::Boolean,
            Column::DateTime(_) => DataType::DateTime,
            Column::Guid(_) => DataType::Guid,
            Column::String(_) => DataType::String,
            Column::Binary(_) => DataType::Binary,
        }
    }

    pub fn meta(&self) -> &ColumnMeta {
        dispatch!(self, c => c.meta())
    }

    pub fn name(&self) -> &str {
        &self.meta().name
    }

    pub fn ordinal(&self) -> usize {
        self.meta().ordinal
    }

    pub fn nullable(&self) -> bool {
        self.meta().nullable
    }

    pub fn len(&self) -> usize {
        dispatch!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //==============================================================================
    // 2. Untyped Cell Access
    //==============================================================================

    pub fn get(&self, row: usize) -> Result<Value, LightTableError> {
        dispatch!(self, c => c.get(row))
    }

    pub fn set(&mut self, row: usize, value: Value) -> Result<(), LightTableError> {
        dispatch!(self, c => c.set(row, value))
    }

    //==============================================================================
    // 3. Typed Fast Path
    //==============================================================================

    /// Borrows the typed column underneath.
    ///
    /// # Errors
    /// `InvalidCast` if the column's element type is not `T`.
    pub fn as_typed<T: ColumnElement>(&self) -> Result<&TypedColumn<T>, LightTableError> {
        T::downcast(self)
            .ok_or_else(|| LightTableError::invalid_cast(T::DATA_TYPE, self.data_type()))
    }

    pub fn as_typed_mut<T: ColumnElement>(
        &mut self,
    ) -> Result<&mut TypedColumn<T>, LightTableError> {
        let found = self.data_type();
        T::downcast_mut(self).ok_or_else(|| LightTableError::invalid_cast(T::DATA_TYPE, found))
    }

    /// Bulk-copies the backing buffer of a `T` column into `destination` at `offset`.
    pub fn copy_to<T: ColumnElement>(
        &self,
        destination: &mut [T],
        offset: usize,
    ) -> Result<(), LightTableError> {
        self.as_typed::<T>()?.copy_to(destination, offset)
    }

    //==============================================================================
    // 4. Nulls
    //==============================================================================

    pub fn is_null(&self, row: usize) -> bool {
        dispatch!(self, c => c.is_null(row))
    }

    pub fn set_null(&mut self, row: usize) -> Result<(), LightTableError> {
        dispatch!(self, c => c.set_null(row))
    }

    pub fn has_nulls(&self) -> bool {
        dispatch!(self, c => c.has_nulls())
    }

    pub fn nulls_count(&self) -> usize {
        dispatch!(self, c => c.nulls_count())
    }

    pub fn has_null_bitmap(&self) -> bool {
        dispatch!(self, c => c.has_null_bitmap())
    }

    pub fn optimize_nulls(&mut self) -> bool {
        dispatch!(self, c => c.optimize_nulls())
    }

    //==============================================================================
    // 5. Aggregates
    //==============================================================================

    /// Computes an aggregate over the non-null rows.
    ///
    /// Non-numeric columns return `Value::Null` for every kind.
    pub fn aggregate(&self, kind: AggregateKind) -> Value {
        match self {
            Column::Int16(c) => c.aggregate(kind),
            Column::Int32(c) => c.aggregate(kind),
            Column::Int64(c) => c.aggregate(kind),
            Column::UInt8(c) => c.aggregate(kind),
            Column::Float64(c) => c.aggregate(kind),
            Column::Decimal(c) => c.aggregate(kind),
            Column::Boolean(_)
            | Column::DateTime(_)
            | Column::Guid(_)
            | Column::String(_)
            | Column::Binary(_) => Value::Null,
        }
    }

    /// Parses `kind` and computes the aggregate.
    ///
    /// # Errors
    /// `UnsupportedAggregate` for any name other than sum/mean/min/max.
    pub fn aggregate_by_name(&self, kind: &str) -> Result<Value, LightTableError> {
        let kind: AggregateKind = kind.parse()?;
        Ok(self.aggregate(kind))
    }
}

#[cfg(test)]
mod tests;
