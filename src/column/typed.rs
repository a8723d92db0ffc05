//! `TypedColumn<T>`: the single generic storage unit behind every column variant.
//!
//! It owns a `Vec<T>` of exactly `row_count` elements plus the null state chosen by
//! `T::Nulls`, and offers two access surfaces:
//!
//! * the untyped facade (`get`/`set` over `Value`), which translates the logical
//!   null to and from the element's default value plus a null mark;
//! * the typed fast path (`get_typed`/`set_typed`/`values`), which never boxes and
//!   never looks at the null mark on reads.

use bitvec::vec::BitVec;

use crate::error::LightTableError;
use crate::null_handling::NullStrategy;
use crate::traits::ColumnElement;
use crate::types::Value;

/// Identity of a column within its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Zero-based position in the table, fixed for the column's lifetime.
    pub ordinal: usize,
    /// Whether the source declared the column as accepting nulls.
    pub nullable: bool,
}

/// A column whose backing buffer holds elements of type `T`.
#[derive(Debug, Clone)]
pub struct TypedColumn<T: ColumnElement> {
    meta: ColumnMeta,
    values: Vec<T>,
    nulls: T::Nulls,
}

impl<T: ColumnElement> TypedColumn<T> {
    /// Takes ownership of an imported buffer and its optional null bitmap.
    ///
    /// Slots of null rows are reset to the element default; sources may leave
    /// arbitrary bytes there.
    pub(crate) fn from_import(
        meta: ColumnMeta,
        mut values: Vec<T>,
        nulls: Option<BitVec>,
        collapse_empty_nulls: bool,
    ) -> Result<Self, LightTableError> {
        if let Some(bits) = &nulls {
            let len = values.len();
            for row in bits.iter_ones().take_while(|&row| row < len) {
                values[row] = T::default_value();
            }
        }
        let nulls = T::Nulls::from_import(&mut values, nulls, collapse_empty_nulls)?;
        Ok(Self {
            meta,
            values,
            nulls,
        })
    }

    pub fn meta(&self) -> &ColumnMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn ordinal(&self) -> usize {
        self.meta.ordinal
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    fn check_row(&self, row: usize) -> Result<(), LightTableError> {
        if row < self.values.len() {
            Ok(())
        } else {
            Err(LightTableError::RowOutOfBounds {
                row,
                row_count: self.values.len(),
            })
        }
    }

    //==============================================================================
    // 1. Untyped Facade
    //==============================================================================

    /// Reads a cell, yielding `Value::Null` for null rows.
    pub fn get(&self, row: usize) -> Result<Value, LightTableError> {
        self.check_row(row)?;
        if self.nulls.is_null(&self.values, row) {
            return Ok(Value::Null);
        }
        Ok(self.values[row].clone().into_value())
    }

    /// Writes a cell.
    ///
    /// `Value::Null` stores the element default and marks the row null; any other
    /// value must match `T` exactly and clears the null mark.
    pub fn set(&mut self, row: usize, value: Value) -> Result<(), LightTableError> {
        if value.is_null() {
            return self.set_null(row);
        }
        self.check_row(row)?;
        let element = T::try_from_value(value)?;
        self.values[row] = element;
        self.nulls.set_null(&mut self.values, row, false)
    }

    //==============================================================================
    // 2. Typed Fast Path
    //==============================================================================

    /// Reads the stored element without null translation.
    ///
    /// Null rows yield whatever the slot holds, which is `T::default_value()`
    /// unless it was overwritten through `set_typed`.
    #[inline]
    pub fn get_typed(&self, row: usize) -> Result<T, LightTableError> {
        self.check_row(row)?;
        Ok(self.values[row].clone())
    }

    /// Stores an element and clears the row's null mark.
    #[inline]
    pub fn set_typed(&mut self, row: usize, value: T) -> Result<(), LightTableError> {
        self.check_row(row)?;
        self.values[row] = value;
        self.nulls.set_null(&mut self.values, row, false)
    }

    /// The whole backing buffer, for hot loops that track nullness themselves.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterates rows as `Some(&value)` or `None` for null rows.
    pub fn iter(&self) -> impl Iterator<Item = Option<&T>> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(row, v)| (!self.nulls.is_null(&self.values, row)).then_some(v))
    }

    /// Bulk-copies the backing buffer into `destination[offset..offset + len]`.
    ///
    /// Null rows are copied as their stored default.
    ///
    /// # Errors
    /// Returns `InsufficientBuffer` if fewer than `len()` slots follow `offset`.
    pub fn copy_to(&self, destination: &mut [T], offset: usize) -> Result<(), LightTableError> {
        let available = destination.len().saturating_sub(offset);
        if available < self.values.len() {
            return Err(LightTableError::InsufficientBuffer {
                required: self.values.len(),
                available,
            });
        }
        destination[offset..offset + self.values.len()].clone_from_slice(&self.values);
        Ok(())
    }

    //==============================================================================
    // 3. Null Tracking
    //==============================================================================

    pub fn is_null(&self, row: usize) -> bool {
        self.nulls.is_null(&self.values, row)
    }

    /// Marks a row null and resets its slot to the element default.
    pub fn set_null(&mut self, row: usize) -> Result<(), LightTableError> {
        self.nulls.set_null(&mut self.values, row, true)?;
        self.values[row] = T::default_value();
        Ok(())
    }

    pub fn has_nulls(&self) -> bool {
        self.nulls.has_nulls(&self.values)
    }

    pub fn nulls_count(&self) -> usize {
        self.nulls.nulls_count(&self.values)
    }

    /// Returns `true` if the column currently holds an out-of-band null bitmap.
    pub fn has_null_bitmap(&self) -> bool {
        self.nulls.is_materialized()
    }

    /// Drops the null bitmap if no row is null any more.
    pub fn optimize_nulls(&mut self) -> bool {
        self.nulls.optimize()
    }
}
