//! Null-encoding strategies.
//!
//! Most element types track nullness out of band in a `NullBitmap`. Element types
//! that already have an "absent" value (an unset reference) encode nullness by
//! value identity instead and need no bitmap at all. Each element type picks its
//! strategy through `ColumnElement::Nulls`.

use bitvec::vec::BitVec;
use std::fmt::Debug;

use crate::error::LightTableError;
use crate::null_handling::bitmap::NullBitmap;

/// How a column records and answers nullness for its backing buffer `[T]`.
pub trait NullStrategy<T>: Debug + Clone + Sized {
    /// Builds the null state for a freshly imported buffer.
    ///
    /// `nulls` is the source's bitmap (set bit = null row), already length-checked.
    /// When `collapse_empty` is true, a bitmap without any set bit is discarded.
    fn from_import(
        values: &mut [T],
        nulls: Option<BitVec>,
        collapse_empty: bool,
    ) -> Result<Self, LightTableError>;

    fn is_null(&self, values: &[T], row: usize) -> bool;

    /// Records the nullness of `row`. The caller has already written the slot's value.
    fn set_null(&mut self, values: &mut [T], row: usize, is_null: bool)
        -> Result<(), LightTableError>;

    fn nulls_count(&self, values: &[T]) -> usize;

    fn has_nulls(&self, values: &[T]) -> bool {
        self.nulls_count(values) > 0
    }

    /// Returns `true` if out-of-band null storage is currently allocated.
    fn is_materialized(&self) -> bool;

    /// Releases out-of-band storage that is provably unnecessary.
    fn optimize(&mut self) -> bool;
}

/// An element type with a distinguished "absent" value.
pub trait Sentinel {
    fn absent() -> Self;
    fn is_absent(&self) -> bool;
}

impl<T> Sentinel for Option<T> {
    fn absent() -> Self {
        None
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

//==================================================================================
// 1. Bitmap Strategy
//==================================================================================

/// Nullness tracked in a lazily allocated `NullBitmap`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitmapNulls {
    bitmap: NullBitmap,
}

impl BitmapNulls {
    pub fn bitmap(&self) -> &NullBitmap {
        &self.bitmap
    }
}

impl<T> NullStrategy<T> for BitmapNulls {
    fn from_import(
        values: &mut [T],
        nulls: Option<BitVec>,
        collapse_empty: bool,
    ) -> Result<Self, LightTableError> {
        let bitmap = match nulls {
            None => NullBitmap::new(values.len()),
            Some(bits) => {
                let mut bitmap = NullBitmap::from_bits(bits, values.len())?;
                if collapse_empty && bitmap.optimize() {
                    log::trace!(
                        "Released empty null bitmap covering {} rows",
                        values.len()
                    );
                }
                bitmap
            }
        };
        Ok(Self { bitmap })
    }

    #[inline]
    fn is_null(&self, _values: &[T], row: usize) -> bool {
        self.bitmap.is_null(row)
    }

    fn set_null(
        &mut self,
        _values: &mut [T],
        row: usize,
        is_null: bool,
    ) -> Result<(), LightTableError> {
        self.bitmap.set_null(row, is_null)
    }

    fn nulls_count(&self, _values: &[T]) -> usize {
        self.bitmap.null_count()
    }

    fn has_nulls(&self, _values: &[T]) -> bool {
        self.bitmap.has_nulls()
    }

    fn is_materialized(&self) -> bool {
        self.bitmap.is_materialized()
    }

    fn optimize(&mut self) -> bool {
        self.bitmap.optimize()
    }
}

//==================================================================================
// 2. Sentinel Strategy
//==================================================================================

/// Nullness encoded by value identity: a row is null exactly when it holds the
/// element type's absent value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentinelNulls;

impl<T: Sentinel> NullStrategy<T> for SentinelNulls {
    fn from_import(
        values: &mut [T],
        nulls: Option<BitVec>,
        _collapse_empty: bool,
    ) -> Result<Self, LightTableError> {
        if let Some(bits) = nulls {
            if bits.len() != values.len() {
                return Err(LightTableError::SchemaMismatch(format!(
                    "Null bitmap covers {} rows, table has {}",
                    bits.len(),
                    values.len()
                )));
            }
            for row in bits.iter_ones() {
                values[row] = T::absent();
            }
        }
        Ok(SentinelNulls)
    }

    #[inline]
    fn is_null(&self, values: &[T], row: usize) -> bool {
        values.get(row).map(Sentinel::is_absent).unwrap_or(false)
    }

    fn set_null(
        &mut self,
        values: &mut [T],
        row: usize,
        is_null: bool,
    ) -> Result<(), LightTableError> {
        let row_count = values.len();
        if row_count == 0 && is_null {
            return Err(LightTableError::InvalidOperation(
                "Table doesn't contain rows".to_string(),
            ));
        }
        let slot = values
            .get_mut(row)
            .ok_or(LightTableError::RowOutOfBounds { row, row_count })?;
        // A present value is its own "not null" mark; only nulling writes.
        if is_null {
            *slot = T::absent();
        }
        Ok(())
    }

    fn nulls_count(&self, values: &[T]) -> usize {
        values.iter().filter(|v| v.is_absent()).count()
    }

    fn has_nulls(&self, values: &[T]) -> bool {
        values.iter().any(Sentinel::is_absent)
    }

    fn is_materialized(&self) -> bool {
        false
    }

    fn optimize(&mut self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::prelude::*;

    #[test]
    fn test_bitmap_strategy_collapses_empty_import() {
        let mut values = vec![1i32, 2, 3];
        let nulls = bitvec![0; 3];
        let strategy =
            <BitmapNulls as NullStrategy<i32>>::from_import(&mut values[..], Some(nulls), true)
                .unwrap();
        assert!(!NullStrategy::<i32>::is_materialized(&strategy));
        assert_eq!(strategy.nulls_count(&values[..]), 0);
    }

    #[test]
    fn test_bitmap_strategy_keeps_empty_import_when_asked() {
        let mut values = vec![1i32, 2, 3];
        let nulls = bitvec![0; 3];
        let strategy =
            <BitmapNulls as NullStrategy<i32>>::from_import(&mut values[..], Some(nulls), false)
                .unwrap();
        assert!(NullStrategy::<i32>::is_materialized(&strategy));
        assert!(!strategy.has_nulls(&values[..]));
    }

    #[test]
    fn test_sentinel_strategy_applies_imported_bitmap() {
        let mut values = vec![Some(vec![1u8]), Some(vec![2u8]), Some(vec![3u8])];
        let nulls = bitvec![0, 1, 0];
        let strategy = SentinelNulls::from_import(&mut values[..], Some(nulls), true).unwrap();
        assert_eq!(values[1], None);
        assert!(strategy.is_null(&values[..], 1));
        assert_eq!(strategy.nulls_count(&values[..]), 1);
    }

    #[test]
    fn test_sentinel_strategy_set_null_writes_absent() {
        let mut values = vec![Some(vec![9u8]), None];
        let mut strategy = SentinelNulls;
        strategy.set_null(&mut values[..], 0, true).unwrap();
        assert_eq!(values, vec![None, None]);
        assert!(strategy.has_nulls(&values[..]));
        assert!(matches!(
            strategy.set_null(&mut values[..], 5, true),
            Err(LightTableError::RowOutOfBounds { row: 5, row_count: 2 })
        ));
    }

    #[test]
    fn test_sentinel_strategy_rejects_null_write_without_rows() {
        let mut values: Vec<Option<Vec<u8>>> = Vec::new();
        let mut strategy = SentinelNulls;
        assert!(matches!(
            strategy.set_null(&mut values[..], 0, true),
            Err(LightTableError::InvalidOperation(_))
        ));
        assert!(matches!(
            strategy.set_null(&mut values[..], 0, false),
            Err(LightTableError::RowOutOfBounds { row: 0, row_count: 0 })
        ));
    }
}
