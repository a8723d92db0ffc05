// --- IN: src/null_handling/bitmap.rs ---

//! The lazy null-tracking bitmap.
//!
//! A `NullBitmap` is either absent (no row is null) or one bit per row, where a
//! set bit means "this row is null". Absence is the common case and costs nothing;
//! the bit-vector is only allocated the first time a row is actually marked null.

use bitvec::prelude::*;

use crate::error::LightTableError;

/// Per-row nullness for a single column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullBitmap {
    /// `None` means "no row is null". When present, `bits.len() == row_count`.
    bits: Option<BitVec>,
    row_count: usize,
}

impl NullBitmap {
    /// Creates an absent bitmap covering `row_count` rows.
    pub fn new(row_count: usize) -> Self {
        Self {
            bits: None,
            row_count,
        }
    }

    /// Adopts an existing bitmap, as exported by an import source.
    ///
    /// # Errors
    /// Returns `LightTableError::SchemaMismatch` if the bitmap does not cover
    /// exactly `row_count` rows.
    pub fn from_bits(bits: BitVec, row_count: usize) -> Result<Self, LightTableError> {
        if bits.len() != row_count {
            return Err(LightTableError::SchemaMismatch(format!(
                "Null bitmap covers {} rows, table has {}",
                bits.len(),
                row_count
            )));
        }
        Ok(Self {
            bits: Some(bits),
            row_count,
        })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns `false` when the bitmap is absent, otherwise the stored bit.
    #[inline]
    pub fn is_null(&self, row: usize) -> bool {
        match &self.bits {
            None => false,
            Some(bits) => bits.get(row).map(|bit| *bit).unwrap_or(false),
        }
    }

    /// Records the nullness of `row`, allocating the bitmap on first need.
    ///
    /// # Errors
    /// * `InvalidOperation` if the bitmap is absent and there are no rows to size it by.
    /// * `RowOutOfBounds` if `row >= row_count`.
    pub fn set_null(&mut self, row: usize, is_null: bool) -> Result<(), LightTableError> {
        if self.bits.is_none() && self.row_count == 0 {
            return Err(LightTableError::InvalidOperation(
                "Table doesn't contain rows".to_string(),
            ));
        }
        if row >= self.row_count {
            return Err(LightTableError::RowOutOfBounds {
                row,
                row_count: self.row_count,
            });
        }

        match &mut self.bits {
            Some(bits) => bits.set(row, is_null),
            // Clearing a row of an absent bitmap changes nothing observable.
            None if !is_null => {}
            None => {
                let mut bits = bitvec![0; self.row_count];
                bits.set(row, true);
                self.bits = Some(bits);
            }
        }
        Ok(())
    }

    pub fn null_count(&self) -> usize {
        self.bits.as_ref().map(|bits| bits.count_ones()).unwrap_or(0)
    }

    pub fn has_nulls(&self) -> bool {
        self.bits.as_ref().map(|bits| bits.any()).unwrap_or(false)
    }

    /// Returns `true` if a bit-vector is currently allocated.
    pub fn is_materialized(&self) -> bool {
        self.bits.is_some()
    }

    /// Heap bytes held by the bit-vector (zero when absent).
    pub fn retained_bytes(&self) -> usize {
        self.bits
            .as_ref()
            .map(|bits| std::mem::size_of_val(bits.as_raw_slice()))
            .unwrap_or(0)
    }

    /// Discards a materialized bitmap that has no bit set.
    ///
    /// One linear scan; returns `true` if the bitmap was released.
    pub fn optimize(&mut self) -> bool {
        let releasable = matches!(&self.bits, Some(bits) if bits.not_any());
        if releasable {
            self.bits = None;
        }
        releasable
    }

    /// Iterates the nullness of every row in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.row_count).map(move |row| self.is_null(row))
    }
}
