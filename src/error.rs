// In: src/error.rs

//! This module defines the single, unified error type for the entire lighttable library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Every failure is reported synchronously at the offending call. Nothing in the
//! crate retries or falls back on its own; the caller decides recovery.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LightTableError {
    // =========================================================================
    // === Semantic Errors (Table, Column and Aggregate contracts)
    // =========================================================================
    /// A declared column type has no matching column implementation.
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// A typed accessor asked for a type the cell does not hold, or the cell is null.
    #[error("Invalid cast: expected {expected}, found {found}")]
    InvalidCast { expected: String, found: String },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Destination buffer too small: {required} slots required, {available} available")]
    InsufficientBuffer { required: usize, available: usize },

    #[error("Unsupported aggregate: {0}")]
    UnsupportedAggregate(String),

    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    #[error("Column ordinal {ordinal} out of bounds (table has {column_count} columns)")]
    ColumnOutOfBounds { ordinal: usize, column_count: usize },

    #[error("Row {row} out of bounds (table has {row_count} rows)")]
    RowOutOfBounds { row: usize, row_count: usize },

    /// The import source disagrees with the declared schema (length, ordinal or buffer type).
    #[error("Schema mismatch during import: {0}")]
    SchemaMismatch(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a `TableConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // bytemuck::PodCastError doesn't impl Error
}

impl LightTableError {
    /// Shorthand used by every typed accessor.
    pub(crate) fn invalid_cast(expected: impl ToString, found: impl ToString) -> Self {
        LightTableError::InvalidCast {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for LightTableError {
    fn from(err: bytemuck::PodCastError) -> Self {
        LightTableError::PodCast(err.to_string())
    }
}
