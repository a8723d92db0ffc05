//! This file is the root of the `lighttable` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`table`, `column`,
//!     `bridge`, etc.) so the Rust compiler knows they exist.
//! 2.  Re-exporting the types most callers need, so that
//!     `use lighttable::{Table, Value}` is enough for everyday use.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod column;
pub mod config;
pub mod error;
pub mod null_handling;
pub mod table;
pub mod traits;
pub mod types;
pub mod utils;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use bridge::{
    CellCopyAdapter, CellSource, ColumnBuffer, ColumnSchema, ColumnSpec, ExportedColumn,
    ImportAdapter, ImportSource, RecordBatchAdapter,
};
pub use column::{AggregateKind, Column, ColumnMeta, TypedColumn};
pub use config::TableConfig;
pub use error::LightTableError;
pub use null_handling::NullBitmap;
pub use table::{ColumnCollection, ColumnRef, Row, RowMut, Rows, Table};
pub use traits::{ColumnElement, NumericElement};
pub use types::{DataType, FromValue, Value};
