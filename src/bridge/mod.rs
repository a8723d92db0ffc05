// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the boundary between an external tabular source and the table's
// private column storage. The table never reaches into a source; a source describes
// itself and hands its buffers over through the `ImportAdapter` contract.
//
// Data Flow (Import):
//
//   1. [ImportAdapter]            -> table_name, row_count, schema()
//         |
//         `-> column_specs(): one `ColumnSpec` per declared column, in ordinal order
//
//   2. [Table, phase one]         -> resolves every `declared_type`, checks ordinals
//         |                          (fails fast, nothing materialized yet)
//         |
//   3. [Table, phase two]         -> runs each `ImportSource`
//         |
//         `-> a. `Buffer`: the source already holds an `ExportedColumn`
//         |
//         `-> b. `Deferred`: calls `export_column_buffer(ordinal)` now
//         |
//   4. [Column::from_buffer]      -> moves the buffer in, one bulk transfer per column
//
// Sources with bulk access (`RecordBatchAdapter`) export whole buffers. Sources that
// only expose cells are wrapped in `CellCopyAdapter`, which runs the per-cell loop
// on the adapter side so the table's contract stays bulk-only.
//
// ====================================================================================
pub mod arrow_impl;
mod buffer;
pub mod cell_adapter;

pub use arrow_impl::RecordBatchAdapter;
pub use buffer::{ColumnBuffer, ExportedColumn};
pub use cell_adapter::{CellCopyAdapter, CellSource};

use std::fmt;

use crate::error::LightTableError;

//==================================================================================
// 1. Column Descriptors
//==================================================================================

/// What a source declares about one column, before any data moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    /// Free-form type name, resolved by `DataType::from_type_name`.
    pub declared_type: String,
    pub ordinal: usize,
    pub nullable: bool,
}

impl ColumnSchema {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        ordinal: usize,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            ordinal,
            nullable,
        }
    }

    /// Attaches the data source for this column.
    pub fn with_source<'a>(self, import_source: ImportSource<'a>) -> ColumnSpec<'a> {
        ColumnSpec {
            name: self.name,
            declared_type: self.declared_type,
            ordinal: self.ordinal,
            nullable: self.nullable,
            import_source,
        }
    }
}

/// Where a column's data comes from during phase two of table construction.
pub enum ImportSource<'a> {
    /// The buffer was already exported.
    Buffer(ExportedColumn),
    /// Bulk extraction that runs only once the whole schema has been accepted.
    Deferred(Box<dyn FnOnce() -> Result<ExportedColumn, LightTableError> + 'a>),
}

impl ImportSource<'_> {
    pub(crate) fn export(self) -> Result<ExportedColumn, LightTableError> {
        match self {
            ImportSource::Buffer(exported) => Ok(exported),
            ImportSource::Deferred(export) => export(),
        }
    }
}

impl fmt::Debug for ImportSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportSource::Buffer(exported) => f
                .debug_struct("Buffer")
                .field("data_type", &exported.buffer.data_type())
                .field("len", &exported.buffer.len())
                .finish(),
            ImportSource::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// A complete column descriptor as consumed by `Table::new`.
#[derive(Debug)]
pub struct ColumnSpec<'a> {
    pub name: String,
    pub declared_type: String,
    pub ordinal: usize,
    pub nullable: bool,
    pub import_source: ImportSource<'a>,
}

impl<'a> ColumnSpec<'a> {
    pub fn new(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        ordinal: usize,
        nullable: bool,
        import_source: ImportSource<'a>,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            ordinal,
            nullable,
            import_source,
        }
    }

    /// A nullable column whose declared type is taken from its buffer.
    pub fn from_buffer(
        name: impl Into<String>,
        ordinal: usize,
        buffer: impl Into<ColumnBuffer>,
        nulls: Option<bitvec::vec::BitVec>,
    ) -> Self {
        let buffer = buffer.into();
        let declared_type = buffer.data_type().name();
        Self::new(
            name,
            declared_type,
            ordinal,
            true,
            ImportSource::Buffer(ExportedColumn::new(buffer, nulls)),
        )
    }
}

//==================================================================================
// 2. The Source Contract
//==================================================================================

/// Bulk-export capability a tabular source offers to table construction.
///
/// The source must stay unmodified while a table is being imported from it.
pub trait ImportAdapter {
    fn table_name(&self) -> &str;

    fn row_count(&self) -> usize;

    /// The declared columns in ordinal order.
    fn schema(&self) -> Vec<ColumnSchema>;

    /// Hands over one column's buffer and null bitmap.
    ///
    /// Called at most once per column, and only after every declared type was
    /// accepted. Implementations trust their own typing and do not re-check cells.
    fn export_column_buffer(&self, ordinal: usize) -> Result<ExportedColumn, LightTableError>;

    /// One deferred spec per declared column.
    fn column_specs(&self) -> Vec<ColumnSpec<'_>> {
        self.schema()
            .into_iter()
            .map(|schema| {
                let ordinal = schema.ordinal;
                let export: Box<dyn FnOnce() -> Result<ExportedColumn, LightTableError> + '_> =
                    Box::new(move || self.export_column_buffer(ordinal));
                schema.with_source(ImportSource::Deferred(export))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests;
