// In: src/table/mod.rs

//! The snapshot table: a fixed set of typed columns sharing one row count.
//!
//! A `Table` is built atomically from one import pass and never changes shape
//! afterward; only cell values stay mutable. Construction runs in two phases so an
//! unsupported declared type is reported before any column buffer is exported or
//! moved.

pub mod collection;
pub mod row;

pub use collection::ColumnCollection;
pub use row::{Row, RowMut, Rows};

use std::sync::Arc;

use crate::bridge::{ColumnSpec, ImportAdapter};
use crate::column::{AggregateKind, Column, ColumnMeta};
use crate::config::TableConfig;
use crate::error::LightTableError;
use crate::types::{DataType, FromValue, Value};

//==================================================================================
// 1. Column References
//==================================================================================

/// Addresses a column either by ordinal or by name (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Ordinal(usize),
    Name(&'a str),
}

impl From<usize> for ColumnRef<'_> {
    fn from(ordinal: usize) -> Self {
        ColumnRef::Ordinal(ordinal)
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnRef<'a> {
    fn from(name: &'a String) -> Self {
        ColumnRef::Name(name.as_str())
    }
}

//==================================================================================
// 2. The Table
//==================================================================================

#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    row_count: usize,
    columns: ColumnCollection,
    config: Arc<TableConfig>,
}

impl Table {
    /// Builds a table from explicit column specs with the default config.
    pub fn new(
        name: impl Into<String>,
        row_count: usize,
        specs: Vec<ColumnSpec<'_>>,
    ) -> Result<Self, LightTableError> {
        Self::with_config(name, row_count, specs, Arc::new(TableConfig::default()))
    }

    /// Builds a table from explicit column specs.
    ///
    /// # Errors
    /// * `UnsupportedType` if any declared type is unknown. No column is
    ///   materialized and no deferred export runs in that case.
    /// * `SchemaMismatch` if a spec's ordinal differs from its position, or an
    ///   exported buffer disagrees with the declared type or the row count.
    /// * Whatever a deferred export itself fails with.
    pub fn with_config(
        name: impl Into<String>,
        row_count: usize,
        specs: Vec<ColumnSpec<'_>>,
        config: Arc<TableConfig>,
    ) -> Result<Self, LightTableError> {
        let name = name.into();

        // --- Phase one: resolve the whole schema before touching any data ---
        let mut resolved = Vec::with_capacity(specs.len());
        for (position, spec) in specs.into_iter().enumerate() {
            let data_type = DataType::from_type_name(&spec.declared_type)?;
            if spec.ordinal != position {
                return Err(LightTableError::SchemaMismatch(format!(
                    "column '{}' declares ordinal {} at position {}",
                    spec.name, spec.ordinal, position
                )));
            }
            resolved.push((data_type, spec));
        }

        // --- Phase two: one bulk transfer per column ---
        let mut columns = Vec::with_capacity(resolved.len());
        for (data_type, spec) in resolved {
            let ColumnSpec {
                name: column_name,
                ordinal,
                nullable,
                import_source,
                ..
            } = spec;
            let exported = import_source.export()?;

            if exported.buffer.data_type() != data_type {
                return Err(LightTableError::SchemaMismatch(format!(
                    "column '{}' is declared {} but exported a {} buffer",
                    column_name,
                    data_type,
                    exported.buffer.data_type()
                )));
            }
            if exported.buffer.len() != row_count {
                return Err(LightTableError::SchemaMismatch(format!(
                    "column '{}' exported {} rows, table has {}",
                    column_name,
                    exported.buffer.len(),
                    row_count
                )));
            }

            let meta = ColumnMeta {
                name: column_name,
                ordinal,
                nullable,
            };
            let column = Column::from_buffer(
                meta,
                exported.buffer,
                exported.nulls,
                config.collapse_empty_null_bitmaps,
            )?;

            log::debug!(
                "Imported column '{}' ({}) with {} nulls",
                column.name(),
                data_type,
                column.nulls_count()
            );
            log_metric!(
                "event" = "import_column",
                "table" = &name,
                "column" = column.name(),
                "type" = &data_type,
                "bitmap" = &column.has_null_bitmap()
            );
            columns.push(column);
        }

        let table = Self {
            name,
            row_count,
            columns: ColumnCollection::from_columns(columns),
            config,
        };
        table.log_summary();
        Ok(table)
    }

    /// Imports a whole table from a source.
    pub fn import<A: ImportAdapter + ?Sized>(adapter: &A) -> Result<Self, LightTableError> {
        Self::import_with_config(adapter, Arc::new(TableConfig::default()))
    }

    pub fn import_with_config<A: ImportAdapter + ?Sized>(
        adapter: &A,
        config: Arc<TableConfig>,
    ) -> Result<Self, LightTableError> {
        Self::with_config(
            adapter.table_name(),
            adapter.row_count(),
            adapter.column_specs(),
            config,
        )
    }

    fn log_summary(&self) {
        let bitmaps = self.columns.iter().filter(|c| c.has_null_bitmap()).count();
        if self.config.log_import_summary {
            log::info!(
                "Imported table '{}': {} rows, {} columns, {} null bitmaps retained",
                self.name,
                self.row_count,
                self.columns.len(),
                bitmaps
            );
        } else {
            log::debug!(
                "Imported table '{}' ({} rows, {} columns)",
                self.name,
                self.row_count,
                self.columns.len()
            );
        }
    }

    //==============================================================================
    // 2.1 Shape
    //==============================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &ColumnCollection {
        &self.columns
    }

    pub fn config(&self) -> &Arc<TableConfig> {
        &self.config
    }

    pub fn column<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<&Column, LightTableError> {
        match column.into() {
            ColumnRef::Ordinal(ordinal) => {
                self.columns
                    .get(ordinal)
                    .ok_or(LightTableError::ColumnOutOfBounds {
                        ordinal,
                        column_count: self.columns.len(),
                    })
            }
            ColumnRef::Name(name) => self
                .columns
                .by_name(name)
                .ok_or_else(|| LightTableError::ColumnNotFound(name.to_string())),
        }
    }

    pub fn column_mut<'c>(
        &mut self,
        column: impl Into<ColumnRef<'c>>,
    ) -> Result<&mut Column, LightTableError> {
        let column_count = self.columns.len();
        match column.into() {
            ColumnRef::Ordinal(ordinal) => {
                self.columns
                    .get_mut(ordinal)
                    .ok_or(LightTableError::ColumnOutOfBounds {
                        ordinal,
                        column_count,
                    })
            }
            ColumnRef::Name(name) => self
                .columns
                .by_name_mut(name)
                .ok_or_else(|| LightTableError::ColumnNotFound(name.to_string())),
        }
    }

    //==============================================================================
    // 2.2 Cell Access
    //==============================================================================

    pub fn get<'c>(
        &self,
        column: impl Into<ColumnRef<'c>>,
        row: usize,
    ) -> Result<Value, LightTableError> {
        self.column(column)?.get(row)
    }

    /// Writes a cell. `Value::Null` (or `None`) marks the row null.
    pub fn set<'c>(
        &mut self,
        column: impl Into<ColumnRef<'c>>,
        row: usize,
        value: impl Into<Value>,
    ) -> Result<(), LightTableError> {
        self.column_mut(column)?.set(row, value.into())
    }

    /// Reads a cell as `T`.
    ///
    /// # Errors
    /// `InvalidCast` if the cell holds another type, or is null and `T` is not an
    /// `Option`.
    pub fn field<'c, T: FromValue>(
        &self,
        row: usize,
        column: impl Into<ColumnRef<'c>>,
    ) -> Result<T, LightTableError> {
        T::from_value(self.get(column, row)?)
    }

    //==============================================================================
    // 2.3 Rows
    //==============================================================================

    fn check_row(&self, index: usize) -> Result<(), LightTableError> {
        if index < self.row_count {
            Ok(())
        } else {
            Err(LightTableError::RowOutOfBounds {
                row: index,
                row_count: self.row_count,
            })
        }
    }

    pub fn row(&self, index: usize) -> Result<Row<'_>, LightTableError> {
        self.check_row(index)?;
        Ok(Row::new(self, index))
    }

    pub fn row_mut(&mut self, index: usize) -> Result<RowMut<'_>, LightTableError> {
        self.check_row(index)?;
        Ok(RowMut::new(self, index))
    }

    pub fn rows(&self) -> Rows<'_> {
        Rows::new(self)
    }

    //==============================================================================
    // 2.4 Aggregates and Maintenance
    //==============================================================================

    pub fn aggregate<'c>(
        &self,
        column: impl Into<ColumnRef<'c>>,
        kind: AggregateKind,
    ) -> Result<Value, LightTableError> {
        Ok(self.column(column)?.aggregate(kind))
    }

    /// Drops every null bitmap that no longer marks any row, returning how many
    /// were released.
    pub fn optimize_null_bitmaps(&mut self) -> usize {
        let released = self
            .columns
            .iter_mut()
            .map(|column| column.optimize_nulls())
            .filter(|&released| released)
            .count();
        log::trace!("Released {} null bitmaps in '{}'", released, self.name);
        released
    }
}
