// In: src/bridge/cell_adapter.rs

//! Per-cell fallback for sources that cannot hand out their internal buffers.
//!
//! `CellCopyAdapter` turns any `CellSource` into an `ImportAdapter` by reading
//! every cell of a column through the source's ordinary accessor and assembling
//! the typed buffer itself. The loop is O(rows) per column like the bulk path,
//! just with a per-cell conversion in it.

use bitvec::vec::BitVec;

use crate::bridge::{ColumnBuffer, ColumnSchema, ExportedColumn, ImportAdapter};
use crate::error::LightTableError;
use crate::traits::ColumnElement;
use crate::types::{DataType, Value};

/// A tabular source that only offers cell-by-cell reads.
pub trait CellSource {
    fn name(&self) -> &str;

    fn row_count(&self) -> usize;

    fn schema(&self) -> Vec<ColumnSchema>;

    /// Reads one cell. `Value::Null` marks a null cell.
    fn cell(&self, row: usize, ordinal: usize) -> Result<Value, LightTableError>;
}

/// Adapts a `CellSource` to the bulk `ImportAdapter` contract.
#[derive(Debug, Clone)]
pub struct CellCopyAdapter<S: CellSource> {
    source: S,
    schema: Vec<ColumnSchema>,
}

impl<S: CellSource> CellCopyAdapter<S> {
    pub fn new(source: S) -> Self {
        let schema = source.schema();
        Self { source, schema }
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn copy_cells<T>(&self, ordinal: usize) -> Result<ExportedColumn, LightTableError>
    where
        T: ColumnElement,
        ColumnBuffer: From<Vec<T>>,
    {
        let row_count = self.source.row_count();
        let mut values = Vec::with_capacity(row_count);
        let mut nulls = BitVec::with_capacity(row_count);

        for row in 0..row_count {
            match self.source.cell(row, ordinal)? {
                Value::Null => {
                    values.push(T::default_value());
                    nulls.push(true);
                }
                value => {
                    values.push(T::try_from_value(value)?);
                    nulls.push(false);
                }
            }
        }

        Ok(ExportedColumn::new(ColumnBuffer::from(values), Some(nulls)))
    }
}

impl<S: CellSource> ImportAdapter for CellCopyAdapter<S> {
    fn table_name(&self) -> &str {
        self.source.name()
    }

    fn row_count(&self) -> usize {
        self.source.row_count()
    }

    fn schema(&self) -> Vec<ColumnSchema> {
        self.schema.clone()
    }

    fn export_column_buffer(&self, ordinal: usize) -> Result<ExportedColumn, LightTableError> {
        let column = self
            .schema
            .iter()
            .find(|c| c.ordinal == ordinal)
            .ok_or(LightTableError::ColumnOutOfBounds {
                ordinal,
                column_count: self.schema.len(),
            })?;

        match DataType::from_type_name(&column.declared_type)? {
            DataType::Int16 => self.copy_cells::<i16>(ordinal),
            DataType::Int32 => self.copy_cells::<i32>(ordinal),
            DataType::Int64 => self.copy_cells::<i64>(ordinal),
            DataType::UInt8 => self.copy_cells::<u8>(ordinal),
            DataType::Float64 => self.copy_cells::<f64>(ordinal),
            DataType::Decimal => self.copy_cells::<bigdecimal::BigDecimal>(ordinal),
            DataType::Boolean => self.copy_cells::<bool>(ordinal),
            DataType::DateTime => self.copy_cells::<chrono::NaiveDateTime>(ordinal),
            DataType::Guid => self.copy_cells::<uuid::Uuid>(ordinal),
            DataType::String => self.copy_cells::<String>(ordinal),
            DataType::Binary => self.copy_cells::<Option<Vec<u8>>>(ordinal),
        }
    }
}
