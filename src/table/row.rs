//! Row cursors: a table reference plus a fixed row index.
//!
//! Rows own no data. Every accessor forwards to the table at the row's index, so
//! `row.field::<T>(c)` and `table.field::<T>(row.index(), c)` are the same call.

use std::iter::FusedIterator;

use crate::error::LightTableError;
use crate::table::{ColumnRef, Table};
use crate::types::{FromValue, Value};

/// A read-only cursor over one row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn new(table: &'a Table, index: usize) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn get<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Value, LightTableError> {
        self.table.get(column, self.index)
    }

    pub fn field<'c, T: FromValue>(
        &self,
        column: impl Into<ColumnRef<'c>>,
    ) -> Result<T, LightTableError> {
        self.table.field(self.index, column)
    }

    /// All cells of the row in ordinal order.
    pub fn values(&self) -> Result<Vec<Value>, LightTableError> {
        (0..self.table.column_count())
            .map(|ordinal| self.get(ordinal))
            .collect()
    }
}

/// A read-write cursor over one row.
#[derive(Debug)]
pub struct RowMut<'a> {
    table: &'a mut Table,
    index: usize,
}

impl<'a> RowMut<'a> {
    pub(crate) fn new(table: &'a mut Table, index: usize) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get<'c>(&self, column: impl Into<ColumnRef<'c>>) -> Result<Value, LightTableError> {
        self.table.get(column, self.index)
    }

    pub fn field<'c, T: FromValue>(
        &self,
        column: impl Into<ColumnRef<'c>>,
    ) -> Result<T, LightTableError> {
        self.table.field(self.index, column)
    }

    pub fn set<'c>(
        &mut self,
        column: impl Into<ColumnRef<'c>>,
        value: impl Into<Value>,
    ) -> Result<(), LightTableError> {
        self.table.set(column, self.index, value)
    }

    pub fn as_row(&self) -> Row<'_> {
        Row::new(self.table, self.index)
    }
}

/// Iterator over every row of a table, in order.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    table: &'a Table,
    next: usize,
    end: usize,
}

impl<'a> Rows<'a> {
    pub(crate) fn new(table: &'a Table) -> Self {
        Self {
            table,
            next: 0,
            end: table.row_count(),
        }
    }
}

impl<'a> Iterator for Rows<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Row<'a>> {
        if self.next >= self.end {
            return None;
        }
        let row = Row::new(self.table, self.next);
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Rows<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(Row::new(self.table, self.end))
    }
}

impl ExactSizeIterator for Rows<'_> {}

impl FusedIterator for Rows<'_> {}
