//! The ordered, name-indexed view over a table's columns.

use hashbrown::HashMap;
use std::ops::Index;

use crate::column::Column;

/// A table's columns in ordinal order.
///
/// Names need not be unique. Name lookups resolve to the first column, in ordinal
/// order, that carries the name.
#[derive(Debug, Clone, Default)]
pub struct ColumnCollection {
    columns: Vec<Column>,
    /// First ordinal for every name.
    index: HashMap<String, usize>,
}

impl ColumnCollection {
    pub(crate) fn from_columns(columns: Vec<Column>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (ordinal, column) in columns.iter().enumerate() {
            index.entry(column.name().to_string()).or_insert(ordinal);
        }
        Self { columns, index }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&Column> {
        self.columns.get(ordinal)
    }

    pub(crate) fn get_mut(&mut self, ordinal: usize) -> Option<&mut Column> {
        self.columns.get_mut(ordinal)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Column> {
        self.columns.iter_mut()
    }

    pub fn ordinal_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Column> {
        self.ordinal_of(name).map(|ordinal| &self.columns[ordinal])
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Column> {
        let ordinal = self.ordinal_of(name)?;
        self.columns.get_mut(ordinal)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(Column::name)
    }
}

impl Index<usize> for ColumnCollection {
    type Output = Column;

    fn index(&self, ordinal: usize) -> &Column {
        &self.columns[ordinal]
    }
}

impl<'a> IntoIterator for &'a ColumnCollection {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}
