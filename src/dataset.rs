//! In-memory table model shared by the loader, normalizer and insight views.

use serde::Serialize;

use crate::{
    data::{Cell, ColumnType},
    error::ShapeError,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            column_type,
            cells,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }

    pub fn non_null_count(&self) -> usize {
        self.len() - self.null_count()
    }
}

/// Ordered named columns of equal length plus a per-row index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    pub fn try_new(columns: Vec<Column>, index: Vec<usize>) -> Result<Self, ShapeError> {
        let expected = index.len();
        for column in &columns {
            if column.len() != expected {
                return Err(ShapeError::RaggedColumn {
                    column: column.name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, index })
    }

    /// Builds a table whose index is the dense sequence `0..row_count`.
    pub fn with_dense_index(columns: Vec<Column>) -> Result<Self, ShapeError> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        Self::try_new(columns, (0..rows).collect())
    }

    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            index: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, position: usize) -> Option<Vec<&Cell>> {
        if position >= self.row_count() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|column| &column.cells[position])
                .collect(),
        )
    }

    pub fn text_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns
            .iter()
            .filter(|column| column.column_type == ColumnType::Text)
    }

    pub(crate) fn rename_columns<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = String>,
    {
        for (column, name) in self.columns.iter_mut().zip(names) {
            column.name = name;
        }
    }

    /// Replaces the row index with the dense sequence `0..row_count`.
    pub fn reset_index(&mut self) {
        self.index = (0..self.index.len()).collect();
    }
}
