use std::collections::HashMap;

use crate::domain::entities::value::{CellValue, DataType};

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub is_enriching: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_enriching: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<String, CellValue>,
}

impl Row {
    pub fn empty(columns: &[Column]) -> Self {
        let mut row = Row::default();
        for column in columns {
            row.set(&column.name, CellValue::Null);
        }
        row
    }

    pub fn get(&self, column: &str) -> CellValue {
        self.values.get(column).cloned().unwrap_or(CellValue::Null)
    }

    pub fn set(&mut self, column: &str, value: CellValue) {
        self.values.insert(column.to_string(), value);
    }

    fn remove(&mut self, column: &str) {
        self.values.remove(column);
    }

    fn rename(&mut self, old: &str, new: &str) {
        let value = self.values.remove(old).unwrap_or(CellValue::Null);
        self.values.insert(new.to_string(), value);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    RowOutOfRange { index: usize, row_count: usize },
    UnknownColumn(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::RowOutOfRange { index, row_count } => {
                write!(f, "row index {index} is out of range ({row_count} rows)")
            }
            GridError::UnknownColumn(name) => write!(f, "unknown column: {name}"),
        }
    }
}

impl std::error::Error for GridError {}

/// The single in-memory table a session edits. Mutation operations return a
/// new value so observers never see a partially applied change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    pub fn with_column(&self, name: &str, data_type: DataType) -> Table {
        let name = name.trim();
        if name.is_empty() || self.column(name).is_some() {
            return self.clone();
        }
        let mut next = self.clone();
        next.columns.push(Column::new(name, data_type));
        for row in &mut next.rows {
            row.set(name, CellValue::Null);
        }
        next
    }

    pub fn without_column(&self, name: &str) -> Table {
        let mut next = self.clone();
        next.columns.retain(|column| column.name != name);
        for row in &mut next.rows {
            row.remove(name);
        }
        next
    }

    pub fn with_renamed_column(&self, old: &str, new: &str) -> Table {
        let new = new.trim();
        if new.is_empty() || new == old || self.column(new).is_some() || self.column(old).is_none()
        {
            return self.clone();
        }
        let mut next = self.clone();
        for column in &mut next.columns {
            if column.name == old {
                column.name = new.to_string();
            }
        }
        for row in &mut next.rows {
            row.rename(old, new);
        }
        next
    }

    pub fn with_row(&self) -> Table {
        let mut next = self.clone();
        next.rows.push(Row::empty(&next.columns));
        next
    }

    pub fn without_row(&self, index: usize) -> Result<Table, GridError> {
        if index >= self.rows.len() {
            return Err(GridError::RowOutOfRange {
                index,
                row_count: self.rows.len(),
            });
        }
        let mut next = self.clone();
        next.rows.remove(index);
        Ok(next)
    }

    pub fn with_cell(&self, index: usize, column: &str, raw: &str) -> Result<Table, GridError> {
        if self.column(column).is_none() {
            return Err(GridError::UnknownColumn(column.to_string()));
        }
        if index >= self.rows.len() {
            return Err(GridError::RowOutOfRange {
                index,
                row_count: self.rows.len(),
            });
        }
        let mut next = self.clone();
        next.rows[index].set(column, CellValue::Str(raw.to_string()));
        Ok(next)
    }

    pub fn with_enriching(&self, name: &str, enriching: bool) -> Table {
        let mut next = self.clone();
        for column in &mut next.columns {
            if column.name == name {
                column.is_enriching = enriching;
            }
        }
        next
    }

    /// Columns holding at least one non-blank value; these are the key-column
    /// candidates when starting an enrichment.
    pub fn populated_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| self.rows.iter().any(|row| !row.get(&column.name).is_blank()))
            .map(|column| column.name.clone())
            .collect()
    }

    /// Columns with no values at all; only these can be enrichment targets.
    pub fn empty_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| self.rows.iter().all(|row| row.get(&column.name).is_blank()))
            .map(|column| column.name.clone())
            .collect()
    }
}
