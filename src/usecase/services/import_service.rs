use std::path::Path;

use tracing::debug;

use crate::domain::entities::table::Table;
use crate::infra::codec::{csv, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    Unreadable(String),
    Csv(String),
    Json(String),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Unreadable(message) => write!(f, "failed to read file: {message}"),
            ImportError::Csv(message) => write!(f, "invalid csv: {message}"),
            ImportError::Json(message) => write!(f, "invalid json: {message}"),
        }
    }
}

impl std::error::Error for ImportError {}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFile {
    pub table: Table,
    pub file_name: String,
}

/// File ingestion policy: `.csv` parses as CSV, `.json` as JSON, and any
/// other extension tries CSV first and falls back to JSON.
pub struct ImportService;

impl ImportService {
    pub fn new() -> Self {
        Self
    }

    pub fn import_path(&self, path: &Path) -> Result<ImportedFile, ImportError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ImportError::Unreadable(err.to_string()))?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("data")
            .to_string();
        self.import_text(&file_name, &text)
    }

    pub fn import_text(&self, file_name: &str, text: &str) -> Result<ImportedFile, ImportError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let table = match extension.as_str() {
            "csv" => csv::read_table(text).map_err(|err| ImportError::Csv(err.to_string()))?,
            "json" => json::read_table(text).map_err(|err| ImportError::Json(err.to_string()))?,
            _ => match csv::read_table_strict(text) {
                Ok(table) => table,
                Err(csv_err) => {
                    debug!(file_name, %csv_err, "csv parse failed, trying json");
                    json::read_table(text).map_err(|err| ImportError::Json(err.to_string()))?
                }
            },
        };

        debug!(
            file_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "imported file"
        );
        Ok(ImportedFile {
            table,
            file_name: file_name.to_string(),
        })
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}
