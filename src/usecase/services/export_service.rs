use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::entities::table::Table;
use crate::infra::codec::csv;

pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    pub fn export_csv(&self, table: &Table) -> Result<String> {
        csv::write_table(table)
    }

    pub fn write_to(&self, table: &Table, path: &Path) -> Result<()> {
        let text = self.export_csv(table)?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write export: {}", path.display()))?;
        debug!(path = %path.display(), rows = table.row_count(), "exported table");
        Ok(())
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

/// `enriched-<stem>.csv`, falling back to `enriched-data.csv` when no file
/// was ever loaded.
pub fn default_export_name(file_name: Option<&str>) -> String {
    let stem = file_name
        .map(Path::new)
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("data");
    format!("enriched-{stem}.csv")
}
