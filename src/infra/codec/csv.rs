use anyhow::{bail, Context, Result};

use crate::domain::entities::table::{Column, Row, Table};
use crate::domain::entities::value::CellValue;
use crate::infra::codec::infer_data_type;

/// RFC 4180 reader. The first record is the header; short records are filled
/// with nulls and extra fields are dropped. Empty fields ingest as null.
pub fn read_table(text: &str) -> Result<Table> {
    read_table_with(text, true)
}

/// Strict variant used when probing files of unknown extension: ragged field
/// counts are parse errors here, so non-CSV content falls through to the JSON
/// parser instead of producing a garbage table.
pub fn read_table_strict(text: &str) -> Result<Table> {
    read_table_with(text, false)
}

fn read_table_with(text: &str, flexible: bool) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(flexible)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("failed to read csv header")?.clone();
    let names: Vec<String> = headers.iter().map(|name| name.trim().to_string()).collect();
    if names.is_empty() || names.iter().all(|name| name.is_empty()) {
        bail!("csv header is required");
    }
    for (idx, name) in names.iter().enumerate() {
        if names[..idx].contains(name) {
            bail!("duplicate column name: {name}");
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse csv record")?;
        let mut row = Row::default();
        for (idx, name) in names.iter().enumerate() {
            let raw = record.get(idx).unwrap_or("").trim();
            let value = if raw.is_empty() {
                CellValue::Null
            } else {
                CellValue::Str(raw.to_string())
            };
            row.set(name, value);
        }
        rows.push(row);
    }

    let columns = names
        .iter()
        .map(|name| {
            let values: Vec<CellValue> = rows.iter().map(|row| row.get(name)).collect();
            Column::new(name.clone(), infer_data_type(values.iter()))
        })
        .collect();

    Ok(Table::new(columns, rows))
}

/// Serializes in display order with a header row, quoting only fields that
/// need it. Nulls become empty fields.
pub fn write_table(table: &Table) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(table.columns.iter().map(|column| column.name.as_str()))
        .context("failed to write csv header")?;
    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| row.get(&column.name).display())
            .collect();
        writer
            .write_record(&record)
            .context("failed to write csv record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow::anyhow!("failed to flush csv writer: {err}"))?;
    String::from_utf8(bytes).context("csv output should be utf-8")
}
