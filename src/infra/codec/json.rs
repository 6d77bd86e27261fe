use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::domain::entities::table::{Column, Row, Table};
use crate::domain::entities::value::CellValue;
use crate::infra::codec::infer_data_type;

/// Accepts an array of flat objects, or a single object wrapped into a
/// one-element array. Columns come from the first element's keys in document
/// order; keys other elements add are dropped.
pub fn read_table(text: &str) -> Result<Table> {
    let parsed: Value = serde_json::from_str(text).context("failed to parse json")?;
    let objects: Vec<Map<String, Value>> = match parsed {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => bail!("expected an array of objects, found {}", kind_of(&other)),
            })
            .collect::<Result<_>>()?,
        Value::Object(map) => vec![map],
        other => bail!("expected a json object or array, found {}", kind_of(&other)),
    };

    let names: Vec<String> = objects
        .first()
        .map(|object| object.keys().cloned().collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for object in &objects {
        let mut row = Row::default();
        for name in &names {
            let value = match object.get(name) {
                Some(value) => CellValue::from_json(value).with_context(|| {
                    format!("column {name} holds a nested value; expected flat objects")
                })?,
                None => CellValue::Null,
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

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
