use crate::domain::entities::value::{CellValue, DataType};

/// Ingestion-time column type inference. The inferred type is advisory
/// metadata; cell storage is never converted to match it.
pub(crate) fn infer_data_type<'a>(values: impl Iterator<Item = &'a CellValue>) -> DataType {
    let mut saw_value = false;
    let mut all_numeric = true;
    let mut all_boolean = true;

    for value in values {
        if value.is_blank() {
            continue;
        }
        saw_value = true;
        match value {
            CellValue::Number(_) => {
                all_boolean = false;
            }
            CellValue::Bool(_) => {
                all_numeric = false;
            }
            CellValue::Str(text) => {
                let trimmed = text.trim();
                if trimmed.parse::<f64>().is_err() {
                    all_numeric = false;
                }
                if !matches!(trimmed.to_ascii_lowercase().as_str(), "true" | "false") {
                    all_boolean = false;
                }
            }
            CellValue::Null => {}
        }
        if !all_numeric && !all_boolean {
            break;
        }
    }

    if !saw_value {
        DataType::String
    } else if all_numeric {
        DataType::Number
    } else if all_boolean {
        DataType::Boolean
    } else {
        DataType::String
    }
}
