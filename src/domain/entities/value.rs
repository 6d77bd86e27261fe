use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    String,
    Number,
    Boolean,
    Date,
}

impl DataType {
    pub fn wire_name(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
        }
    }
}

/// Tagged cell value. Cell edits always store the raw string; the declared
/// column type only drives coercion of enrichment results and rendering.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Str(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Str(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Str(text) => text.clone(),
            CellValue::Number(value) => format_number(*value),
            CellValue::Bool(value) => value.to_string(),
        }
    }

    pub fn from_json(value: &Value) -> Option<CellValue> {
        match value {
            Value::Null => Some(CellValue::Null),
            Value::String(text) => Some(CellValue::Str(text.clone())),
            Value::Number(number) => number.as_f64().map(CellValue::Number),
            Value::Bool(flag) => Some(CellValue::Bool(*flag)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Best-effort coercion toward a declared column type. A value that does
    /// not parse as the declared type keeps its string form instead of being
    /// dropped.
    pub fn coerced_to(self, data_type: DataType) -> CellValue {
        if matches!(self, CellValue::Null) {
            return CellValue::Null;
        }
        match data_type {
            DataType::Number => match &self {
                CellValue::Number(_) => self,
                CellValue::Str(text) => match text.trim().parse::<f64>() {
                    Ok(value) => CellValue::Number(value),
                    Err(_) => self,
                },
                other => CellValue::Str(other.display()),
            },
            DataType::Boolean => match &self {
                CellValue::Bool(_) => self,
                CellValue::Str(text) => match text.trim().to_ascii_lowercase().as_str() {
                    "true" => CellValue::Bool(true),
                    "false" => CellValue::Bool(false),
                    _ => self,
                },
                other => CellValue::Str(other.display()),
            },
            DataType::String | DataType::Date => match self {
                CellValue::Str(_) => self,
                other => CellValue::Str(other.display()),
            },
        }
    }
}

fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        let mut text = format!("{value:.6}");
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
        text
    }
}
