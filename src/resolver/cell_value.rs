use std::fmt;

use serde_json::Value;

use crate::query::QueryError;

/// Error value written into a cell in place of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellError {
    Value,
    Ref,
    Name,
    NotAvailable,
    Num,
}

impl CellError {
    pub fn code(&self) -> &'static str {
        match self {
            CellError::Value => "#VALUE!",
            CellError::Ref => "#REF!",
            CellError::Name => "#NAME?",
            CellError::NotAvailable => "#N/A",
            CellError::Num => "#NUM!",
        }
    }
}

impl From<&QueryError> for CellError {
    fn from(value: &QueryError) -> Self {
        match value {
            QueryError::Structural(_) => CellError::Value,
            QueryError::ParameterResolution(_) => CellError::Ref,
            QueryError::ConnectionResolution(_) => CellError::Name,
            QueryError::Execution(_) => CellError::NotAvailable,
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Scalar content of a spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    Error(CellError),
}

impl CellValue {
    pub fn text(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Convert an executor result. A single-column row object yields its
    /// only value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Empty,
            Value::Bool(b) => CellValue::Bool(*b),
            Value::Number(n) => n.as_f64()
                .map(CellValue::Number)
                .unwrap_or(CellValue::Error(CellError::Num)),
            Value::String(s) => CellValue::Text(s.clone()),
            Value::Object(map) if map.len() == 1 => map.values()
                .next()
                .map(CellValue::from_json)
                .unwrap_or_default(),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    /// Text substituted for a `{P}i` placeholder.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(text) => write!(f, "{}", text),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
            CellValue::Error(error) => write!(f, "{}", error),
        }
    }
}
