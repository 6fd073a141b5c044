use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// Storage classification of a field. Drives both value rendering in SQL and
/// the coercion applied to filter bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeTag {
    /// Plain number
    Numeric,
    /// Calendar date, rendered as ISO `yyyy-MM-dd`
    Date,
    /// Date packed into a number, `yyyyMMdd`
    SunDateNumeric,
    /// Accounting period packed into a number, `yyyy` + 3-digit period
    SunPeriodNumeric,
    /// Join anchor, never selectable or filterable
    SubTable,
    /// Free text
    #[default]
    Text,
}

impl TypeTag {
    pub fn code(&self) -> &'static str {
        match self {
            TypeTag::Numeric => "N",
            TypeTag::Date => "D",
            TypeTag::SunDateNumeric => "SD",
            TypeTag::SunPeriodNumeric => "SP",
            TypeTag::SubTable => "ST",
            TypeTag::Text => "T",
        }
    }

    /// Date, Sun-date and Sun-period fields accept the `C` (current) sentinel.
    pub fn is_date_like(&self) -> bool {
        matches!(self, TypeTag::Date | TypeTag::SunDateNumeric | TypeTag::SunPeriodNumeric)
    }

    /// Values of these types are emitted without quotes.
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Numeric | TypeTag::SunDateNumeric | TypeTag::SunPeriodNumeric)
    }
}

impl TryFrom<&str> for TypeTag {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "N" | "NUMERIC" => Ok(TypeTag::Numeric),
            "D" | "DATE" => Ok(TypeTag::Date),
            "SD" | "SUNDATENUMERIC" => Ok(TypeTag::SunDateNumeric),
            "SP" | "SUNPERIODNUMERIC" => Ok(TypeTag::SunPeriodNumeric),
            "ST" | "SUBTABLE" => Ok(TypeTag::SubTable),
            "T" | "TEXT" | "" => Ok(TypeTag::Text),
            _ => Err(QueryError::structural(format!("invalid type tag: '{}'", value))),
        }
    }
}

impl TryFrom<String> for TypeTag {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TypeTag::try_from(value.as_str())
    }
}

impl From<TypeTag> for String {
    fn from(value: TypeTag) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_codes() {
        assert_eq!(TypeTag::try_from("N").unwrap(), TypeTag::Numeric);
        assert_eq!(TypeTag::try_from("sunPeriodNumeric").unwrap(), TypeTag::SunPeriodNumeric);
        assert_eq!(TypeTag::try_from(" sd ").unwrap(), TypeTag::SunDateNumeric);
        assert_eq!(TypeTag::try_from("").unwrap(), TypeTag::Text);
    }

    #[test]
    fn rejects_unknown_code() {
        match TypeTag::try_from("X") {
            Err(QueryError::Structural(message)) => assert!(message.contains("'X'")),
            _ => panic!(),
        }
    }

    #[test]
    fn classification() {
        assert!(TypeTag::Date.is_date_like());
        assert!(!TypeTag::Date.is_numeric());
        assert!(TypeTag::SunPeriodNumeric.is_date_like());
        assert!(TypeTag::SunPeriodNumeric.is_numeric());
        assert!(!TypeTag::Text.is_date_like());
    }
}
