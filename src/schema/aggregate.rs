use std::fmt;

use serde::{Deserialize, Serialize};

use crate::query::QueryError;

/// Aggregate applied to a selected field. `None` is the empty code.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Aggregate {
    #[default]
    None,
    Sum,
    Count,
    Avg,
    Max,
    Min,
}

impl Aggregate {
    pub fn code(&self) -> &'static str {
        match self {
            Aggregate::None => "",
            Aggregate::Sum => "SUM",
            Aggregate::Count => "COUNT",
            Aggregate::Avg => "AVG",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Aggregate::None
    }

    /// Wrap a SQL expression in this aggregate.
    pub fn apply(&self, expr: &str) -> String {
        match self {
            Aggregate::None => expr.to_string(),
            other => format!("{}({})", other.code(), expr),
        }
    }
}

impl TryFrom<&str> for Aggregate {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "" => Ok(Aggregate::None),
            "SUM" => Ok(Aggregate::Sum),
            "COUNT" => Ok(Aggregate::Count),
            "AVG" => Ok(Aggregate::Avg),
            "MAX" => Ok(Aggregate::Max),
            "MIN" => Ok(Aggregate::Min),
            _ => Err(QueryError::structural(format!("invalid aggregate: '{}'", value))),
        }
    }
}

impl TryFrom<String> for Aggregate {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Aggregate::try_from(value.as_str())
    }
}

impl From<Aggregate> for String {
    fn from(value: Aggregate) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_wraps_expression() {
        assert_eq!(Aggregate::Sum.apply("AMOUNT"), "SUM(AMOUNT)");
        assert_eq!(Aggregate::None.apply("AMOUNT"), "AMOUNT");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Aggregate::try_from("avg").unwrap(), Aggregate::Avg);
        assert_eq!(Aggregate::try_from("").unwrap(), Aggregate::None);
        assert!(Aggregate::try_from("MEDIAN").is_err());
    }
}
