use std::fmt;

use crate::query::QueryError;

/// Comparison applied by an active filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Between,
    Like,
    In,
}

impl Operator {
    pub fn code(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Between => "BETWEEN",
            Operator::Like => "LIKE",
            Operator::In => "IN",
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "=" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::LtEq),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::GtEq),
            "BETWEEN" => Ok(Operator::Between),
            "LIKE" => Ok(Operator::Like),
            "IN" => Ok(Operator::In),
            _ => Err(QueryError::structural(format!("invalid operator: '{}'", value))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Whether a filter contributes a predicate. Inactive filters are kept so
/// the editing state survives, but never reach the WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterState {
    Inactive,
    Active(Operator),
}

impl FilterState {
    pub const INACTIVE_CODE: &'static str = "-";

    pub fn code(&self) -> &'static str {
        match self {
            FilterState::Inactive => Self::INACTIVE_CODE,
            FilterState::Active(op) => op.code(),
        }
    }

    pub fn operator(&self) -> Option<Operator> {
        match self {
            FilterState::Inactive => None,
            FilterState::Active(op) => Some(*op),
        }
    }
}

impl TryFrom<&str> for FilterState {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim() == Self::INACTIVE_CODE {
            return Ok(FilterState::Inactive);
        }
        Operator::try_from(value).map(FilterState::Active)
    }
}
