use thiserror::Error;

use crate::parser::ParseError;

/// Failure taxonomy shared by the SQL generator, the formula parser and the
/// recalculation resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed formula text, missing table, unresolvable join metadata.
    /// Always raised before any connection is opened.
    #[error("structural error: {0}")]
    Structural(String),

    /// A referenced parameter cell is out of range, empty or of an unexpected type.
    #[error("parameter resolution error: {0}")]
    ParameterResolution(String),

    /// No connection key mapping exists for the target table.
    #[error("connection resolution error: {0}")]
    ConnectionResolution(String),

    /// The underlying query executor failed.
    #[error("execution error: {0}")]
    Execution(String),
}

impl QueryError {
    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural(message.into())
    }

    pub fn parameter(message: impl Into<String>) -> Self {
        Self::ParameterResolution(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::ConnectionResolution(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn err<T>(self) -> Result<T, QueryError> {
        Err(self)
    }
}

impl From<ParseError> for QueryError {
    fn from(value: ParseError) -> Self {
        QueryError::Structural(value.to_string())
    }
}

pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_kind() {
        assert_eq!(
            QueryError::structural("missing table").to_string(),
            "structural error: missing table"
        );
        assert_eq!(
            QueryError::connection("no key for SALES").to_string(),
            "connection resolution error: no key for SALES"
        );
    }
}
