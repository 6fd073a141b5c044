use serde_json::Value;

/// Error raised by a database driver.
pub type ExecutorError = Box<dyn std::error::Error + Send + Sync>;

/// SQL execution collaborator. Rows are JSON objects keyed by column alias.
pub trait QueryExecutor {
    /// First column of the first row, `Value::Null` when there is no row.
    fn execute_scalar(&self, sql: &str, connection_string: &str) -> Result<Value, ExecutorError>;

    fn execute_table(&self, sql: &str, connection_string: &str) -> Result<Vec<Value>, ExecutorError>;
}
