use serde_json::Value;
use tracing::{debug, info};

use crate::{
    config::ResolverConfig,
    connection::{ConnectionResolver, QueryExecutor},
    query::{QueryError, QueryResult},
    schema::SchemaCatalog,
};

/// Reads join text and default connection keys from the query-designer
/// metadata database (builder role) into a [`SchemaCatalog`].
pub struct MetadataLoader;

impl MetadataLoader {
    pub fn query(config: &ResolverConfig) -> String {
        format!("SELECT TABLE_NAME, JOIN_TEXT, CONNECTION_KEY FROM {}", config.metadata_table)
    }

    /// Returns the number of tables updated.
    pub fn load(
        catalog: &mut SchemaCatalog,
        connections: &dyn ConnectionResolver,
        executor: &dyn QueryExecutor,
        config: &ResolverConfig,
    ) -> QueryResult<usize> {
        let key = &config.metadata_connection_key;
        let connection_string = connections.builder_connection(key)
            .ok_or_else(|| QueryError::connection(format!("metadata connection key '{}' is not configured", key)))?;

        let rows = executor.execute_table(&Self::query(config), &connection_string)
            .map_err(|e| QueryError::execution(e.to_string()))?;

        let mut loaded = 0;
        for row in &rows {
            let table = Self::text(row, "TABLE_NAME")
                .ok_or_else(|| QueryError::structural(format!("metadata row without TABLE_NAME: {row}")))?;

            if let Some(join) = Self::text(row, "JOIN_TEXT") {
                catalog.set_join(&table, &join);
            }
            if let Some(connection_key) = Self::text(row, "CONNECTION_KEY") {
                catalog.set_connection_key(&table, &connection_key);
            }
            debug!(table = %table, "loaded table metadata");
            loaded += 1;
        }

        info!(tables = loaded, source = %config.metadata_table, "schema metadata loaded");
        Ok(loaded)
    }

    fn text(row: &Value, column: &str) -> Option<String> {
        let object = row.as_object()?;
        let value = object.iter().find(|(k, _)| k.eq_ignore_ascii_case(column)).map(|(_, v)| v)?;
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}
