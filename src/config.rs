use serde::{Deserialize, Serialize};

use crate::{connection::ConnectionRole, query::{QueryError, QueryResult}};

/// Settings of the recalculation resolver and the metadata loader.
///
/// - `metadata_connection_key`: builder-role key of the query-designer
///   metadata database.
/// - `application_connection_key`: application-role key tried when neither
///   the formula nor the schema names one. `None` disables the fallback.
/// - `metadata_table`: table listing join text and connection key per table.
/// - `cache_failures`: whether a failed cell is remembered for the rest of
///   the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub metadata_connection_key: String,
    pub application_connection_key: Option<String>,
    pub metadata_table: String,
    pub cache_failures: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            metadata_connection_key: ConnectionRole::Builder.code().to_string(),
            application_connection_key: Some(ConnectionRole::Application.code().to_string()),
            metadata_table: "QD_TABLES".to_string(),
            cache_failures: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> QueryResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| QueryError::structural(format!("invalid resolver config: {e}")))
    }

    pub fn without_fallback(mut self) -> Self {
        self.application_connection_key = None;
        self
    }

    pub fn with_metadata_table(mut self, table: &str) -> Self {
        self.metadata_table = table.to_string();
        self
    }

    pub fn with_cache_failures(mut self, cache_failures: bool) -> Self {
        self.cache_failures = cache_failures;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_role_codes() {
        let config = ResolverConfig::default();
        assert_eq!(config.metadata_connection_key, "QD");
        assert_eq!(config.application_connection_key.as_deref(), Some("AP"));
        assert!(config.cache_failures);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ResolverConfig::from_json(r#"{ "metadata_table": "DESIGNER_TABLES", "cache_failures": false }"#).unwrap();
        assert_eq!(config.metadata_table, "DESIGNER_TABLES");
        assert_eq!(config.metadata_connection_key, "QD");
        assert!(!config.cache_failures);
    }

    #[test]
    fn null_fallback_disables_it() {
        let config = ResolverConfig::from_json(r#"{ "application_connection_key": null }"#).unwrap();
        assert_eq!(config, ResolverConfig::new().without_fallback());
    }
}
