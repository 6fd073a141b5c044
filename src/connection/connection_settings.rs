use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{connection::{ConnectionResolver, ConnectionRole}, query::{QueryError, QueryResult}};

/// Connection strings per role, keyed by connection key.
///
/// ```json
/// { "builder": { "QD": "Server=meta;..." },
///   "application": { "AP": "Server=erp;...", "SALESDB": "Server=sales;..." } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default)]
    pub builder: IndexMap<String, String>,
    #[serde(default)]
    pub application: IndexMap<String, String>,
}

impl ConnectionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> QueryResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| QueryError::connection(format!("invalid connection settings: {e}")))
    }

    pub fn with(mut self, role: ConnectionRole, key: &str, connection_string: &str) -> Self {
        self.insert(role, key, connection_string);
        self
    }

    pub fn insert(&mut self, role: ConnectionRole, key: &str, connection_string: &str) {
        self.map_mut(role).insert(key.trim().to_string(), connection_string.to_string());
    }

    fn map(&self, role: ConnectionRole) -> &IndexMap<String, String> {
        match role {
            ConnectionRole::Builder => &self.builder,
            ConnectionRole::Application => &self.application,
        }
    }

    fn map_mut(&mut self, role: ConnectionRole) -> &mut IndexMap<String, String> {
        match role {
            ConnectionRole::Builder => &mut self.builder,
            ConnectionRole::Application => &mut self.application,
        }
    }
}

impl ConnectionResolver for ConnectionSettings {
    fn resolve(&self, role: ConnectionRole, key: &str) -> Option<String> {
        let key = key.trim();
        self.map(role)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.clone())
    }
}
