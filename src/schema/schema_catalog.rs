use indexmap::IndexMap;

use crate::{query::{QueryError, QueryResult}, schema::{SchemaProvider, TableSchema}};

/// In-memory schema metadata keyed by upper-cased table name, kept in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaCatalog {
    tables: IndexMap<String, TableSchema>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON array of table definitions.
    pub fn from_json(text: &str) -> QueryResult<Self> {
        let tables: Vec<TableSchema> = serde_json::from_str(text)
            .map_err(|e| QueryError::structural(format!("invalid schema metadata: {e}")))?;

        let mut catalog = Self::new();
        for table in tables {
            catalog.add_table(table);
        }
        Ok(catalog)
    }

    pub fn add_table(&mut self, table: TableSchema) {
        self.tables.insert(table.name.to_ascii_uppercase(), table);
    }

    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.add_table(table);
        self
    }

    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.tables.get(&table.trim().to_ascii_uppercase())
    }

    pub fn get_mut(&mut self, table: &str) -> Option<&mut TableSchema> {
        self.tables.get_mut(&table.trim().to_ascii_uppercase())
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.values().map(|t| t.name.clone()).collect()
    }

    /// Record join text for a table, creating an empty table entry if needed.
    pub fn set_join(&mut self, table: &str, join: &str) {
        self.entry(table).join = if join.trim().is_empty() { None } else { Some(join.to_string()) };
    }

    /// Record the default application connection key for a table.
    pub fn set_connection_key(&mut self, table: &str, key: &str) {
        self.entry(table).connection_key = if key.trim().is_empty() { None } else { Some(key.trim().to_string()) };
    }

    fn entry(&mut self, table: &str) -> &mut TableSchema {
        let name = table.trim();
        self.tables
            .entry(name.to_ascii_uppercase())
            .or_insert_with(|| TableSchema::new(name))
    }
}

impl SchemaProvider for SchemaCatalog {
    fn table_schema(&self, table: &str) -> Option<TableSchema> {
        self.get(table).cloned()
    }

    fn lookup_join(&self, table: &str) -> Option<String> {
        self.get(table).and_then(|t| t.join.clone())
    }

    fn lookup_default_connection_key(&self, database: &str, table: &str) -> Option<String> {
        let schema = self.get(table)?;
        if !database.is_empty() && !schema.database.is_empty() && !schema.database.eq_ignore_ascii_case(database) {
            return None;
        }
        schema.connection_key.clone()
    }
}
