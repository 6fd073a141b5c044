pub mod type_tag;
pub use type_tag::*;

pub mod aggregate;
pub use aggregate::*;

pub mod node;
pub use node::*;

pub mod table_schema;
pub use table_schema::*;

pub mod join_path;
pub use join_path::*;

pub mod schema_catalog;
pub use schema_catalog::*;

/// Schema metadata collaborator: table definitions, join text and the
/// default application connection key of a table.
pub trait SchemaProvider {
    fn table_schema(&self, table: &str) -> Option<TableSchema>;

    /// Join-path text declared for `table`, if any.
    fn lookup_join(&self, table: &str) -> Option<String>;

    fn lookup_default_connection_key(&self, database: &str, table: &str) -> Option<String>;
}
