use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::debug;

use crate::{
    connection::{ConnectionResolver, QueryExecutor},
    query::{Filter, QueryError, QueryResult, SqlGenerator},
    schema::{Node, SchemaProvider},
};

/// Whether generated SQL is row-level or forced to aggregate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProcessingMode {
    #[default]
    Details,
    /// GROUP BY semantics even without explicit aggregates; report formulas
    /// always want a single scalar row.
    Balance,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Scalar(Value),
    Table(Vec<Value>),
}

/// Declarative description of one query: target table, selected fields in
/// display order, filters in UI order and the connection it runs on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlBuilder {
    pub database: String,
    pub table: String,
    pub selected_nodes: Vec<Node>,
    pub filters: Vec<Filter>,
    pub connection_key: Option<String>,
    pub resolved_connection_string: Option<String>,
    pub processing_mode: ProcessingMode,
}

impl SqlBuilder {
    pub fn new(database: &str, table: &str) -> Self {
        Self {
            database: database.to_string(),
            table: table.to_string(),
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.processing_mode = mode;
        self
    }

    pub fn with_connection_key(mut self, key: &str) -> Self {
        self.connection_key = Some(key.to_string());
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.selected_nodes.push(node);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn select(&mut self, node: Node) {
        self.selected_nodes.push(node);
    }

    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
    }

    pub fn has_aggregates(&self) -> bool {
        self.selected_nodes.iter().any(Node::is_aggregated)
    }

    pub fn needs_group_by(&self) -> bool {
        self.processing_mode == ProcessingMode::Balance || self.has_aggregates()
    }

    /// Non-aggregated selected nodes, in selection order.
    pub fn group_by_nodes(&self) -> Vec<&Node> {
        self.selected_nodes.iter().filter(|node| !node.is_aggregated()).collect()
    }

    /// Match a report-template column header against the selection.
    pub fn node_by_description(&self, description: &str) -> Option<&Node> {
        let description = description.trim();
        self.selected_nodes.iter().find(|node| node.description().eq_ignore_ascii_case(description))
    }

    pub fn filter_for(&self, code: &str) -> Option<&Filter> {
        self.filters.iter().find(|filter| filter.node.code().eq_ignore_ascii_case(code))
    }

    pub fn same_table(&self, other: &SqlBuilder) -> bool {
        self.table.trim().eq_ignore_ascii_case(other.table.trim())
    }

    pub fn normalize_filters_at(&mut self, today: NaiveDate) -> QueryResult<()> {
        for filter in self.filters.iter_mut() {
            filter.normalize_at(today)?;
        }
        Ok(())
    }

    pub fn normalize_filters(&mut self) -> QueryResult<()> {
        self.normalize_filters_at(Local::now().date_naive())
    }

    pub fn build(&self, schema: &dyn SchemaProvider) -> QueryResult<String> {
        self.build_at(schema, Local::now().date_naive())
    }

    pub fn build_at(&self, schema: &dyn SchemaProvider, today: NaiveDate) -> QueryResult<String> {
        SqlGenerator::render(self, schema, today)
    }

    /// Resolve the application connection string this query runs on.
    pub fn resolve_connection(
        &mut self,
        schema: &dyn SchemaProvider,
        connections: &dyn ConnectionResolver,
    ) -> QueryResult<String> {
        self.resolve_connection_or(schema, connections, None)
    }

    /// Like [`SqlBuilder::resolve_connection`], trying `fallback_key` when
    /// neither the builder nor the schema names a key.
    pub fn resolve_connection_or(
        &mut self,
        schema: &dyn SchemaProvider,
        connections: &dyn ConnectionResolver,
        fallback_key: Option<&str>,
    ) -> QueryResult<String> {
        if self.table.trim().is_empty() {
            return QueryError::structural("query has no table").err();
        }

        let key = self.connection_key.clone()
            .or_else(|| schema.lookup_default_connection_key(&self.database, &self.table))
            .or_else(|| fallback_key.map(str::to_string))
            .ok_or_else(|| QueryError::connection(format!("no connection key for table '{}'", self.table)))?;

        let connection_string = connections.application_connection(&key)
            .ok_or_else(|| QueryError::connection(format!("connection key '{}' is not configured", key)))?;

        self.connection_key = Some(key);
        self.resolved_connection_string = Some(connection_string.clone());
        Ok(connection_string)
    }

    fn prepare(
        &mut self,
        schema: &dyn SchemaProvider,
        connections: &dyn ConnectionResolver,
    ) -> QueryResult<(String, String)> {
        let sql = self.build(schema)?;
        let connection_string = self.resolve_connection(schema, connections)?;
        debug!(table = %self.table, sql = %sql, "executing query");
        Ok((sql, connection_string))
    }

    pub fn execute_scalar(
        &mut self,
        schema: &dyn SchemaProvider,
        connections: &dyn ConnectionResolver,
        executor: &dyn QueryExecutor,
    ) -> QueryResult<Value> {
        let (sql, connection_string) = self.prepare(schema, connections)?;
        executor.execute_scalar(&sql, &connection_string)
            .map_err(|e| QueryError::execution(e.to_string()))
    }

    pub fn execute_table(
        &mut self,
        schema: &dyn SchemaProvider,
        connections: &dyn ConnectionResolver,
        executor: &dyn QueryExecutor,
    ) -> QueryResult<Vec<Value>> {
        let (sql, connection_string) = self.prepare(schema, connections)?;
        executor.execute_table(&sql, &connection_string)
            .map_err(|e| QueryError::execution(e.to_string()))
    }

    /// Scalar for `Balance`, rows for `Details`.
    pub fn execute(
        &mut self,
        schema: &dyn SchemaProvider,
        connections: &dyn ConnectionResolver,
        executor: &dyn QueryExecutor,
    ) -> QueryResult<QueryOutput> {
        match self.processing_mode {
            ProcessingMode::Balance => self.execute_scalar(schema, connections, executor).map(QueryOutput::Scalar),
            ProcessingMode::Details => self.execute_table(schema, connections, executor).map(QueryOutput::Table),
        }
    }
}
