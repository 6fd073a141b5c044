use serde::{Deserialize, Serialize};

use crate::schema::Node;

/// Schema metadata of one queryable table: its fields in declaration order,
/// the join text declared by the schema designer and the application
/// connection key the table lives behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub join: Option<String>,
    #[serde(default)]
    pub connection_key: Option<String>,
}

impl TableSchema {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), ..Default::default() }
    }

    pub fn with_database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn with_join(mut self, join: &str) -> Self {
        self.join = Some(join.to_string());
        self
    }

    pub fn with_connection_key(mut self, key: &str) -> Self {
        self.connection_key = Some(key.to_string());
        self
    }

    /// Case-insensitive lookup by node code.
    pub fn node(&self, code: &str) -> Option<&Node> {
        let code = code.trim();
        self.nodes.iter().find(|node| node.code().eq_ignore_ascii_case(code))
    }

    /// Aggregated nodes in declaration order; the default selection of a
    /// report formula.
    pub fn measures(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|node| node.is_aggregated() && !node.is_sub_table()).collect()
    }

    /// Nodes positional formula values bind to, in declaration order.
    pub fn parameter_nodes(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|node| !node.is_aggregated() && !node.is_sub_table()).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::schema::{Aggregate, TypeTag};

    use super::*;

    fn sales() -> TableSchema {
        TableSchema::new("SALES")
            .with_node(Node::column("CUST", TypeTag::SubTable))
            .with_node(Node::column("YEAR", TypeTag::Numeric))
            .with_node(Node::column("AMOUNT", TypeTag::Numeric).with_aggregate(Aggregate::Sum))
            .with_node(Node::column("REGION", TypeTag::Text))
    }

    #[test]
    fn node_lookup_ignores_case() {
        let table = sales();
        assert_eq!(table.node("year").map(Node::code), Some("YEAR"));
        assert!(table.node("MONTH").is_none());
    }

    #[test]
    fn measures_and_parameters_split_on_aggregate() {
        let table = sales();
        let measures: Vec<_> = table.measures().into_iter().map(Node::code).collect();
        let parameters: Vec<_> = table.parameter_nodes().into_iter().map(Node::code).collect();

        assert_eq!(measures, vec!["AMOUNT"]);
        assert_eq!(parameters, vec!["YEAR", "REGION"]);
    }
}
