use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::schema::{Aggregate, TypeTag};

/// Fixed-width slice of a packed text column.
/// `offset` is 0-based as stored in the schema metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubField {
    pub offset: usize,
    pub length: usize,
}

/// ORDER BY hint of a selected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub ordinal: u32,
    #[serde(default)]
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(ordinal: u32) -> Self {
        Self { ordinal, descending: false }
    }

    pub fn desc(ordinal: u32) -> Self {
        Self { ordinal, descending: true }
    }
}

/// One selectable/filterable field: a column, a slice of a packed column or
/// a user-defined computed expression.
///
/// Two nodes are equal when their `code` is equal, regardless of labels,
/// aggregates or sort hints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    code: String,
    qualified_code: String,
    description: String,
    type_tag: TypeTag,
    sub_field: Option<SubField>,
    aggregate: Aggregate,
    expression: String,
    sort: Option<SortSpec>,
}

impl Node {
    pub fn new(code: &str, description: &str, type_tag: TypeTag) -> Self {
        Self {
            code: code.to_string(),
            qualified_code: code.to_string(),
            description: description.to_string(),
            type_tag,
            sub_field: None,
            aggregate: Aggregate::None,
            expression: String::new(),
            sort: None,
        }
    }

    /// Node whose description equals its code.
    pub fn column(code: &str, type_tag: TypeTag) -> Self {
        Self::new(code, code, type_tag)
    }

    pub fn with_aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregate = aggregate;
        self
    }

    pub fn with_expression(mut self, expression: &str) -> Self {
        self.expression = expression.trim().to_string();
        self
    }

    pub fn with_sub_field(mut self, offset: usize, length: usize) -> Self {
        self.sub_field = Some(SubField { offset, length });
        self.qualified_code = format!("SUBSTRING({}, {}, {})", self.code, offset + 1, length);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn qualified_code(&self) -> &str {
        &self.qualified_code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn sub_field(&self) -> Option<SubField> {
        self.sub_field
    }

    pub fn aggregate(&self) -> Aggregate {
        self.aggregate
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    pub fn is_aggregated(&self) -> bool {
        !self.aggregate.is_none()
    }

    pub fn is_sub_table(&self) -> bool {
        self.type_tag == TypeTag::SubTable
    }

    /// Text used for this field everywhere in generated SQL.
    pub fn sql_expr(&self) -> &str {
        if self.expression.is_empty() {
            &self.qualified_code
        } else {
            &self.expression
        }
    }

    /// SELECT-list expression, aggregate applied.
    pub fn select_expr(&self) -> String {
        self.aggregate.apply(self.sql_expr())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// Serialized shape of a node in schema metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeRecord {
    code: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    type_tag: TypeTag,
    #[serde(default)]
    sub_field: Option<SubField>,
    #[serde(default)]
    aggregate: Aggregate,
    #[serde(default)]
    expression: String,
    #[serde(default)]
    sort: Option<SortSpec>,
}

impl From<NodeRecord> for Node {
    fn from(record: NodeRecord) -> Self {
        let description = record.description.unwrap_or_else(|| record.code.clone());
        let mut node = Node::new(&record.code, &description, record.type_tag)
            .with_aggregate(record.aggregate)
            .with_expression(&record.expression);
        if let Some(sub) = record.sub_field {
            node = node.with_sub_field(sub.offset, sub.length);
        }
        if let Some(sort) = record.sort {
            node = node.with_sort(sort);
        }
        node
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        NodeRecord {
            description: Some(node.description),
            code: node.code,
            type_tag: node.type_tag,
            sub_field: node.sub_field,
            aggregate: node.aggregate,
            expression: node.expression,
            sort: node.sort,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn equality_is_by_code() {
        let a = Node::new("AMOUNT", "Amount", TypeTag::Numeric);
        let b = Node::new("AMOUNT", "Net amount", TypeTag::Numeric).with_aggregate(Aggregate::Sum);
        let c = Node::new("YEAR", "Amount", TypeTag::Numeric);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<Node> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn sub_field_builds_substring() {
        let node = Node::new("ANAL_T0", "Region", TypeTag::Text).with_sub_field(4, 3);
        assert_eq!(node.code(), "ANAL_T0");
        assert_eq!(node.qualified_code(), "SUBSTRING(ANAL_T0, 5, 3)");
        assert_eq!(node.sql_expr(), "SUBSTRING(ANAL_T0, 5, 3)");
    }

    #[test]
    fn expression_overrides_qualified_code() {
        let node = Node::new("MARGIN", "Margin", TypeTag::Numeric)
            .with_expression(" AMOUNT - COST ")
            .with_aggregate(Aggregate::Sum);
        assert_eq!(node.sql_expr(), "AMOUNT - COST");
        assert_eq!(node.select_expr(), "SUM(AMOUNT - COST)");
    }

    #[test]
    fn deserializes_from_metadata_record() {
        let node: Node = serde_json::from_value(json!({
            "code": "PERIOD",
            "type": "SP",
            "sort": { "ordinal": 1 }
        })).unwrap();

        assert_eq!(node.description(), "PERIOD");
        assert_eq!(node.type_tag(), TypeTag::SunPeriodNumeric);
        assert_eq!(node.sort(), Some(SortSpec::asc(1)));
        assert!(!node.is_aggregated());
    }

    #[test]
    fn deserializes_sub_field_and_aggregate() {
        let node: Node = serde_json::from_value(json!({
            "code": "ANAL",
            "description": "Cost centre",
            "sub_field": { "offset": 0, "length": 4 },
            "aggregate": "count"
        })).unwrap();

        assert_eq!(node.qualified_code(), "SUBSTRING(ANAL, 1, 4)");
        assert_eq!(node.aggregate(), Aggregate::Count);
    }
}
