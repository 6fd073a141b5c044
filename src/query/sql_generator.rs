use std::collections::HashSet;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::{
    query::{QueryError, QueryResult, SqlBuilder},
    schema::{JoinPath, Node, SchemaProvider},
};

static PLAIN_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Renders a [`SqlBuilder`] as a single-line
/// `SELECT … FROM … [WHERE …] [GROUP BY …] [ORDER BY …]` statement.
pub struct SqlGenerator;

impl SqlGenerator {
    pub fn render(builder: &SqlBuilder, schema: &dyn SchemaProvider, today: NaiveDate) -> QueryResult<String> {
        Self::validate(builder)?;

        let join = match schema.lookup_join(&builder.table) {
            Some(text) => JoinPath::parse(&text)?,
            None => JoinPath::default(),
        };

        let mut sql = format!(
            "SELECT {} FROM {}",
            Self::select_list(&builder.selected_nodes).join(", "),
            join.tables(builder.table.trim()).join(", ")
        );

        let predicates = Self::where_predicates(builder, &join, today)?;
        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }

        if builder.needs_group_by() {
            let groups = builder.group_by_nodes().into_iter().map(Node::sql_expr).collect::<Vec<_>>();
            if !groups.is_empty() {
                sql.push_str(" GROUP BY ");
                sql.push_str(&groups.join(", "));
            }
        }

        let orders = Self::order_by(&builder.selected_nodes);
        if !orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&orders.join(", "));
        }

        debug!(table = %builder.table, sql = %sql, "generated sql");
        Ok(sql)
    }

    fn validate(builder: &SqlBuilder) -> QueryResult<()> {
        if builder.table.trim().is_empty() {
            return QueryError::structural("query has no table").err();
        }
        if builder.selected_nodes.is_empty() {
            return QueryError::structural(format!("query on '{}' selects no fields", builder.table)).err();
        }
        if let Some(node) = builder.selected_nodes.iter().find(|node| node.is_sub_table()) {
            return QueryError::structural(format!("sub-table field '{}' cannot be selected", node.code())).err();
        }
        Ok(())
    }

    /// `expr AS alias` per selected node; a repeated alias gets the node's
    /// 1-based position appended.
    pub fn select_list(nodes: &[Node]) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        nodes.iter().enumerate().map(|(position, node)| {
            let label = if node.description().trim().is_empty() { node.code() } else { node.description().trim() };
            let mut alias = label.to_string();
            if !seen.insert(alias.to_ascii_uppercase()) {
                alias = format!("{}_{}", label, position + 1);
                seen.insert(alias.to_ascii_uppercase());
            }
            format!("{} AS {}", node.select_expr(), Self::alias(&alias))
        }).collect()
    }

    pub fn alias(label: &str) -> String {
        if PLAIN_IDENTIFIER.is_match(label) {
            label.to_string()
        } else {
            format!("\"{}\"", label.replace('"', "\"\""))
        }
    }

    fn where_predicates(builder: &SqlBuilder, join: &JoinPath, today: NaiveDate) -> QueryResult<Vec<String>> {
        let mut predicates = join.predicates();
        for filter in &builder.filters {
            if let Some(predicate) = filter.predicate_at(today)? {
                predicates.push(predicate);
            }
        }
        Ok(predicates)
    }

    /// Nodes with a sort hint by ascending ordinal, ties in selection order.
    fn order_by(nodes: &[Node]) -> Vec<String> {
        let mut sorted: Vec<_> = nodes.iter().filter_map(|node| node.sort().map(|sort| (sort, node))).collect();
        sorted.sort_by_key(|(sort, _)| sort.ordinal);
        sorted.into_iter().map(|(sort, node)| {
            if sort.descending {
                format!("{} DESC", node.select_expr())
            } else {
                node.select_expr()
            }
        }).collect()
    }
}
