use once_cell::sync::Lazy;
use regex::Regex;

use crate::query::{QueryError, QueryResult};

static FRAGMENT_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+AND\s+|[;\r\n]+").expect("valid separator regex"));

static FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)$")
        .expect("valid fragment regex")
});

/// One `table.column = otherTable.column` equality declared by the schema designer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub table: String,
    pub column: String,
    pub ref_table: String,
    pub ref_column: String,
}

impl JoinCondition {
    pub fn to_sql(&self) -> String {
        format!("{}.{} = {}.{}", self.table, self.column, self.ref_table, self.ref_column)
    }
}

/// Parsed join metadata of a base table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPath {
    pub conditions: Vec<JoinCondition>,
}

impl JoinPath {
    /// Split join text on `;`, line breaks or `AND` and validate every fragment.
    pub fn parse(text: &str) -> QueryResult<Self> {
        let mut conditions = vec![];
        for fragment in FRAGMENT_SEPARATOR.split(text) {
            let fragment = fragment.trim();
            if fragment.is_empty() {
                continue;
            }
            let captures = FRAGMENT.captures(fragment).ok_or_else(|| {
                QueryError::structural(format!("malformed join fragment: '{}'", fragment))
            })?;
            conditions.push(JoinCondition {
                table: captures[1].to_string(),
                column: captures[2].to_string(),
                ref_table: captures[3].to_string(),
                ref_column: captures[4].to_string(),
            });
        }

        Ok(Self { conditions })
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Base table first, then every other table named by a condition, in
    /// first-appearance order.
    pub fn tables(&self, base_table: &str) -> Vec<String> {
        let mut tables = vec![base_table.to_string()];
        for condition in &self.conditions {
            for table in [&condition.table, &condition.ref_table] {
                if !tables.iter().any(|t| t.eq_ignore_ascii_case(table)) {
                    tables.push(table.clone());
                }
            }
        }
        tables
    }

    pub fn predicates(&self) -> Vec<String> {
        self.conditions.iter().map(JoinCondition::to_sql).collect()
    }
}
