use tracing::debug;

use crate::{
    parser::{formula::{Argument, FilterArg, Formula}, Dialect, FormulaParser, MergePolicy},
    query::{Filter, Operator, ProcessingMode, QueryError, QueryResult, SqlBuilder},
    schema::{SchemaProvider, TableSchema},
};

/// A formula decoded into a query, before the merge policy is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFormula {
    pub name: String,
    pub dialect: Dialect,
    pub merge: MergePolicy,
    pub builder: SqlBuilder,
}

impl ParsedFormula {
    /// Parse with the dialect chosen from the call name.
    pub fn parse_detected(text: &str, schema: &dyn SchemaProvider) -> QueryResult<Self> {
        Self::parse_with(text, None, schema)
    }

    pub fn parse(text: &str, dialect: Dialect, schema: &dyn SchemaProvider) -> QueryResult<Self> {
        Self::parse_with(text, Some(dialect), schema)
    }

    fn parse_with(text: &str, dialect: Option<Dialect>, schema: &dyn SchemaProvider) -> QueryResult<Self> {
        let (body, merge) = MergePolicy::detect(text);
        let mut parser = FormulaParser::new(body);
        let formula = Formula::parse(&mut parser)?;
        let dialect = dialect.unwrap_or_else(|| Dialect::for_name(&formula.name));

        let builder = Self::lower(&formula, dialect, schema)?;
        debug!(formula = %formula.name, dialect = ?dialect, table = %builder.table, filters = builder.filters.len(), "formula parsed");

        Ok(Self { name: formula.name, dialect, merge, builder })
    }

    /// Apply the merge policy against the report's ambient query.
    pub fn into_builder(self, ambient: Option<&SqlBuilder>) -> SqlBuilder {
        let mut builder = self.builder;
        self.merge.apply(&mut builder, ambient);
        builder
    }

    fn lower(formula: &Formula, dialect: Dialect, schema: &dyn SchemaProvider) -> QueryResult<SqlBuilder> {
        let Some((first, rest)) = formula.args.split_first() else {
            return QueryError::structural(format!("formula '{}' names no table", formula.name)).err();
        };
        if first.is_empty() {
            return QueryError::structural(format!("formula '{}' names no table", formula.name)).err();
        }

        let table = schema.table_schema(first.text.trim())
            .ok_or_else(|| QueryError::structural(format!("unknown table '{}'", first.text.trim())))?;

        let measures = table.measures();
        if measures.is_empty() {
            return QueryError::structural(format!("table '{}' has no measure to select", table.name)).err();
        }

        let mut builder = SqlBuilder::new(&table.database, &table.name).with_mode(ProcessingMode::Balance);
        for node in measures {
            builder.select(node.clone());
        }

        let mut explicit: Vec<Filter> = vec![];
        let mut values: Vec<&Argument> = vec![];
        for arg in rest {
            let filter_arg = match dialect {
                Dialect::LiteralCall => FilterArg::parse(&arg.text)?,
                Dialect::Positional => Self::positional_filter(&table, arg),
            };
            match filter_arg {
                Some(filter_arg) => {
                    let filter = Self::explicit_filter(&table, &filter_arg)?;
                    Self::push_replacing(&mut explicit, filter);
                },
                None if dialect == Dialect::LiteralCall => {
                    return QueryError::structural(format!("expected 'field=value' argument, found '{}'", arg.text)).err();
                },
                None => values.push(arg),
            }
        }

        let slots: Vec<_> = table.parameter_nodes().into_iter()
            .filter(|node| !explicit.iter().any(|filter| filter.node == **node))
            .collect();
        if values.len() > slots.len() {
            return QueryError::structural(format!(
                "formula '{}' passes {} values but table '{}' has {} parameter fields",
                formula.name, values.len(), table.name, slots.len()
            )).err();
        }

        for (node, value) in slots.into_iter().zip(values) {
            if value.is_empty() {
                continue;
            }
            let (from, to) = FilterArg::split_range(&value.text);
            let filter = match to {
                Some(to) => Filter::new(node.clone(), Operator::Between).with_from(&from).with_to(&to),
                None => Filter::new(node.clone(), Operator::Eq).with_from(&from),
            };
            builder.add_filter(filter);
        }
        for filter in explicit {
            builder.add_filter(filter);
        }

        Ok(builder)
    }

    /// A positional argument is a filter only when the word before its
    /// operator names a field of the table; anything else is a value.
    fn positional_filter(table: &TableSchema, arg: &Argument) -> Option<FilterArg> {
        FilterArg::parse(&arg.text)
            .ok()
            .flatten()
            .filter(|filter_arg| table.node(&filter_arg.field).is_some())
    }

    fn explicit_filter(table: &TableSchema, filter_arg: &FilterArg) -> QueryResult<Filter> {
        let node = table.node(&filter_arg.field)
            .ok_or_else(|| QueryError::structural(format!("unknown field '{}' in table '{}'", filter_arg.field, table.name)))?;
        if node.is_sub_table() {
            return QueryError::structural(format!("field '{}' cannot be filtered", node.code())).err();
        }
        Ok(filter_arg.to_filter(node.clone()))
    }

    fn push_replacing(filters: &mut Vec<Filter>, filter: Filter) {
        match filters.iter_mut().find(|existing| existing.node == filter.node) {
            Some(existing) => *existing = filter,
            None => filters.push(filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{_tests::fixtures::*, Bound, QueryError},
        schema::{SchemaCatalog, TableSchema},
    };

    use super::*;

    fn parse(text: &str) -> ParsedFormula {
        match ParsedFormula::parse_detected(text, &catalog()) {
            Ok(result) => result,
            Err(err) => panic!("{text}: {err}"),
        }
    }

    fn structural(text: &str) -> String {
        match ParsedFormula::parse_detected(text, &catalog()) {
            Ok(_) => panic!("{text} should not parse"),
            Err(QueryError::Structural(message)) => message,
            Err(err) => panic!("unexpected error {err}"),
        }
    }

    #[test]
    fn positional_binds_parameter_fields_in_order() {
        let parsed = parse("TT_XLB_EB(\"SALES\",\"2024\")");

        assert_eq!(parsed.dialect, Dialect::Positional);
        assert_eq!(parsed.merge, MergePolicy::None);
        assert_eq!(parsed.builder.table, "SALES");
        assert_eq!(parsed.builder.database, "ERP");
        assert_eq!(parsed.builder.processing_mode, ProcessingMode::Balance);
        assert_eq!(parsed.builder.selected_nodes.len(), 1);
        assert_eq!(parsed.builder.selected_nodes[0].code(), "AMOUNT");
        assert_eq!(parsed.builder.filters.len(), 1);
        assert_eq!(parsed.builder.filters[0].node.code(), "YEAR");
        assert_eq!(parsed.builder.filters[0].raw_from, Bound::literal("2024"));
    }

    #[test]
    fn end_to_end_sql_has_no_empty_group_by() {
        let parsed = parse("TT_XLB_EB(\"SALES\",\"2024\")");

        let sql = parsed.builder.build(&catalog()).unwrap();

        assert_eq!(sql, "SELECT SUM(AMOUNT) AS AMOUNT FROM SALES WHERE YEAR = 2024");
    }

    #[test]
    fn positional_skips_empty_slots_and_explicit_fields() {
        let parsed = parse("TT(SALES, YEAR>=2020, , 2024003)");

        let filters = &parsed.builder.filters;
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].node.code(), "PERIOD");
        assert_eq!(filters[0].raw_from, Bound::literal("2024003"));
        assert_eq!(filters[1].node.code(), "YEAR");
        assert_eq!(filters[1].operator_code(), ">=");
    }

    #[test]
    fn positional_range_value_becomes_between() {
        let parsed = parse("TT(SALES, 2020:2024)");

        assert_eq!(parsed.builder.filters[0].operator_code(), "BETWEEN");
        assert_eq!(parsed.builder.filters[0].raw_to, Bound::literal("2024"));
    }

    #[test]
    fn positional_rejects_extra_values() {
        let message = structural("TT(BUDGET, 2024, 2025)");
        assert!(message.contains("parameter fields"));
    }

    #[test]
    fn literal_call_decodes_filters() {
        let parsed = parse("TVC_QUERY(\"SALES\", \"year=2024\", \"!REGION IN North;South\", \"TRANS_DATE=C\")");

        assert_eq!(parsed.dialect, Dialect::LiteralCall);
        let filters = &parsed.builder.filters;
        assert_eq!(filters.len(), 3);
        assert_eq!(filters[0].node.code(), "YEAR");
        assert!(filters[1].negate);
        assert_eq!(filters[1].operator_code(), "IN");
        assert_eq!(filters[2].raw_from, Bound::Current);
    }

    #[test]
    fn literal_call_rejects_plain_values() {
        let message = structural("TVC_QUERY(\"SALES\", \"2024\")");
        assert!(message.contains("field=value"));
    }

    #[test]
    fn later_argument_wins_for_the_same_field() {
        let parsed = parse("TVC_QUERY(\"SALES\", \"YEAR=2023\", \"REGION=North\", \"YEAR=2024\")");

        let filters = &parsed.builder.filters;
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].node.code(), "YEAR");
        assert_eq!(filters[0].raw_from, Bound::literal("2024"));
    }

    #[test]
    fn structural_errors() {
        assert!(structural("TT(\"NOPE\")").contains("unknown table"));
        assert!(structural("TT()").contains("names no table"));
        assert!(structural("TVC_QUERY(\"SALES\", \"COLOR=red\")").contains("unknown field"));
        assert!(structural("TVC_QUERY(\"SALES\", \"CUST=1\")").contains("cannot be filtered"));
        assert!(structural("TT(SALES").contains("Invalid args value"));

        let catalog = SchemaCatalog::new().with_table(TableSchema::new("EMPTY"));
        match ParsedFormula::parse_detected("TT(EMPTY)", &catalog) {
            Err(QueryError::Structural(message)) => assert!(message.contains("no measure")),
            _ => panic!(),
        }
    }

    #[test]
    fn positional_text_with_operator_words_binds_as_value() {
        let parsed = parse("TT(SALES, , \"Made in Italy\", \"a<b\")");

        let filters = &parsed.builder.filters;
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].node.code(), "REGION");
        assert_eq!(filters[0].operator_code(), "=");
        assert_eq!(filters[0].raw_from, Bound::literal("Made in Italy"));
        assert_eq!(filters[1].node.code(), "PERIOD");
        assert_eq!(filters[1].raw_from, Bound::literal("a<b"));
    }

    #[test]
    fn positional_filter_needs_a_known_field() {
        let parsed = parse("TT(SALES, region LIKE N%, 2024)");

        let filters = &parsed.builder.filters;
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].node.code(), "YEAR");
        assert_eq!(filters[1].node.code(), "REGION");
        assert_eq!(filters[1].operator_code(), "LIKE");
    }

    #[test]
    fn quoted_call_name_selects_the_dialect() {
        match ParsedFormula::parse_detected("\"TVC_QUERY\"(\"SALES\", \"2024\")", &catalog()) {
            Err(QueryError::Structural(message)) => assert!(message.contains("field=value")),
            _ => panic!(),
        }

        let parsed = parse("\"tvc_query\"(\"SALES\", \"YEAR=2024\")");
        assert_eq!(parsed.dialect, Dialect::LiteralCall);
        assert_eq!(parsed.name, "tvc_query");
    }

    #[test]
    fn explicit_dialect_overrides_detection() {
        match ParsedFormula::parse("TT(\"SALES\", \"2024\")", Dialect::LiteralCall, &catalog()) {
            Err(QueryError::Structural(_)) => {},
            _ => panic!(),
        }
    }

    #[test]
    fn merge_suffix_is_applied_by_into_builder() {
        let ambient = parse("TVC_QUERY(\"SALES\", \"REGION=North\")").builder;

        let augmented = parse("TT(SALES, 2024);A").into_builder(Some(&ambient));
        assert_eq!(augmented.filters.len(), 2);
        assert_eq!(augmented.filters[1].node.code(), "REGION");

        let synchronized = parse("TVC_QUERY(\"SALES\", \"REGION=South\");S").into_builder(Some(&ambient));
        assert_eq!(synchronized.filters[0].raw_from, Bound::literal("North"));

        let plain = parse("TT(SALES, 2024)").into_builder(Some(&ambient));
        assert_eq!(plain.filters.len(), 1);
    }
}
