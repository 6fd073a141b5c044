use once_cell::sync::Lazy;
use regex::Regex;

use crate::query::SqlBuilder;

static MERGE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i);\s*([AS])\s*$").expect("valid merge suffix regex"));

/// How a parsed formula's filters combine with the report's ambient query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MergePolicy {
    #[default]
    None,
    /// `;A`: append every ambient filter when both target the same table.
    Augment,
    /// `;S`: overwrite the values of parsed filters on the same field as an
    /// ambient filter.
    Synchronize,
}

impl MergePolicy {
    pub fn code(&self) -> &'static str {
        match self {
            MergePolicy::None => "",
            MergePolicy::Augment => ";A",
            MergePolicy::Synchronize => ";S",
        }
    }

    /// Split the merge suffix off formula text.
    pub fn detect(text: &str) -> (&str, MergePolicy) {
        let Some(captures) = MERGE_SUFFIX.captures(text) else {
            return (text, MergePolicy::None);
        };

        let policy = match captures.get(1).map(|m| m.as_str()) {
            Some("A") | Some("a") => MergePolicy::Augment,
            _ => MergePolicy::Synchronize,
        };
        let start = captures.get(0).map(|m| m.start()).unwrap_or(text.len());
        (&text[..start], policy)
    }

    /// Merge `ambient` into `parsed`. The ambient builder is only read.
    pub fn apply(&self, parsed: &mut SqlBuilder, ambient: Option<&SqlBuilder>) {
        let Some(ambient) = ambient else {
            return;
        };

        match self {
            MergePolicy::None => {},
            MergePolicy::Augment => {
                if parsed.same_table(ambient) {
                    parsed.filters.extend(ambient.filters.iter().cloned());
                }
            },
            MergePolicy::Synchronize => {
                for filter in parsed.filters.iter_mut() {
                    if let Some(source) = ambient.filter_for(filter.node.code()) {
                        filter.overwrite_values_from(source);
                    }
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        query::{Filter, Operator},
        schema::{Node, TypeTag},
    };

    use super::*;

    fn builder(table: &str, filters: Vec<Filter>) -> SqlBuilder {
        let mut builder = SqlBuilder::new("ERP", table);
        builder.filters = filters;
        builder
    }

    fn year(op: Operator, value: &str) -> Filter {
        Filter::new(Node::column("YEAR", TypeTag::Numeric), op).with_from(value)
    }

    fn region(value: &str) -> Filter {
        Filter::new(Node::column("REGION", TypeTag::Text), Operator::Eq).with_from(value)
    }

    #[test]
    fn detects_suffix() {
        assert_eq!(MergePolicy::detect("TT(SALES);A"), ("TT(SALES)", MergePolicy::Augment));
        assert_eq!(MergePolicy::detect("TT(SALES) ; s  "), ("TT(SALES) ", MergePolicy::Synchronize));
        assert_eq!(MergePolicy::detect("TT(SALES)"), ("TT(SALES)", MergePolicy::None));
        assert_eq!(MergePolicy::detect("TT(\"A;B\")"), ("TT(\"A;B\")", MergePolicy::None));
    }

    #[test]
    fn augment_appends_on_same_table() {
        let ambient = builder("sales", vec![region("North")]);
        let mut parsed = builder("SALES", vec![year(Operator::Eq, "2024")]);

        MergePolicy::Augment.apply(&mut parsed, Some(&ambient));

        assert_eq!(parsed.filters.len(), 2);
        assert_eq!(parsed.filters[1], ambient.filters[0]);
        assert_eq!(ambient.filters.len(), 1);
    }

    #[test]
    fn augment_skips_other_tables() {
        let ambient = builder("BUDGET", vec![region("North")]);
        let mut parsed = builder("SALES", vec![year(Operator::Eq, "2024")]);

        MergePolicy::Augment.apply(&mut parsed, Some(&ambient));

        assert_eq!(parsed.filters.len(), 1);
    }

    #[test]
    fn synchronize_overwrites_matching_fields() {
        let ambient = builder("BUDGET", vec![year(Operator::GtEq, "2020").negated()]);
        let mut parsed = builder("SALES", vec![year(Operator::Eq, "2024"), region("North")]);

        MergePolicy::Synchronize.apply(&mut parsed, Some(&ambient));

        assert_eq!(parsed.filters.len(), 2);
        assert_eq!(parsed.filters[0].operator_code(), ">=");
        assert!(parsed.filters[0].negate);
        assert_eq!(parsed.filters[0].raw_from, ambient.filters[0].raw_from);
        assert_eq!(parsed.filters[1], region("North"));
    }

    #[test]
    fn none_and_missing_ambient_leave_parsed_untouched() {
        let ambient = builder("SALES", vec![region("North")]);
        let mut parsed = builder("SALES", vec![year(Operator::Eq, "2024")]);
        let before = parsed.clone();

        MergePolicy::None.apply(&mut parsed, Some(&ambient));
        MergePolicy::Augment.apply(&mut parsed, None);

        assert_eq!(parsed, before);
    }
}
