use chrono::NaiveDate;

use crate::{query::{Bound, FilterState, Operator, QueryError, QueryResult}, schema::{Node, TypeTag}};

/// Separator between members of an `IN` list bound.
pub const LIST_SEPARATOR: char = ';';

/// One WHERE-clause predicate bound to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub node: Node,
    pub state: FilterState,
    pub negate: bool,
    pub raw_from: Bound,
    pub raw_to: Bound,
    pub normalized_from: Option<String>,
    pub normalized_to: Option<String>,
}

impl Filter {
    pub fn new(node: Node, operator: Operator) -> Self {
        Self::with_state(node, FilterState::Active(operator))
    }

    pub fn inactive(node: Node) -> Self {
        Self::with_state(node, FilterState::Inactive)
    }

    fn with_state(node: Node, state: FilterState) -> Self {
        Self {
            node,
            state,
            negate: false,
            raw_from: Bound::Empty,
            raw_to: Bound::Empty,
            normalized_from: None,
            normalized_to: None,
        }
    }

    /// Build a filter from the operator code and raw bounds the grid stores.
    pub fn from_codes(node: Node, operator_code: &str, negate: bool, from: &str, to: &str) -> QueryResult<Self> {
        let state = FilterState::try_from(operator_code)?;
        let type_tag = node.type_tag();
        let mut filter = Self::with_state(node, state);
        filter.negate = negate;
        filter.raw_from = Bound::from_raw(from, type_tag);
        filter.raw_to = Bound::from_raw(to, type_tag);
        Ok(filter)
    }

    pub fn with_from(mut self, raw: &str) -> Self {
        self.raw_from = Bound::from_raw(raw, self.node.type_tag());
        self
    }

    pub fn with_to(mut self, raw: &str) -> Self {
        self.raw_to = Bound::from_raw(raw, self.node.type_tag());
        self
    }

    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    pub fn is_active(&self) -> bool {
        self.state != FilterState::Inactive
    }

    pub fn operator_code(&self) -> &'static str {
        self.state.code()
    }

    /// Copy operator, negation and bounds from another filter, keeping this
    /// filter's node.
    pub fn overwrite_values_from(&mut self, other: &Filter) {
        self.state = other.state;
        self.negate = other.negate;
        self.raw_from = other.raw_from.clone();
        self.raw_to = other.raw_to.clone();
        self.normalized_from = other.normalized_from.clone();
        self.normalized_to = other.normalized_to.clone();
    }

    /// Normalize both bounds and store the result.
    pub fn normalize_at(&mut self, today: NaiveDate) -> QueryResult<()> {
        let (from, to) = self.normalized_bounds(today)?;
        self.normalized_from = from;
        self.normalized_to = to;
        Ok(())
    }

    fn normalized_bounds(&self, today: NaiveDate) -> QueryResult<(Option<String>, Option<String>)> {
        let type_tag = self.node.type_tag();
        if type_tag == TypeTag::SubTable {
            return QueryError::structural(format!("sub-table field '{}' cannot be filtered", self.node.code())).err();
        }

        let from = match (&self.state, &self.raw_from) {
            (FilterState::Active(Operator::In), Bound::Literal(list)) => {
                let mut members = vec![];
                for member in list.split(LIST_SEPARATOR).filter(|m| !m.trim().is_empty()) {
                    members.push(Bound::from_raw(member, type_tag).normalize_at(type_tag, today)?.unwrap_or_default());
                }
                Some(members.join(LIST_SEPARATOR.to_string().as_str()))
            },
            (_, bound) => bound.normalize_at(type_tag, today)?,
        };
        let to = self.raw_to.normalize_at(type_tag, today)?;

        Ok((from, to))
    }

    /// Render the WHERE predicate, or `None` for an inactive filter.
    pub fn predicate_at(&self, today: NaiveDate) -> QueryResult<Option<String>> {
        let Some(operator) = self.state.operator() else {
            return Ok(None);
        };

        let (from, to) = self.normalized_bounds(today)?;
        let expr = self.node.sql_expr();
        let type_tag = self.node.type_tag();
        let missing = || QueryError::structural(format!("filter on '{}' has no value", self.node.code()));

        let predicate = match operator {
            Operator::Between => match (from, to) {
                (Some(from), Some(to)) => format!(
                    "{} BETWEEN {} AND {}", expr, Self::render_value(type_tag, &from)?, Self::render_value(type_tag, &to)?
                ),
                (Some(from), None) => format!("{} >= {}", expr, Self::render_value(type_tag, &from)?),
                (None, Some(to)) => format!("{} <= {}", expr, Self::render_value(type_tag, &to)?),
                (None, None) => return Err(missing()),
            },
            Operator::Like => format!("{} LIKE {}", expr, Self::quote(&from.ok_or_else(missing)?)),
            Operator::In => {
                let list = from.ok_or_else(missing)?;
                let mut members = vec![];
                for member in list.split(LIST_SEPARATOR).filter(|m| !m.is_empty()) {
                    members.push(Self::render_value(type_tag, member)?);
                }
                if members.is_empty() {
                    return Err(missing());
                }
                format!("{} IN ({})", expr, members.join(", "))
            },
            op => format!("{} {} {}", expr, op.code(), Self::render_value(type_tag, &from.ok_or_else(missing)?)?),
        };

        if self.negate {
            return Ok(Some(format!("NOT ({})", predicate)));
        }
        Ok(Some(predicate))
    }

    /// Numeric types render bare; dates and text render as quoted literals.
    pub fn render_value(type_tag: TypeTag, value: &str) -> QueryResult<String> {
        if type_tag.is_numeric() {
            if value.trim().parse::<f64>().is_err() {
                return QueryError::structural(format!("invalid number: '{}'", value)).err();
            }
            return Ok(value.trim().to_string());
        }
        Ok(Self::quote(value))
    }

    pub fn quote(value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn year() -> Node {
        Node::column("YEAR", TypeTag::Numeric)
    }

    #[test]
    fn equality_on_number() {
        let filter = Filter::new(year(), Operator::Eq).with_from("2024");
        assert_eq!(filter.predicate_at(today()).unwrap().as_deref(), Some("YEAR = 2024"));
    }

    #[test]
    fn inactive_filter_renders_nothing_but_keeps_state() {
        let filter = Filter::from_codes(year(), "-", false, "2024", "").unwrap();
        assert!(!filter.is_active());
        assert_eq!(filter.operator_code(), "-");
        assert_eq!(filter.raw_from.raw(), "2024");
        assert_eq!(filter.predicate_at(today()).unwrap(), None);
    }

    #[test]
    fn between_with_one_or_two_bounds() {
        let posted = Node::column("POSTED", TypeTag::Date);

        let both = Filter::new(posted.clone(), Operator::Between).with_from("1.1.26").with_to("31/03/2026");
        assert_eq!(
            both.predicate_at(today()).unwrap().as_deref(),
            Some("POSTED BETWEEN '2026-01-01' AND '2026-03-31'")
        );

        let from_only = Filter::new(posted.clone(), Operator::Between).with_from("01-01-2026");
        assert_eq!(from_only.predicate_at(today()).unwrap().as_deref(), Some("POSTED >= '2026-01-01'"));

        let to_only = Filter::new(posted.clone(), Operator::Between).with_to("C");
        assert_eq!(to_only.predicate_at(today()).unwrap().as_deref(), Some("POSTED <= '2026-10-16'"));

        let none = Filter::new(posted, Operator::Between);
        assert!(none.predicate_at(today()).is_err());
    }

    #[test]
    fn negate_wraps_predicate() {
        let region = Node::column("REGION", TypeTag::Text);
        let filter = Filter::new(region, Operator::Like).with_from("N%").negated();
        assert_eq!(filter.predicate_at(today()).unwrap().as_deref(), Some("NOT (REGION LIKE 'N%')"));
    }

    #[test]
    fn text_values_are_escaped() {
        let name = Node::column("NAME", TypeTag::Text);
        let filter = Filter::new(name, Operator::Eq).with_from("O'Brien");
        assert_eq!(filter.predicate_at(today()).unwrap().as_deref(), Some("NAME = 'O''Brien'"));
    }

    #[test]
    fn in_list_normalizes_each_member() {
        let period = Node::column("PERIOD", TypeTag::SunPeriodNumeric);
        let mut filter = Filter::new(period, Operator::In).with_from("1.2026; 2026002;C");
        assert_eq!(
            filter.predicate_at(today()).unwrap().as_deref(),
            Some("PERIOD IN (2026001, 2026002, 2026010)")
        );

        filter.normalize_at(today()).unwrap();
        assert_eq!(filter.normalized_from.as_deref(), Some("2026001;2026002;2026010"));
    }

    #[test]
    fn current_sentinel_ignores_to_bound() {
        let posted = Node::column("TRANS_DATE", TypeTag::SunDateNumeric);
        for to in ["", "C", "31.12.2030", "20200101"] {
            let mut filter = Filter::new(posted.clone(), Operator::GtEq).with_from("C").with_to(to);
            filter.normalize_at(today()).unwrap();
            assert_eq!(filter.normalized_from.as_deref(), Some("20261016"), "{to}");
            assert_eq!(filter.predicate_at(today()).unwrap().as_deref(), Some("TRANS_DATE >= 20261016"));
        }
    }

    #[test]
    fn sub_table_cannot_be_filtered() {
        let anchor = Node::column("CUST", TypeTag::SubTable);
        let filter = Filter::new(anchor, Operator::Eq).with_from("1");
        match filter.predicate_at(today()) {
            Err(QueryError::Structural(message)) => assert!(message.contains("CUST")),
            _ => panic!(),
        }
    }

    #[test]
    fn numeric_value_must_be_a_number() {
        let filter = Filter::new(year(), Operator::Eq).with_from("twenty");
        assert!(filter.predicate_at(today()).is_err());
    }
}
