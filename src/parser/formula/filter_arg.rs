use crate::{
    parser::{FormulaComparers, FormulaParser, ParseError},
    query::{Filter, Operator},
    schema::Node,
};

/// Filter written inside a formula argument: `[!]field op value[:to]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub field: String,
    pub operator: Operator,
    pub negate: bool,
    pub from: String,
    pub to: Option<String>,
}

impl FilterArg {
    pub const RANGE_SEPARATOR: char = ':';

    fn is_field_end(ch: char) -> bool {
        ch.is_whitespace() || matches!(ch, '<' | '>' | '=' | '!')
    }

    /// `Ok(None)` when the text holds no operator after its first word, which
    /// makes it a plain value.
    pub fn parse(text: &str) -> Result<Option<FilterArg>, ParseError> {
        let mut parser = FormulaParser::new(text);
        parser.next_non_whitespace();

        let negate = parser.current() == '!' && parser.peek(1) != '=';
        if negate {
            parser.next();
            parser.next_non_whitespace();
        }

        let pivot = parser.position;
        while !parser.eof() && !FilterArg::is_field_end(parser.current()) {
            parser.next();
        }
        let field = parser.text_from_pivot(pivot);

        parser.next_non_whitespace();
        let Some(mut operator) = FormulaComparers::check_operator(&mut parser) else {
            if negate {
                return Err(ParseError::new("Missing filter operator", pivot, &parser));
            }
            return Ok(None);
        };

        if field.is_empty() {
            return Err(ParseError::new("Missing filter field", pivot, &parser));
        }

        let value = parser.rest().trim().to_string();
        if value.is_empty() {
            return Err(ParseError::new("Missing filter value", pivot, &parser));
        }

        let (from, to) = match operator {
            Operator::Eq | Operator::Between => Self::split_range(&value),
            _ => (value, None),
        };
        if to.is_some() && operator == Operator::Eq {
            operator = Operator::Between;
        }

        Ok(Some(FilterArg { field, operator, negate, from, to }))
    }

    /// Split `from:to`; a plain value has no upper bound.
    pub fn split_range(value: &str) -> (String, Option<String>) {
        match value.split_once(Self::RANGE_SEPARATOR) {
            Some((from, to)) => (from.trim().to_string(), Some(to.trim().to_string())),
            None => (value.trim().to_string(), None),
        }
    }

    pub fn to_filter(&self, node: Node) -> Filter {
        let mut filter = Filter::new(node, self.operator).with_from(&self.from);
        if let Some(to) = &self.to {
            filter = filter.with_to(to);
        }
        if self.negate {
            filter = filter.negated();
        }
        filter
    }
}
