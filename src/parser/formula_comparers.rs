use crate::parser::{FormulaParser, WordComparer};
use crate::query::Operator;

#[derive(Debug)]
pub struct FormulaComparers {
    pub less_than_or_equal: WordComparer,
    pub greater_than_or_equal: WordComparer,
    pub not_equal: WordComparer,
    pub not_equal_bang: WordComparer,
    pub equal: WordComparer,
    pub less_than: WordComparer,
    pub greater_than: WordComparer,
    pub like: WordComparer,
    pub r#in: WordComparer,
    pub between: WordComparer,
}

impl Default for FormulaComparers {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaComparers {
    pub fn new() -> Self {
        Self {
            less_than_or_equal: WordComparer::new("<="),
            greater_than_or_equal: WordComparer::new(">="),
            not_equal: WordComparer::new("<>"),
            not_equal_bang: WordComparer::new("!="),
            equal: WordComparer::new("="),
            less_than: WordComparer::new("<"),
            greater_than: WordComparer::new(">"),
            like: WordComparer::new("LIKE").with_whitespace_postfix(),
            r#in: WordComparer::new("IN").with_whitespace_postfix(),
            between: WordComparer::new("BETWEEN").with_whitespace_postfix(),
        }
    }

    /// Match an operator at the cursor, longest symbol first, and move past it.
    pub fn check_operator(parser: &mut FormulaParser) -> Option<Operator> {
        let found = {
            let view: &FormulaParser = parser;
            let comparers = &view.comparers;
            [
                (&comparers.less_than_or_equal, Operator::LtEq),
                (&comparers.greater_than_or_equal, Operator::GtEq),
                (&comparers.not_equal, Operator::NotEq),
                (&comparers.not_equal_bang, Operator::NotEq),
                (&comparers.equal, Operator::Eq),
                (&comparers.less_than, Operator::Lt),
                (&comparers.greater_than, Operator::Gt),
                (&comparers.like, Operator::Like),
                (&comparers.r#in, Operator::In),
                (&comparers.between, Operator::Between),
            ]
            .into_iter()
            .find(|(comparer, _)| comparer.compare(view))
            .map(|(comparer, op)| (comparer.length, op))
        };

        let (length, op) = found?;
        parser.jump(length);
        Some(op)
    }
}
