use std::ops::Range;

use thiserror::Error;

use crate::parser::FormulaParser;

/// Formula text the cursor could not accept. `text` runs from the pivot up to
/// and including the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at [{start}:{end}] -> '{text}'")]
pub struct ParseError {
    pub message: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl ParseError {
    pub fn new(message: &str, pivot: usize, parser: &FormulaParser) -> Self {
        Self {
            message: message.to_string(),
            text: parser.text_from_range(pivot, parser.position + 1),
            start: pivot,
            end: parser.position,
        }
    }

    pub fn at_cursor(message: &str, parser: &FormulaParser) -> Self {
        Self::new(message, parser.position, parser)
    }

    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_text_up_to_the_cursor() {
        let mut parser = FormulaParser::new("TT(SALES;");
        parser.jump(8);

        let error = ParseError::new("Invalid args value", 2, &parser);

        assert_eq!(error.text, "(SALES;");
        assert_eq!(error.span(), 2..8);
        assert_eq!(error.to_string(), "Invalid args value at [2:8] -> '(SALES;'");
    }

    #[test]
    fn at_cursor_points_at_one_character() {
        let mut parser = FormulaParser::new("TT(A) x");
        parser.jump(6);

        let error = ParseError::at_cursor("Unexpected text after formula", &parser);

        assert_eq!(error.text, "x");
        assert_eq!(error.span(), 6..6);
    }
}
