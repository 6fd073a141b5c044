use crate::parser::{FormulaParser, ParseError, WordComparer};

pub struct StringParser;

impl StringParser {
    pub fn is_string_delimiter(parser: &FormulaParser) -> bool {
        parser.current() == '"'
    }

    /// Parse a double-quoted string; a doubled quote stands for one quote.
    pub fn parse(parser: &mut FormulaParser) -> Result<String, ParseError> {
        let mut pivot = parser.position;

        if !StringParser::is_string_delimiter(parser) {
            return Err(ParseError::new("Invalid string value", pivot, parser));
        }
        parser.next();
        pivot = parser.position;

        let mut text = String::new();
        loop {
            if parser.eof() {
                return Err(ParseError::new("Invalid string", pivot, parser));
            }
            if WordComparer::is_current_break_line(parser) {
                return Err(ParseError::new("Invalid string", pivot, parser));
            }
            if StringParser::is_string_delimiter(parser) {
                if parser.peek(1) != '"' {
                    break;
                }
                parser.next();
            }

            text.push(parser.current());
            parser.next();
        }
        parser.next();

        Ok(text)
    }
}
