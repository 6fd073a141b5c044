use crate::parser::{formula::StringParser, FormulaParser, ParseError, WordComparer};

/// One comma-separated argument of a formula call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Argument {
    pub text: String,
    pub quoted: bool,
}

impl Argument {
    pub fn quoted(text: &str) -> Self {
        Self { text: text.to_string(), quoted: true }
    }

    pub fn bare(text: &str) -> Self {
        Self { text: text.trim().to_string(), quoted: false }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn parse(parser: &mut FormulaParser) -> Result<Argument, ParseError> {
        if StringParser::is_string_delimiter(parser) {
            let text = StringParser::parse(parser)?;
            return Ok(Argument::quoted(&text));
        }

        let pivot = parser.position;
        while !parser.eof()
            && !WordComparer::is_argument_delimiter(parser.current())
            && !StringParser::is_string_delimiter(parser)
        {
            parser.next();
        }

        Ok(Argument::bare(&parser.text_from_pivot(pivot)))
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{formula::Argument, FormulaParser};

    #[test]
    pub fn test_argument_quoted() {
        let mut parser = FormulaParser::new("\"SALES\",2024");

        match Argument::parse(&mut parser) {
            Ok(result) => {
                assert_eq!(result, Argument::quoted("SALES"));
                assert_eq!(parser.current(), ',');
            },
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_argument_bare_is_trimmed() {
        let mut parser = FormulaParser::new(" YEAR >= 2020 )");

        match Argument::parse(&mut parser) {
            Ok(result) => {
                assert_eq!(result.text, "YEAR >= 2020");
                assert!(!result.quoted);
                assert_eq!(parser.current(), ')');
            },
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_argument_bare_stops_at_quote() {
        let mut parser = FormulaParser::new("ab\"c\"");

        match Argument::parse(&mut parser) {
            Ok(result) => {
                assert_eq!(result.text, "ab");
                assert_eq!(parser.current(), '"');
            },
            Err(_) => panic!(),
        }
    }
}
