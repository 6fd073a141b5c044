use crate::parser::{formula::{ArgsParser, Argument, StringParser}, FormulaParser, ParseError};

/// A report formula call: `NAME(arg, ...)`, optionally written with the
/// spreadsheet's leading `=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    pub name: String,
    pub args: Vec<Argument>,
}

impl Formula {
    pub fn is_name_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '.'
    }

    pub fn parse(parser: &mut FormulaParser) -> Result<Formula, ParseError> {
        parser.next_non_whitespace();
        if parser.current() == '=' {
            parser.next();
            parser.next_non_whitespace();
        }

        let pivot = parser.position;
        let name = if StringParser::is_string_delimiter(parser) {
            StringParser::parse(parser)?
        } else {
            while !parser.eof() && Formula::is_name_char(parser.current()) {
                parser.next();
            }
            parser.text_from_pivot(pivot)
        };

        if name.trim().is_empty() {
            return Err(ParseError::new("Invalid formula name", pivot, parser));
        }

        parser.next_non_whitespace();
        let args = ArgsParser::parse(parser)?;

        parser.next_non_whitespace();
        if !parser.eof() {
            return Err(ParseError::at_cursor("Unexpected text after formula", parser));
        }

        Ok(Formula { name: name.trim().to_string(), args })
    }
}

#[cfg(test)]
pub mod tests {
    use crate::parser::{formula::{Argument, Formula}, FormulaParser};

    #[test]
    pub fn test_formula_positional() {
        let mut parser = FormulaParser::new("TT_XLB_EB(\"SALES\",\"2024\")");

        match Formula::parse(&mut parser) {
            Ok(result) => {
                assert_eq!(result.name, "TT_XLB_EB");
                assert_eq!(result.args, vec![Argument::quoted("SALES"), Argument::quoted("2024")]);
            },
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_formula_leading_equal_and_spaces() {
        let mut parser = FormulaParser::new(" = TVC_QUERY ( \"SALES\" , \"YEAR=2024\" ) ");

        match Formula::parse(&mut parser) {
            Ok(result) => {
                assert_eq!(result.name, "TVC_QUERY");
                assert_eq!(result.args.len(), 2);
            },
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_formula_quoted_name() {
        let mut parser = FormulaParser::new("\"USER TABLE\"(SALES)");

        match Formula::parse(&mut parser) {
            Ok(result) => assert_eq!(result.name, "USER TABLE"),
            Err(_) => panic!(),
        }
    }

    #[test]
    pub fn test_formula_missing_name() {
        let mut parser = FormulaParser::new("(SALES)");

        match Formula::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => assert_eq!(err.message, "Invalid formula name"),
        }
    }

    #[test]
    pub fn test_formula_trailing_text() {
        let mut parser = FormulaParser::new("TT(SALES) + 1");

        match Formula::parse(&mut parser) {
            Ok(_) => panic!(),
            Err(err) => {
                assert_eq!(err.message, "Unexpected text after formula");
                assert_eq!(err.start, 10);
            },
        }
    }
}
