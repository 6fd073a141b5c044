use crate::parser::{formula::Argument, FormulaParser, ParseError};

pub struct ArgsParser;

impl ArgsParser {
    pub fn is_args_start(parser: &FormulaParser) -> bool {
        parser.current() == '('
    }

    pub fn is_args_end(parser: &FormulaParser) -> bool {
        parser.current() == ')'
    }

    /// Parse a parenthesized argument list and consume the closing
    /// parenthesis. Two commas in a row yield an empty argument; a comma right
    /// before the closing parenthesis is an error.
    pub fn parse(parser: &mut FormulaParser) -> Result<Vec<Argument>, ParseError> {
        let pivot = parser.position;
        let mut args: Vec<Argument> = vec![];
        let mut can_consume = true;
        let mut after_comma = false;

        if !ArgsParser::is_args_start(parser) {
            return Err(ParseError::new("Invalid args value", pivot, parser));
        }
        parser.next();

        while !parser.eof() && !ArgsParser::is_args_end(parser) {
            if parser.current().is_whitespace() {
                parser.next();
            } else if parser.current() == ',' {
                if can_consume {
                    if args.is_empty() && !after_comma {
                        return Err(ParseError::new("Invalid args value", pivot, parser));
                    }
                    args.push(Argument::default());
                }
                can_consume = true;
                after_comma = true;
                parser.next();
            } else {
                if !can_consume {
                    return Err(ParseError::new("Invalid args value", pivot, parser));
                }
                args.push(Argument::parse(parser)?);
                can_consume = false;
                after_comma = false;
            }
        }

        if parser.eof() || after_comma {
            return Err(ParseError::new("Invalid args value", pivot, parser));
        }
        parser.next();

        Ok(args)
    }
}
