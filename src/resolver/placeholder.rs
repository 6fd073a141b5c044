use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::query::{QueryError, QueryResult};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\{P\}(\d+)").expect("valid placeholder regex"));

/// Replaces `{P}i` placeholders (one-based) with parameter text.
pub struct Placeholders;

impl Placeholders {
    /// Inside a quoted argument, quotes in the value are doubled. A bare
    /// placeholder takes the value verbatim, so a value that would split or
    /// close the argument (`,` `"` `(` `)`) is rejected there.
    pub fn substitute(text: &str, values: &[String]) -> QueryResult<String> {
        let mut failure: Option<String> = None;

        let result = PLACEHOLDER.replace_all(text, |captures: &Captures| {
            let placeholder = &captures[0];
            let index = captures[1].parse::<usize>().ok().filter(|index| *index >= 1);
            let Some(value) = index.and_then(|index| values.get(index - 1)) else {
                failure.get_or_insert_with(|| format!("no parameter for placeholder {placeholder}"));
                return String::new();
            };

            let start = captures.get(0).map_or(0, |found| found.start());
            if Self::is_quoted(&text[..start]) {
                value.replace('"', "\"\"")
            } else if value.contains([',', '"', '(', ')']) {
                failure.get_or_insert_with(|| format!("value for {placeholder} needs a quoted placeholder"));
                String::new()
            } else {
                value.clone()
            }
        });

        match failure {
            Some(message) => QueryError::parameter(message).err(),
            None => Ok(result.into_owned()),
        }
    }

    /// An odd number of quotes before a position leaves it inside a string.
    /// Doubled quotes keep the parity.
    fn is_quoted(before: &str) -> bool {
        before.matches('"').count() % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn substitutes_each_placeholder() {
        let text = "TT_XLB_EB(\"SALES\",\"{P}1\",\"{P}2\",\"{p}1\")";

        let result = Placeholders::substitute(text, &values(&["2024", "North"])).unwrap();

        assert_eq!(result, "TT_XLB_EB(\"SALES\",\"2024\",\"North\",\"2024\")");
    }

    #[test]
    fn doubles_quotes_in_values() {
        let result = Placeholders::substitute("TT(\"{P}1\")", &values(&["a\"b"])).unwrap();
        assert_eq!(result, "TT(\"a\"\"b\")");
    }

    #[test]
    fn bare_placeholder_takes_plain_values() {
        let result = Placeholders::substitute("TT(SALES, {P}1, \"x\"\"y\", {P}2)", &values(&["2024", "North West"])).unwrap();
        assert_eq!(result, "TT(SALES, 2024, \"x\"\"y\", North West)");
    }

    #[test]
    fn bare_placeholder_rejects_delimiters() {
        for value in ["a,b", "a\"b", "f(x)"] {
            match Placeholders::substitute("TT(SALES, {P}1)", &values(&[value])) {
                Err(QueryError::ParameterResolution(message)) => assert!(message.contains("quoted placeholder")),
                _ => panic!(),
            }
        }
        assert!(Placeholders::substitute("TT(SALES, \"{P}1\")", &values(&["a,b"])).is_ok());
    }

    #[test]
    fn missing_parameter_is_a_parameter_error() {
        match Placeholders::substitute("TT({P}2)", &values(&["1"])) {
            Err(QueryError::ParameterResolution(message)) => assert!(message.contains("{P}2")),
            _ => panic!(),
        }
        assert!(Placeholders::substitute("TT({P}0)", &values(&["1"])).is_err());
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(Placeholders::substitute("TT(SALES)", &[]).unwrap(), "TT(SALES)");
    }
}
