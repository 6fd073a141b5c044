use crate::parser::FormulaParser;

/// Case-insensitive match of a fixed word at the cursor. A word with a
/// whitespace postfix only matches when whitespace follows it.
#[derive(Debug, Default)]
pub struct WordComparer {
    pub length: usize,
    pub word: Vec<char>,
    whitespace_postfix: bool,
}

impl WordComparer {
    pub fn new(word: &str) -> Self {
        let word: Vec<char> = word.to_uppercase().chars().collect();
        Self { length: word.len(), word, ..Default::default() }
    }

    pub fn is_argument_delimiter(ch: char) -> bool {
        ch == ',' || ch == ')'
    }

    pub fn is_break_line(ch: char) -> bool {
        ch == '\r' || ch == '\n'
    }

    pub fn is_current_break_line(parser: &FormulaParser) -> bool {
        Self::is_break_line(parser.current())
    }

    pub fn compare(&self, parser: &FormulaParser) -> bool {
        let end = parser.position + self.length;
        if end > parser.length {
            return false;
        }

        let same_word = self.word.iter()
            .zip(&parser.text_v[parser.position..end])
            .all(|(expected, found)| *expected == found.to_ascii_uppercase());
        if !same_word {
            return false;
        }

        match parser.text_v.get(end) {
            None => !self.whitespace_postfix,
            Some(next) => !self.whitespace_postfix || next.is_whitespace(),
        }
    }

    pub fn with_whitespace_postfix(mut self) -> Self { self.whitespace_postfix = true; self }
}
