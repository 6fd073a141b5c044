use chrono::NaiveDate;

use crate::{query::{DateNormalizer, QueryResult}, schema::TypeTag};

/// One filter bound as supplied by the caller.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Bound {
    #[default]
    Empty,
    /// Resolved to today's date or period when the query is built.
    Current,
    Literal(String),
}

impl Bound {
    pub const CURRENT_CODE: &'static str = "C";

    /// Decode raw text. `C` is the current-date sentinel on date-like types
    /// only; elsewhere it is an ordinary value.
    pub fn from_raw(raw: &str, type_tag: TypeTag) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Bound::Empty;
        }
        if trimmed == Self::CURRENT_CODE && type_tag.is_date_like() {
            return Bound::Current;
        }
        Bound::Literal(raw.to_string())
    }

    pub fn literal(value: &str) -> Self {
        Bound::Literal(value.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Bound::Empty)
    }

    /// Text form used when the filter is serialized back for the UI.
    pub fn raw(&self) -> String {
        match self {
            Bound::Empty => String::new(),
            Bound::Current => Self::CURRENT_CODE.to_string(),
            Bound::Literal(value) => value.clone(),
        }
    }

    pub fn normalize_at(&self, type_tag: TypeTag, today: NaiveDate) -> QueryResult<Option<String>> {
        match self {
            Bound::Empty => Ok(None),
            Bound::Current => DateNormalizer::current(type_tag, today).map(Some),
            Bound::Literal(value) => DateNormalizer::normalize(value, type_tag, today).map(Some),
        }
    }
}
