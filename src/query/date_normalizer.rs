use chrono::{Datelike, NaiveDate};

use crate::{query::{QueryError, QueryResult}, schema::TypeTag};

const SEPARATORS: [char; 3] = ['.', '-', '/'];

/// Type-aware coercion of filter values.
///
/// Free-text dates accept `.`, `-` or `/` between day, month and year
/// (`31.01.2024`, `31-01-24`, `2024/01/31`). Two-digit years take the current
/// century. Output is ISO `yyyy-MM-dd` for `Date`, `yyyyMMdd` for
/// `SunDateNumeric` and `yyyy` + 3-digit period for `SunPeriodNumeric`;
/// every output parses back to itself.
pub struct DateNormalizer;

impl DateNormalizer {
    pub fn normalize(value: &str, type_tag: TypeTag, today: NaiveDate) -> QueryResult<String> {
        match type_tag {
            TypeTag::Date => Ok(Self::parse_date(value, today)?.format("%Y-%m-%d").to_string()),
            TypeTag::SunDateNumeric => Ok(Self::parse_date(value, today)?.format("%Y%m%d").to_string()),
            TypeTag::SunPeriodNumeric => {
                let (year, period) = Self::parse_period(value, today)?;
                Ok(Self::format_period(year, period))
            },
            TypeTag::Numeric => Self::normalize_number(value),
            TypeTag::Text => Ok(value.to_string()),
            TypeTag::SubTable => QueryError::structural("sub-table fields cannot be filtered").err(),
        }
    }

    /// Value of the `C` sentinel for a date-like type.
    pub fn current(type_tag: TypeTag, today: NaiveDate) -> QueryResult<String> {
        match type_tag {
            TypeTag::Date => Ok(today.format("%Y-%m-%d").to_string()),
            TypeTag::SunDateNumeric => Ok(today.format("%Y%m%d").to_string()),
            TypeTag::SunPeriodNumeric => Ok(Self::format_period(today.year(), today.month())),
            other => QueryError::structural(format!("no current value for type '{}'", other)).err(),
        }
    }

    pub fn parse_date(value: &str, today: NaiveDate) -> QueryResult<NaiveDate> {
        let text = value.trim();
        let invalid = || QueryError::structural(format!("invalid date: '{}'", value));

        let (year, month, day) = if Self::is_digits(text) && text.len() == 8 {
            (Self::number(&text[0..4])?, Self::number(&text[4..6])?, Self::number(&text[6..8])?)
        } else {
            let parts = Self::split(text);
            if parts.len() != 3 || parts.iter().any(|p| !Self::is_digits(p)) {
                return Err(invalid());
            }
            if parts[0].len() == 4 {
                (Self::number(parts[0])?, Self::number(parts[1])?, Self::number(parts[2])?)
            } else {
                (Self::expand_year(parts[2], today)?, Self::number(parts[1])?, Self::number(parts[0])?)
            }
        };

        NaiveDate::from_ymd_opt(year, month as u32, day as u32).ok_or_else(invalid)
    }

    /// Parse a period as `(year, period)`. Accepts the packed `yyyyPPP` form,
    /// `PP.yyyy` / `yyyy.PP` pairs, or a full date (its month).
    pub fn parse_period(value: &str, today: NaiveDate) -> QueryResult<(i32, u32)> {
        let text = value.trim();
        let invalid = || QueryError::structural(format!("invalid period: '{}'", value));

        let (year, period) = if Self::is_digits(text) && text.len() == 7 {
            (Self::number(&text[0..4])?, Self::number(&text[4..7])?)
        } else {
            let parts = Self::split(text);
            if parts.iter().any(|p| !Self::is_digits(p)) {
                return Err(invalid());
            }
            match parts.len() {
                2 if parts[0].len() == 4 => (Self::number(parts[0])?, Self::number(parts[1])?),
                2 => (Self::expand_year(parts[1], today)?, Self::number(parts[0])?),
                3 => {
                    let date = Self::parse_date(text, today)?;
                    (date.year(), date.month() as i32)
                },
                _ => return Err(invalid()),
            }
        };

        if !(1..=999).contains(&period) || !(0..=9999).contains(&year) {
            return Err(invalid());
        }

        Ok((year, period as u32))
    }

    pub fn format_period(year: i32, period: u32) -> String {
        format!("{:04}{:03}", year, period)
    }

    fn normalize_number(value: &str) -> QueryResult<String> {
        let text = value.trim();
        if text.parse::<f64>().is_ok_and(f64::is_finite) {
            Ok(text.to_string())
        } else {
            QueryError::structural(format!("invalid number: '{}'", value)).err()
        }
    }

    fn expand_year(text: &str, today: NaiveDate) -> QueryResult<i32> {
        match text.len() {
            2 => Ok(today.year() / 100 * 100 + Self::number(text)?),
            4 => Self::number(text),
            _ => QueryError::structural(format!("invalid year: '{}'", text)).err(),
        }
    }

    fn split(text: &str) -> Vec<&str> {
        text.split(|c| SEPARATORS.contains(&c)).collect()
    }

    fn is_digits(text: &str) -> bool {
        !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
    }

    fn number(text: &str) -> QueryResult<i32> {
        text.parse::<i32>()
            .map_err(|_| QueryError::structural(format!("invalid number: '{}'", text)))
    }
}
