use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn current_year() -> i32 {
    today().year()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD`, or `today` when `s` is "today".
pub fn parse_date_arg(s: &str) -> AppResult<NaiveDate> {
    if s.trim().eq_ignore_ascii_case("today") {
        return Ok(today());
    }
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Optional date argument, defaulting to today.
pub fn parse_optional_date(s: Option<&String>) -> AppResult<NaiveDate> {
    match s {
        Some(v) => parse_date_arg(v),
        None => Ok(today()),
    }
}
