//! Calendar windows used for aggregation. Both bounds are inclusive dates.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for Period {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "today" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(AppError::InvalidPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window from explicit bounds; swapped bounds are reordered.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Monday through Sunday of the week containing `date`.
    pub fn week(date: NaiveDate) -> Self {
        let back = Days::new(u64::from(date.weekday().num_days_from_monday()));
        let start = date.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn month(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    pub fn year(date: NaiveDate) -> Self {
        let start = date.with_ordinal(1).unwrap_or(date);
        let end = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(NaiveDate::MAX);
        Self { start, end }
    }

    /// Whole calendar year `year`.
    pub fn of_year(year: i32) -> AppResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(AppError::InvalidYear(year))?;
        Ok(Self::year(start))
    }

    pub fn for_period(period: Period, date: NaiveDate) -> Self {
        match period {
            Period::Day => Self::day(date),
            Period::Week => Self::week(date),
            Period::Month => Self::month(date),
            Period::Year => Self::year(date),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start_str(), self.end_str())
    }
}
