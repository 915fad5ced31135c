//! Contribution-style calendar: a year laid out as Monday-first weeks.

use crate::core::window::DateWindow;
use crate::errors::AppResult;
use crate::models::calendar::{CalendarCell, CalendarGrid, IntensityTier, MonthLabel};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

pub const DAYS_PER_WEEK: usize = 7;

pub struct CalendarGridBuilder;

impl CalendarGridBuilder {
    /// Lay every date of `year` into 7-cell weeks.
    ///
    /// The first week is padded with empty cells up to the weekday of
    /// Jan 1; the last one is padded after Dec 31. A month label goes on
    /// each week whose first dated cell falls in a month different from the
    /// previous label. Dates missing from `hours_by_date` count as 0 hours.
    pub fn build(year: i32, hours_by_date: &BTreeMap<NaiveDate, f64>) -> AppResult<CalendarGrid> {
        let window = DateWindow::of_year(year)?;

        let mut weeks: Vec<Vec<CalendarCell>> = Vec::new();
        let lead = window.start.weekday().num_days_from_monday() as usize;
        let mut current: Vec<CalendarCell> = vec![CalendarCell::Empty; lead];

        let mut total_hours = 0.0;
        let mut active_days = 0;

        for date in window.start.iter_days().take_while(|d| *d <= window.end) {
            let hours = hours_by_date.get(&date).copied().unwrap_or(0.0);
            total_hours += hours;
            if hours > 0.0 {
                active_days += 1;
            }

            current.push(CalendarCell::Day {
                date,
                hours,
                tier: IntensityTier::from_hours(hours),
            });

            if current.len() == DAYS_PER_WEEK {
                weeks.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            current.resize(DAYS_PER_WEEK, CalendarCell::Empty);
            weeks.push(current);
        }

        let month_labels = Self::month_labels(&weeks);

        Ok(CalendarGrid {
            year,
            weeks,
            month_labels,
            total_hours,
            active_days,
        })
    }

    fn month_labels(weeks: &[Vec<CalendarCell>]) -> Vec<MonthLabel> {
        let mut labels = Vec::new();
        let mut last_month = None;

        for (i, week) in weeks.iter().enumerate() {
            let Some(first) = week.iter().find_map(CalendarCell::date) else {
                continue;
            };
            if last_month != Some(first.month()) {
                labels.push(MonthLabel {
                    name: first.format("%b").to_string(),
                    week_index: i,
                });
                last_month = Some(first.month());
            }
        }

        labels
    }
}
