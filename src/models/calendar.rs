use chrono::NaiveDate;
use serde::Serialize;

/// Color bucket of a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum IntensityTier {
    /// 0 hours
    None,
    /// (0, 3)
    Low,
    /// [3, 6)
    Medium,
    /// [6, 9)
    High,
    /// [9, ∞)
    Max,
}

impl IntensityTier {
    pub fn from_hours(hours: f64) -> Self {
        if hours <= 0.0 || hours.is_nan() {
            IntensityTier::None
        } else if hours < 3.0 {
            IntensityTier::Low
        } else if hours < 6.0 {
            IntensityTier::Medium
        } else if hours < 9.0 {
            IntensityTier::High
        } else {
            IntensityTier::Max
        }
    }

    /// 0..=4, handy for renderers indexing a palette.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarCell {
    Empty,
    Day {
        date: NaiveDate,
        hours: f64,
        tier: IntensityTier,
    },
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarCell::Day { date, .. } => Some(*date),
            CalendarCell::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CalendarCell::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub name: String,
    /// 0-based column of the week the label sits above.
    pub week_index: usize,
}

/// Week-major activity grid for one year. Each week has exactly 7 cells,
/// Monday first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub weeks: Vec<Vec<CalendarCell>>,
    pub month_labels: Vec<MonthLabel>,
    pub total_hours: f64,
    pub active_days: usize,
}
