use chrono::NaiveDate;
use serde::Serialize;

/// One user's hours and notes for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLog {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,     // ⇔ daily_logs.date (TEXT "YYYY-MM-DD")
    pub hours_worked: f64,   // ⇔ daily_logs.hours_worked (REAL >= 0)
    pub notes: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl DailyLog {
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyLog {
    pub user_id: i64,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub notes: String,
}

/// Full overwrite of hours and notes.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyLogPatch {
    pub hours_worked: f64,
    pub notes: String,
    pub expected_version: Option<i64>,
}
