use chrono::NaiveDate;
use serde::Serialize;

/// Hour goals the dashboard measures progress against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Targets {
    pub daily: f64,
    pub weekly: f64,
    pub monthly: f64,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            daily: 10.0,
            weekly: 70.0,
            monthly: 280.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub user_id: i64,
    pub reference_date: NaiveDate,
    pub today: f64,
    pub week: f64,
    pub month: f64,
    pub year: f64,
    pub targets: Targets,
}

impl DashboardMetrics {
    pub fn daily_progress(&self) -> f64 {
        progress(self.today, self.targets.daily)
    }

    pub fn weekly_progress(&self) -> f64 {
        progress(self.week, self.targets.weekly)
    }

    pub fn monthly_progress(&self) -> f64 {
        progress(self.month, self.targets.monthly)
    }
}

/// Percentage of `target` reached, capped at 100.
pub fn progress(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target * 100.0).clamp(0.0, 100.0)
}
