use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub user_name: String,
    pub total_hours: f64,
    /// 1-based; equal totals get consecutive ranks.
    pub rank: usize,
}

/// Progress level derived from total points (1 point = 1 hour).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Level {
    pub level: u32,
    /// Always in (0, 100]. Exactly 100 on a level threshold.
    pub points_to_next: f64,
}

/// Points card for a single user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub user_id: i64,
    pub total_points: f64,
    /// None when the user has no hours logged yet.
    pub rank: Option<usize>,
    pub total_users: usize,
    pub this_week_points: f64,
    pub level: Level,
}
