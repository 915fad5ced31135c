pub mod calendar;
pub mod daily_log;
pub mod leaderboard;
pub mod metrics;
pub mod task;
pub mod task_status;
pub mod user;
