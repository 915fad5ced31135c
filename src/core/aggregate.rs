//! Totals, leaderboards and levels computed from DailyLog rows.

use crate::core::window::DateWindow;
use crate::db::store::{DailyLogFilter, RecordStore, UserFilter};
use crate::errors::{AppError, AppResult};
use crate::models::daily_log::DailyLog;
use crate::models::leaderboard::{LeaderboardEntry, Level, UserStats};
use crate::models::metrics::{DashboardMetrics, Targets};
use crate::models::user::User;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Points needed per level.
pub const POINTS_PER_LEVEL: f64 = 100.0;

pub struct Aggregator;

impl Aggregator {
    /// Plain sum of `hours_worked`.
    pub fn sum_hours<'a, I>(logs: I) -> f64
    where
        I: IntoIterator<Item = &'a DailyLog>,
    {
        logs.into_iter().map(|l| l.hours_worked).sum()
    }

    /// Hours logged by `user_id` with a date inside `window`.
    pub fn totals<S: RecordStore + ?Sized>(
        store: &S,
        user_id: i64,
        window: &DateWindow,
    ) -> AppResult<f64> {
        let logs = store.fetch_daily_logs(&DailyLogFilter::all().user(user_id).within(*window))?;
        Ok(Self::sum_hours(&logs))
    }

    /// Leaderboard over `window`.
    pub fn rank<S: RecordStore + ?Sized>(
        store: &S,
        window: &DateWindow,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        let logs = store.fetch_daily_logs(&DailyLogFilter::all().within(*window))?;
        let users = store.fetch_users(&UserFilter::all())?;
        Ok(Self::rank_logs(&logs, &users))
    }

    /// Leaderboard over every log ever saved.
    pub fn rank_all_time<S: RecordStore + ?Sized>(store: &S) -> AppResult<Vec<LeaderboardEntry>> {
        let logs = store.fetch_daily_logs(&DailyLogFilter::all())?;
        let users = store.fetch_users(&UserFilter::all())?;
        Ok(Self::rank_logs(&logs, &users))
    }

    /// Group `logs` by user, sum, and rank by descending total.
    ///
    /// Users are visited in the order of their first log, so with logs
    /// sorted by (date, id) a tie goes to whoever logged earliest. Ranks are
    /// sequential: two users with the same total get consecutive ranks.
    /// Users whose total is 0 are left out.
    pub fn rank_logs(logs: &[DailyLog], users: &[User]) -> Vec<LeaderboardEntry> {
        let names: HashMap<i64, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();

        let mut order: Vec<(i64, f64)> = Vec::new();
        let mut slot: HashMap<i64, usize> = HashMap::new();
        for log in logs {
            match slot.get(&log.user_id) {
                Some(&i) => order[i].1 += log.hours_worked,
                None => {
                    slot.insert(log.user_id, order.len());
                    order.push((log.user_id, log.hours_worked));
                }
            }
        }

        order.retain(|(_, hours)| *hours > 0.0);
        // stable: equal totals keep visit order
        order.sort_by(|a, b| b.1.total_cmp(&a.1));

        order
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, total_hours))| LeaderboardEntry {
                user_id,
                user_name: names.get(&user_id).copied().unwrap_or("Unknown").to_string(),
                total_hours,
                rank: i + 1,
            })
            .collect()
    }

    /// `level = floor(p / 100) + 1`, `points_to_next = 100 - (p mod 100)`.
    ///
    /// On an exact multiple of 100 `points_to_next` is 100, not 0: reaching
    /// a threshold starts the next level from scratch.
    pub fn level(total_points: f64) -> Level {
        let points = if total_points.is_finite() {
            total_points.max(0.0)
        } else {
            0.0
        };
        Level {
            level: (points / POINTS_PER_LEVEL).floor() as u32 + 1,
            points_to_next: POINTS_PER_LEVEL - points.rem_euclid(POINTS_PER_LEVEL),
        }
    }

    /// Today / week / month / year totals for the dashboard, from a single
    /// fetch covering all four windows.
    pub fn dashboard<S: RecordStore + ?Sized>(
        store: &S,
        user_id: i64,
        today: NaiveDate,
        targets: Targets,
    ) -> AppResult<DashboardMetrics> {
        let day = DateWindow::day(today);
        let week = DateWindow::week(today);
        let month = DateWindow::month(today);
        let year = DateWindow::year(today);

        // a week can straddle New Year
        let span = DateWindow::new(week.start.min(year.start), week.end.max(year.end));
        let logs = store.fetch_daily_logs(&DailyLogFilter::all().user(user_id).within(span))?;

        let sum_in = |w: &DateWindow| Self::sum_hours(logs.iter().filter(|l| w.contains(l.date)));

        Ok(DashboardMetrics {
            user_id,
            reference_date: today,
            today: sum_in(&day),
            week: sum_in(&week),
            month: sum_in(&month),
            year: sum_in(&year),
            targets,
        })
    }

    /// Points card: all-time points, global rank, this week's points, level.
    pub fn user_stats<S: RecordStore + ?Sized>(
        store: &S,
        user_id: i64,
        today: NaiveDate,
    ) -> AppResult<UserStats> {
        if store.fetch_users(&UserFilter::by_id(user_id))?.is_empty() {
            return Err(AppError::UnknownUser(user_id));
        }

        let board = Self::rank_all_time(store)?;
        let own = board.iter().find(|e| e.user_id == user_id);
        let total_points = own.map(|e| e.total_hours).unwrap_or(0.0);

        Ok(UserStats {
            user_id,
            total_points,
            rank: own.map(|e| e.rank),
            total_users: board.len(),
            this_week_points: Self::totals(store, user_id, &DateWindow::week(today))?,
            level: Self::level(total_points),
        })
    }

    /// Hours per date for one user over a calendar year.
    pub fn hours_by_date<S: RecordStore + ?Sized>(
        store: &S,
        user_id: i64,
        year: i32,
    ) -> AppResult<BTreeMap<NaiveDate, f64>> {
        let window = DateWindow::of_year(year)?;
        let logs = store.fetch_daily_logs(&DailyLogFilter::all().user(user_id).within(window))?;
        Ok(logs.into_iter().map(|l| (l.date, l.hours_worked)).collect())
    }
}
