//! Data-access boundary used by the core.
//!
//! The reconciler and the aggregator only talk to a `RecordStore`; the
//! SQLite implementation lives in `db::queries`. Every call is a single
//! blocking round trip and is the only place where the core waits.

use crate::core::window::DateWindow;
use crate::errors::StoreResult;
use crate::models::daily_log::{DailyLog, DailyLogPatch, NewDailyLog};
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::models::user::{NewUser, User};
use chrono::NaiveDate;
use std::fmt;

/// The three record kinds the store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    User,
    DailyLog,
    Task,
}

impl RecordKind {
    pub fn table(&self) -> &'static str {
        match self {
            RecordKind::User => "users",
            RecordKind::DailyLog => "daily_logs",
            RecordKind::Task => "tasks",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::User => "user",
            RecordKind::DailyLog => "daily log",
            RecordKind::Task => "task",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub id: Option<i64>,
}

impl UserFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: i64) -> Self {
        Self { id: Some(id) }
    }
}

/// Equality and range predicates on daily logs. Results are ordered by
/// (date, id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyLogFilter {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub window: Option<DateWindow>,
}

impl DailyLogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }
}

/// Task predicates. Results are ordered by (created_at, id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub work_log_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl TaskFilter {
    pub fn for_log(work_log_id: i64) -> Self {
        Self {
            work_log_id: Some(work_log_id),
            user_id: None,
        }
    }
}

pub trait RecordStore {
    fn fetch_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>>;

    fn insert_user(&self, user: &NewUser) -> StoreResult<User>;

    fn fetch_daily_logs(&self, filter: &DailyLogFilter) -> StoreResult<Vec<DailyLog>>;

    /// Fails with a uniqueness conflict when (user, date) already exists.
    fn insert_daily_log(&self, log: &NewDailyLog) -> StoreResult<DailyLog>;

    /// Overwrites hours and notes. A missing row is a no-op unless the
    /// patch carries an expected version, in which case it is a stale write.
    fn update_daily_log(&self, id: i64, patch: &DailyLogPatch) -> StoreResult<()>;

    fn fetch_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>>;

    /// Inserts a task. A task carrying a `client_key` already stored under
    /// the same daily log is overwritten instead of duplicated.
    fn insert_task(&self, task: &NewTask) -> StoreResult<Task>;

    /// Same missing-row and version rules as `update_daily_log`.
    fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<()>;

    /// Idempotent: ids that are already gone are ignored.
    fn delete_tasks(&self, ids: &[i64]) -> StoreResult<usize>;
}
