#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use rdaydone::config::HOME_ENV;
use rdaydone::core::users::UserLogic;
use rdaydone::db::initialize::init_db;
use rdaydone::db::pool::DbPool;
use rdaydone::db::store::{DailyLogFilter, RecordStore, TaskFilter, UserFilter};
use rdaydone::errors::{StoreError, StoreErrorKind, StoreResult};
use rdaydone::models::daily_log::{DailyLog, DailyLogPatch, NewDailyLog};
use rdaydone::models::task::{NewTask, Task, TaskPatch};
use rdaydone::models::user::{NewUser, User};
use std::cell::{Cell, RefCell};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test, with its config directory redirected to a temp dir.
pub fn rdd() -> Command {
    let mut home: PathBuf = env::temp_dir();
    home.push("rdaydone_test_home");

    let mut cmd = cargo_bin_cmd!("rdaydone");
    cmd.env(HOME_ENV, home);
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rdaydone.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Init a DB through the CLI and add one user to it.
pub fn init_db_with_user(db_path: &str, name: &str, email: &str) {
    rdd()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rdd()
        .args(["--db", db_path, "user", "add", name, email])
        .assert()
        .success();
}

/// Fresh in-memory store with the full schema.
pub fn open_store() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn seed_user(store: &impl RecordStore, name: &str) -> User {
    let email = format!("{}@example.com", name.to_lowercase());
    UserLogic::add(store, name, &email).expect("add user")
}

pub fn seed_log(store: &impl RecordStore, user_id: i64, date: &str, hours: f64) -> DailyLog {
    store
        .insert_daily_log(&NewDailyLog {
            user_id,
            date: d(date),
            hours_worked: hours,
            notes: String::new(),
        })
        .expect("insert daily log")
}

/// Wraps a real store, counts the writes that reach it, and can fail a
/// chosen task insert with a transport error.
pub struct CountingStore<'a> {
    pub inner: &'a DbPool,
    pub task_insert_attempts: Cell<usize>,
    pub task_inserts: Cell<usize>,
    pub task_updates: Cell<usize>,
    pub delete_calls: Cell<usize>,
    pub deleted_ids: RefCell<Vec<i64>>,
    /// 1-based attempt number that fails.
    pub fail_task_insert_at: Cell<Option<usize>>,
}

impl<'a> CountingStore<'a> {
    pub fn new(inner: &'a DbPool) -> Self {
        Self {
            inner,
            task_insert_attempts: Cell::new(0),
            task_inserts: Cell::new(0),
            task_updates: Cell::new(0),
            delete_calls: Cell::new(0),
            deleted_ids: RefCell::new(Vec::new()),
            fail_task_insert_at: Cell::new(None),
        }
    }
}

impl RecordStore for CountingStore<'_> {
    fn fetch_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        self.inner.fetch_users(filter)
    }

    fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        self.inner.insert_user(user)
    }

    fn fetch_daily_logs(&self, filter: &DailyLogFilter) -> StoreResult<Vec<DailyLog>> {
        self.inner.fetch_daily_logs(filter)
    }

    fn insert_daily_log(&self, log: &NewDailyLog) -> StoreResult<DailyLog> {
        self.inner.insert_daily_log(log)
    }

    fn update_daily_log(&self, id: i64, patch: &DailyLogPatch) -> StoreResult<()> {
        self.inner.update_daily_log(id, patch)
    }

    fn fetch_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        self.inner.fetch_tasks(filter)
    }

    fn insert_task(&self, task: &NewTask) -> StoreResult<Task> {
        let attempt = self.task_insert_attempts.get() + 1;
        self.task_insert_attempts.set(attempt);
        if self.fail_task_insert_at.get() == Some(attempt) {
            return Err(StoreError::new(
                StoreErrorKind::Transport,
                "connection reset by peer",
            ));
        }
        let task = self.inner.insert_task(task)?;
        self.task_inserts.set(self.task_inserts.get() + 1);
        Ok(task)
    }

    fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<()> {
        self.inner.update_task(id, patch)?;
        self.task_updates.set(self.task_updates.get() + 1);
        Ok(())
    }

    fn delete_tasks(&self, ids: &[i64]) -> StoreResult<usize> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        self.deleted_ids.borrow_mut().extend_from_slice(ids);
        self.inner.delete_tasks(ids)
    }
}
