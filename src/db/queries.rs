//! SQLite implementation of `RecordStore`.

use crate::db::pool::DbPool;
use crate::db::store::{DailyLogFilter, RecordKind, RecordStore, TaskFilter, UserFilter};
use crate::errors::{AppError, StoreError, StoreResult};
use crate::models::daily_log::{DailyLog, DailyLogPatch, NewDailyLog};
use crate::models::task::{NewTask, Task, TaskPatch};
use crate::models::task_status::TaskStatus;
use crate::models::user::{NewUser, User};
use chrono::{Local, NaiveDate};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params, params_from_iter};

const USER_COLUMNS: &str = "id, name, email, created_at";
const DAILY_LOG_COLUMNS: &str =
    "id, user_id, date, hours_worked, notes, version, created_at, updated_at";
const TASK_COLUMNS: &str = "id, work_log_id, user_id, task_name, description, status, \
     client_key, version, created_at, updated_at";

fn now() -> String {
    Local::now().to_rfc3339()
}

fn date_param(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn map_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
    })
}

pub fn map_daily_log_row(row: &Row) -> rusqlite::Result<DailyLog> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(DailyLog {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date,
        hours_worked: row.get("hours_worked")?,
        notes: row.get("notes")?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn map_task_row(row: &Row) -> rusqlite::Result<Task> {
    let status_str: String = row.get("status")?;
    let status = TaskStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(Task {
        id: row.get("id")?,
        work_log_id: row.get("work_log_id")?,
        user_id: row.get("user_id")?,
        task_name: row.get("task_name")?,
        description: row.get("description")?,
        status,
        client_key: row.get("client_key")?,
        version: row.get("version")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Append `WHERE a AND b ...` to `sql` when there are conditions.
fn push_conditions(sql: &mut String, conditions: &[&str]) {
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
}

/// Turn "0 rows changed" into the right outcome for a versioned update.
fn check_versioned_update(
    conn: &Connection,
    kind: RecordKind,
    id: i64,
    changed: usize,
    expected_version: Option<i64>,
) -> StoreResult<()> {
    if changed > 0 {
        return Ok(());
    }
    let Some(expected) = expected_version else {
        return Ok(());
    };

    let sql = format!("SELECT version FROM {} WHERE id = ?1", kind.table());
    let current: Option<i64> = conn.query_row(&sql, [id], |row| row.get(0)).optional()?;

    Err(match current {
        Some(v) => StoreError::stale(format!(
            "{} {} is at version {}, expected {}",
            kind, id, v, expected
        )),
        None => StoreError::stale(format!("{} {} no longer exists", kind, id)),
    })
}

impl DbPool {
    fn task_by_id(&self, id: i64) -> StoreResult<Task> {
        let sql = format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], map_task_row)?)
    }

    fn daily_log_by_id(&self, id: i64) -> StoreResult<DailyLog> {
        let sql = format!("SELECT {} FROM daily_logs WHERE id = ?1", DAILY_LOG_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], map_daily_log_row)?)
    }
}

impl RecordStore for DbPool {
    fn fetch_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut sql = format!("SELECT {} FROM users", USER_COLUMNS);
        let mut conditions = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(id) = filter.id {
            conditions.push("id = ?");
            values.push(Box::new(id));
        }
        push_conditions(&mut sql, &conditions);
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_user_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_user(&self, user: &NewUser) -> StoreResult<User> {
        self.conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![user.name, user.email, now()],
        )?;
        let id = self.conn.last_insert_rowid();

        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        Ok(self.conn.query_row(&sql, [id], map_user_row)?)
    }

    fn fetch_daily_logs(&self, filter: &DailyLogFilter) -> StoreResult<Vec<DailyLog>> {
        let mut sql = format!("SELECT {} FROM daily_logs", DAILY_LOG_COLUMNS);
        let mut conditions = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(id) = filter.id {
            conditions.push("id = ?");
            values.push(Box::new(id));
        }
        if let Some(user_id) = filter.user_id {
            conditions.push("user_id = ?");
            values.push(Box::new(user_id));
        }
        if let Some(date) = &filter.date {
            conditions.push("date = ?");
            values.push(Box::new(date_param(date)));
        }
        if let Some(window) = &filter.window {
            conditions.push("date >= ?");
            conditions.push("date <= ?");
            values.push(Box::new(window.start_str()));
            values.push(Box::new(window.end_str()));
        }
        push_conditions(&mut sql, &conditions);
        sql.push_str(" ORDER BY date ASC, id ASC");

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_daily_log_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_daily_log(&self, log: &NewDailyLog) -> StoreResult<DailyLog> {
        let ts = now();
        self.conn.execute(
            "INSERT INTO daily_logs (user_id, date, hours_worked, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                log.user_id,
                date_param(&log.date),
                log.hours_worked,
                log.notes,
                ts
            ],
        )?;
        self.daily_log_by_id(self.conn.last_insert_rowid())
    }

    fn update_daily_log(&self, id: i64, patch: &DailyLogPatch) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE daily_logs
             SET hours_worked = ?1, notes = ?2, version = version + 1, updated_at = ?3
             WHERE id = ?4 AND (?5 IS NULL OR version = ?5)",
            params![
                patch.hours_worked,
                patch.notes,
                now(),
                id,
                patch.expected_version
            ],
        )?;
        check_versioned_update(
            &self.conn,
            RecordKind::DailyLog,
            id,
            changed,
            patch.expected_version,
        )
    }

    fn fetch_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<Task>> {
        let mut sql = format!("SELECT {} FROM tasks", TASK_COLUMNS);
        let mut conditions = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(work_log_id) = filter.work_log_id {
            conditions.push("work_log_id = ?");
            values.push(Box::new(work_log_id));
        }
        if let Some(user_id) = filter.user_id {
            conditions.push("user_id = ?");
            values.push(Box::new(user_id));
        }
        push_conditions(&mut sql, &conditions);
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), map_task_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn insert_task(&self, task: &NewTask) -> StoreResult<Task> {
        let id: i64 = self.conn.query_row(
            "INSERT INTO tasks (work_log_id, user_id, task_name, description, status,
                                client_key, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT (work_log_id, client_key) DO UPDATE SET
                 task_name   = excluded.task_name,
                 description = excluded.description,
                 status      = excluded.status,
                 version     = tasks.version + 1,
                 updated_at  = excluded.updated_at
             RETURNING id",
            params![
                task.work_log_id,
                task.user_id,
                task.task_name,
                task.description,
                task.status.to_db_str(),
                task.client_key,
                now()
            ],
            |row| row.get(0),
        )?;
        self.task_by_id(id)
    }

    fn update_task(&self, id: i64, patch: &TaskPatch) -> StoreResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET task_name = ?1, description = ?2, status = ?3,
                 version = version + 1, updated_at = ?4
             WHERE id = ?5 AND (?6 IS NULL OR version = ?6)",
            params![
                patch.task_name,
                patch.description,
                patch.status.to_db_str(),
                now(),
                id,
                patch.expected_version
            ],
        )?;
        check_versioned_update(
            &self.conn,
            RecordKind::Task,
            id,
            changed,
            patch.expected_version,
        )
    }

    fn delete_tasks(&self, ids: &[i64]) -> StoreResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let mut sql = String::from("DELETE FROM tasks WHERE id IN (");
        sql.push_str(&vec!["?"; ids.len()].join(","));
        sql.push(')');

        let mut stmt = self.conn.prepare(&sql)?;
        Ok(stmt.execute(params_from_iter(ids.iter()))?)
    }
}
