//! Save path for one day: brings the persisted tasks of a DailyLog in line
//! with the list the user edited.
//!
//! The sequence is not transactional. Each store call either succeeds or
//! the whole sync stops with the classified error, leaving whatever was
//! already applied in place. Calling `sync` again with the same request is
//! safe: updates and deletes are by id, and new tasks are keyed by their
//! placeholder id, so a second run overwrites instead of duplicating.
//!
//! Versioned requests replay too. A record found at exactly one version
//! past the expected one and already holding the requested values is the
//! write of the interrupted run; it is accepted without writing again.
//! Any other version mismatch is a stale write.

use crate::db::store::{DailyLogFilter, RecordStore, TaskFilter};
use crate::errors::{AppResult, StoreError};
use crate::models::daily_log::{DailyLog, DailyLogPatch, NewDailyLog};
use crate::models::task::{EditedTask, NewTask, Task, TaskId, TaskPatch};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Everything the user submitted for one (user, date).
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    /// Known DailyLog id, if the caller already loaded one.
    pub daily_log_id: Option<i64>,
    pub user_id: i64,
    pub date: NaiveDate,
    /// Raw hours input, parsed leniently by `parse_hours`.
    pub hours: String,
    pub notes: String,
    pub tasks: Vec<EditedTask>,
    /// Version of the DailyLog the edit started from, if known.
    pub expected_version: Option<i64>,
}

/// Authoritative post-sync state plus what changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncResult {
    pub daily_log: DailyLog,
    pub tasks: Vec<Task>,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Placeholders dropped because their name was blank.
    pub dropped: usize,
    pub log_created: bool,
}

impl SyncResult {
    /// Caller-facing summary of the save.
    pub fn message(&self) -> String {
        if self.created > 0 {
            format!(
                "{} new task{} added successfully!",
                self.created,
                if self.created > 1 { "s" } else { "" }
            )
        } else if self.log_created {
            "Work log created and saved successfully!".to_string()
        } else {
            "Your progress has been saved successfully!".to_string()
        }
    }
}

/// A single task write, in the order the user listed the tasks.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOp {
    Insert { client_key: String, task: EditedTask },
    Update { id: i64, task: EditedTask },
}

/// Diff between persisted and edited tasks of one DailyLog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPlan {
    pub to_delete: Vec<i64>,
    pub ops: Vec<TaskOp>,
    pub dropped: usize,
    /// Edited ids that are not attached to this DailyLog.
    pub foreign: Vec<i64>,
}

/// `current` is `expected` plus one write, and that write was this one.
fn is_replayed(expected: Option<i64>, current: i64, same_values: bool) -> bool {
    same_values && expected.is_some_and(|v| current == v + 1)
}

/// Hours typed by the user. Anything that is not a finite, non-negative
/// number counts as 0.
pub fn parse_hours(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(h) if h.is_finite() && h >= 0.0 => h,
        _ => 0.0,
    }
}

pub struct Reconciler;

impl Reconciler {
    /// Compute the writes needed to turn `persisted` into `edited`.
    pub fn plan(persisted: &[Task], edited: &[EditedTask]) -> SyncPlan {
        let persisted_ids: HashSet<i64> = persisted.iter().map(|t| t.id).collect();

        let placeholder_keys: HashSet<&str> = edited
            .iter()
            .filter(|t| t.has_name())
            .filter_map(|t| match &t.id {
                TaskId::Placeholder(key) => Some(key.as_str()),
                TaskId::Persisted(_) => None,
            })
            .collect();

        let mut keep: HashSet<i64> = edited.iter().filter_map(|t| t.id.persisted()).collect();
        // Rows already created from one of the placeholders by an earlier,
        // interrupted sync.
        keep.extend(
            persisted
                .iter()
                .filter(|t| {
                    t.client_key
                        .as_deref()
                        .is_some_and(|k| placeholder_keys.contains(k))
                })
                .map(|t| t.id),
        );

        let mut plan = SyncPlan {
            to_delete: persisted
                .iter()
                .map(|t| t.id)
                .filter(|id| !keep.contains(id))
                .collect(),
            ..SyncPlan::default()
        };

        for task in edited {
            match &task.id {
                TaskId::Placeholder(key) => {
                    if task.has_name() {
                        plan.ops.push(TaskOp::Insert {
                            client_key: key.clone(),
                            task: task.clone(),
                        });
                    } else {
                        plan.dropped += 1;
                    }
                }
                TaskId::Persisted(id) => {
                    if persisted_ids.contains(id) {
                        plan.ops.push(TaskOp::Update {
                            id: *id,
                            task: task.clone(),
                        });
                    } else if !plan.foreign.contains(id) {
                        plan.foreign.push(*id);
                    }
                }
            }
        }

        plan
    }

    /// Save one day: upsert the DailyLog, then delete, insert and update
    /// tasks, then re-read the result from the store.
    pub fn sync<S: RecordStore + ?Sized>(store: &S, req: &SyncRequest) -> AppResult<SyncResult> {
        let hours_worked = parse_hours(&req.hours);

        // 1) DailyLog: create or overwrite in place
        let (log, log_created) = Self::upsert_daily_log(store, req, hours_worked)?;

        // 2) Tasks currently attached to it
        let persisted = store.fetch_tasks(&TaskFilter::for_log(log.id))?;

        let plan = Self::plan(&persisted, &req.tasks);
        if !plan.foreign.is_empty() {
            let ids: Vec<String> = plan.foreign.iter().map(|id| id.to_string()).collect();
            return Err(StoreError::foreign_reference(format!(
                "task(s) {} are not attached to work log {}",
                ids.join(", "),
                log.id
            ))
            .into());
        }

        // 3) Removed tasks, one batch
        let deleted = if plan.to_delete.is_empty() {
            0
        } else {
            store.delete_tasks(&plan.to_delete)?
        };

        // 4) New and existing tasks, in list order
        let by_id: HashMap<i64, &Task> = persisted.iter().map(|t| (t.id, t)).collect();
        let mut created = 0;
        let mut updated = 0;
        for op in &plan.ops {
            match op {
                TaskOp::Insert { client_key, task } => {
                    store.insert_task(&NewTask {
                        work_log_id: log.id,
                        user_id: log.user_id,
                        task_name: task.task_name.clone(),
                        description: task.normalized_description(),
                        status: task.status,
                        client_key: Some(client_key.clone()),
                    })?;
                    created += 1;
                }
                TaskOp::Update { id, task } => {
                    let patch = TaskPatch {
                        task_name: task.task_name.clone(),
                        description: task.normalized_description(),
                        status: task.status,
                        expected_version: task.version,
                    };
                    let replayed = by_id.get(id).is_some_and(|current| {
                        is_replayed(
                            patch.expected_version,
                            current.version,
                            current.task_name == patch.task_name
                                && current.description == patch.description
                                && current.status == patch.status,
                        )
                    });
                    if !replayed {
                        store.update_task(*id, &patch)?;
                    }
                    updated += 1;
                }
            }
        }

        // 5) Authoritative state
        let daily_log = store
            .fetch_daily_logs(&DailyLogFilter::all().id(log.id))?
            .into_iter()
            .next()
            .ok_or_else(|| {
                StoreError::stale(format!("work log {} disappeared during save", log.id))
            })?;
        let tasks = store.fetch_tasks(&TaskFilter::for_log(log.id))?;

        Ok(SyncResult {
            daily_log,
            tasks,
            created,
            updated,
            deleted,
            dropped: plan.dropped,
            log_created,
        })
    }

    fn upsert_daily_log<S: RecordStore + ?Sized>(
        store: &S,
        req: &SyncRequest,
        hours_worked: f64,
    ) -> AppResult<(DailyLog, bool)> {
        let existing = match req.daily_log_id {
            Some(id) => {
                let log = store
                    .fetch_daily_logs(&DailyLogFilter::all().id(id))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| {
                        StoreError::foreign_reference(format!("work log {} does not exist", id))
                    })?;
                if log.user_id != req.user_id || log.date != req.date {
                    return Err(StoreError::foreign_reference(format!(
                        "work log {} belongs to user {} on {}, not user {} on {}",
                        id,
                        log.user_id,
                        log.date_str(),
                        req.user_id,
                        req.date.format("%Y-%m-%d")
                    ))
                    .into());
                }
                Some(log)
            }
            None => store
                .fetch_daily_logs(&DailyLogFilter::all().user(req.user_id).on(req.date))?
                .into_iter()
                .next(),
        };

        match existing {
            Some(log) => {
                let patch = DailyLogPatch {
                    hours_worked,
                    notes: req.notes.clone(),
                    expected_version: req.expected_version,
                };
                let same_values =
                    log.hours_worked == patch.hours_worked && log.notes == patch.notes;
                if !is_replayed(patch.expected_version, log.version, same_values) {
                    store.update_daily_log(log.id, &patch)?;
                }
                Ok((log, false))
            }
            None => {
                let log = store.insert_daily_log(&NewDailyLog {
                    user_id: req.user_id,
                    date: req.date,
                    hours_worked,
                    notes: req.notes.clone(),
                })?;
                Ok((log, true))
            }
        }
    }
}
