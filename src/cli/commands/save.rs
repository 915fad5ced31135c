use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::reconcile::{Reconciler, SyncRequest};
use crate::core::users::UserLogic;
use crate::db::log::audit;
use crate::db::store::{DailyLogFilter, RecordStore, TaskFilter};
use crate::errors::AppResult;
use crate::models::task::EditedTask;
use crate::ui::messages::{success, warning};
use crate::utils::date::parse_date_arg;
use std::fs;

/// Handle the `save` command: one full save of a day, hours, notes and tasks.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Save {
        date,
        user,
        hours,
        notes,
        tasks,
        add_task,
        remove_task,
    } = cmd
    {
        let day = parse_date_arg(date)?;
        let pool = super::open_store(cfg)?;
        let user = UserLogic::resolve(&pool, *user, cfg.default_user)?;

        let existing = pool
            .fetch_daily_logs(&DailyLogFilter::all().user(user.id).on(day))?
            .into_iter()
            .next();

        // Edited list: either a whole file, or the saved tasks with the
        // requested additions and removals.
        let edited: Vec<EditedTask> = match tasks {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                serde_json::from_str(&content)?
            }
            None => {
                let persisted = match &existing {
                    Some(log) => pool.fetch_tasks(&TaskFilter::for_log(log.id))?,
                    None => Vec::new(),
                };
                for id in remove_task {
                    if !persisted.iter().any(|t| t.id == *id) {
                        warning(format!("Task {} is not saved for {}; skipped.", id, day));
                    }
                }
                persisted
                    .iter()
                    .filter(|t| !remove_task.contains(&t.id))
                    .map(EditedTask::from)
                    .chain(add_task.iter().map(EditedTask::new))
                    .collect()
            }
        };

        let req = SyncRequest {
            daily_log_id: existing.as_ref().map(|l| l.id),
            user_id: user.id,
            date: day,
            hours: hours.clone().unwrap_or_else(|| {
                existing
                    .as_ref()
                    .map(|l| l.hours_worked.to_string())
                    .unwrap_or_else(|| "0".to_string())
            }),
            notes: notes.clone().unwrap_or_else(|| {
                existing
                    .as_ref()
                    .map(|l| l.notes.clone())
                    .unwrap_or_default()
            }),
            tasks: edited,
            expected_version: existing.as_ref().map(|l| l.version),
        };

        let result = Reconciler::sync(&pool, &req)?;

        if let Err(e) = audit(
            &pool.conn,
            "save",
            &result.daily_log.date_str(),
            &format!(
                "user {}: {}h, {} created, {} updated, {} deleted",
                user.id,
                result.daily_log.hours_worked,
                result.created,
                result.updated,
                result.deleted
            ),
        ) {
            warning(format!("Failed to write internal log: {}", e));
        }

        if result.dropped > 0 {
            warning(format!(
                "{} task(s) without a name were not saved.",
                result.dropped
            ));
        }
        success(result.message());
    }

    Ok(())
}
