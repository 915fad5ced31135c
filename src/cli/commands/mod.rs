pub mod calendar;
pub mod config;
pub mod db;
pub mod init;
pub mod leaderboard;
pub mod log;
pub mod metrics;
pub mod save;
pub mod show;
pub mod stats;
pub mod user;

use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use serde::Serialize;

/// Open the configured database, applying pending migrations.
pub(crate) fn open_store(cfg: &Config) -> AppResult<DbPool> {
    open_db(&cfg.database)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
