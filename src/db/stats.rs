use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

/// Record counts and date range of the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbCounts {
    pub users: i64,
    pub daily_logs: i64,
    pub tasks: i64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

pub fn db_counts(pool: &DbPool) -> rusqlite::Result<DbCounts> {
    let count = |table: &str| -> rusqlite::Result<i64> {
        pool.conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
    };

    let (first_date, last_date) = pool
        .conn
        .query_row(
            "SELECT MIN(date), MAX(date) FROM daily_logs",
            [],
            |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                ))
            },
        )
        .optional()?
        .unwrap_or((None, None));

    Ok(DbCounts {
        users: count("users")?,
        daily_logs: count("daily_logs")?,
        tasks: count("tasks")?,
        first_date,
        last_date,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    let counts = db_counts(pool)?;
    println!("{}• Users:{} {}{}{}", CYAN, RESET, GREEN, counts.users, RESET);
    println!(
        "{}• Daily logs:{} {}{}{}",
        CYAN, RESET, GREEN, counts.daily_logs, RESET
    );
    println!("{}• Tasks:{} {}{}{}", CYAN, RESET, GREEN, counts.tasks, RESET);

    let dash = format!("{GREY}--{RESET}");
    println!("{}• Date range:{}", CYAN, RESET);
    println!("    from: {}", counts.first_date.as_deref().unwrap_or(&dash));
    println!("    to:   {}", counts.last_date.as_deref().unwrap_or(&dash));

    println!();
    Ok(())
}
