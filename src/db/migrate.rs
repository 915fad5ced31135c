use crate::db::log::audit;
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// A schema step, applied once and recorded in the `log` table.
struct Migration {
    id: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20250901_0001_create_users",
        description: "Created users table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            created_at  TEXT NOT NULL
        );
        "#,
    },
    Migration {
        id: "20250901_0002_create_daily_logs",
        description: "Created daily_logs table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS daily_logs (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id       INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            date          TEXT NOT NULL,                 -- YYYY-MM-DD
            hours_worked  REAL NOT NULL DEFAULT 0 CHECK (hours_worked >= 0),
            notes         TEXT NOT NULL DEFAULT '',
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL,
            UNIQUE (user_id, date)
        );

        CREATE INDEX IF NOT EXISTS idx_daily_logs_date ON daily_logs(date);
        "#,
    },
    Migration {
        id: "20250901_0003_create_tasks",
        description: "Created tasks table",
        sql: r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            work_log_id  INTEGER NOT NULL REFERENCES daily_logs(id) ON DELETE CASCADE,
            user_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            task_name    TEXT NOT NULL,
            description  TEXT,
            status       TEXT NOT NULL DEFAULT 'Started'
                         CHECK (status IN ('Started','In Progress','Finished','Pending','On Hold')),
            created_at   TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_work_log ON tasks(work_log_id);
        "#,
    },
    Migration {
        id: "20251020_0004_add_record_versions",
        description: "Added version columns to daily_logs and tasks",
        sql: r#"
        ALTER TABLE daily_logs ADD COLUMN version INTEGER NOT NULL DEFAULT 1;
        ALTER TABLE tasks ADD COLUMN version INTEGER NOT NULL DEFAULT 1;
        "#,
    },
    Migration {
        id: "20251020_0005_add_task_client_key",
        description: "Added client_key to tasks for idempotent inserts",
        sql: r#"
        ALTER TABLE tasks ADD COLUMN client_key TEXT;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_tasks_client_key ON tasks(work_log_id, client_key);
        "#,
    },
];

/// Ensure that the `log` table exists; migrations are tracked in it.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, id: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([id], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql)?;
    audit(&tx, "migration_applied", migration.id, migration.description)?;
    tx.commit()?;

    success(format!(
        "Migration applied: {} → {}",
        migration.id, migration.description
    ));
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
/// Returns how many were applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for migration in MIGRATIONS {
        if is_applied(conn, migration.id)? {
            continue;
        }
        apply(conn, migration)?;
        applied += 1;
    }

    Ok(applied)
}

/// Ids of the migrations recorded as applied.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}
