use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        info,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;

        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let applied = run_pending_migrations(&pool.conn)?;
            println!(
                "{}✔ Migration completed ({} applied).{}\n",
                GREEN, applied, RESET
            );
        }

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
            let fk_violations: i64 = pool.conn.query_row(
                "SELECT COUNT(*) FROM pragma_foreign_key_check",
                [],
                |row| row.get(0),
            )?;

            if integrity == "ok" && fk_violations == 0 {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!(
                    "{}✘ Integrity check failed:{} {} ({} foreign key violations)\n",
                    RED, RESET, integrity, fk_violations
                );
            }
        }
    }

    Ok(())
}
