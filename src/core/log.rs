use crate::db::log::{AuditEntry, load_audit_log};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use ansi_term::Colour;
use regex::Regex;

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// Colour of an operation in the printed log.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "save" => Colour::Green,
        "user_add" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

/// `operation (target)`, coloured on the operation only and cut to
/// `MAX_OP_WIDTH` visible characters.
fn render_operation(re: &Regex, entry: &AuditEntry) -> String {
    let color = color_for_operation(&entry.operation);
    let plain = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let visible = strip_ansi(re, &plain);
    let cut = if visible.chars().count() > MAX_OP_WIDTH {
        let mut s: String = visible.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    match cut.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(cut.as_str()).to_string(),
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_audit_log(&pool.conn)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let re = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| AppError::Other(e.to_string()))?;

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        let rendered: Vec<String> = entries.iter().map(|e| render_operation(&re, e)).collect();
        let op_w = rendered
            .iter()
            .map(|op| strip_ansi(&re, op).chars().count())
            .max()
            .unwrap_or(10)
            .min(MAX_OP_WIDTH);

        println!("📜 Internal log:\n");

        for (entry, op) in entries.iter().zip(&rendered) {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&re, op).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                entry.id,
                entry.date,
                op,
                padding,
                entry.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
