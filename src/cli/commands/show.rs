use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::users::UserLogic;
use crate::db::store::{DailyLogFilter, RecordStore, TaskFilter};
use crate::errors::AppResult;
use crate::models::task::EditedTask;
use crate::ui::messages::{header, info};
use crate::utils::colors::{GREEN, GREY, RESET};
use crate::utils::date::parse_date_arg;
use crate::utils::format_hours;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Show { date, user, json } = cmd {
        let day = parse_date_arg(date)?;
        let pool = super::open_store(cfg)?;
        let user = UserLogic::resolve(&pool, *user, cfg.default_user)?;

        let log = pool
            .fetch_daily_logs(&DailyLogFilter::all().user(user.id).on(day))?
            .into_iter()
            .next();
        let tasks = match &log {
            Some(l) => pool.fetch_tasks(&TaskFilter::for_log(l.id))?,
            None => Vec::new(),
        };

        if *json {
            let edited: Vec<EditedTask> = tasks.iter().map(EditedTask::from).collect();
            return super::print_json(&edited);
        }

        let Some(log) = log else {
            info(format!("Nothing saved for {} on {}.", user.name, day));
            return Ok(());
        };

        header(format!("{} · {}", user.name, log.date_str()));
        println!("Hours : {}", format_hours(log.hours_worked));
        if !log.notes.is_empty() {
            println!("Notes : {}", log.notes);
        }
        println!();

        if tasks.is_empty() {
            println!("{}No tasks.{}", GREY, RESET);
            return Ok(());
        }

        let mut table = Table::new(vec!["ID", "TASK", "STATUS", "DESCRIPTION"]);
        for t in &tasks {
            table.add_row(vec![
                t.id.to_string(),
                t.task_name.clone(),
                t.status.to_db_str().to_string(),
                t.description.clone().unwrap_or_default(),
            ]);
        }
        print!("{}", table.render());

        let finished = tasks.iter().filter(|t| t.status.is_finished()).count();
        println!(
            "\n{}{}/{} tasks finished{}",
            GREEN,
            finished,
            tasks.len(),
            RESET
        );
    }

    Ok(())
}
