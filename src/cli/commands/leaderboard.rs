use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::Aggregator;
use crate::core::window::{DateWindow, Period};
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{RESET, color_for_rank};
use crate::utils::date::parse_optional_date;
use crate::utils::format_hours;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Leaderboard { period, date, json } = cmd {
        let pool = super::open_store(cfg)?;

        let (title, board) = if period.trim().eq_ignore_ascii_case("all") {
            ("All time".to_string(), Aggregator::rank_all_time(&pool)?)
        } else {
            let period: Period = period.parse()?;
            let window = DateWindow::for_period(period, parse_optional_date(date.as_ref())?);
            (
                format!("This {} ({})", period, window),
                Aggregator::rank(&pool, &window)?,
            )
        };

        if *json {
            return super::print_json(&board);
        }

        header(format!("Leaderboard · {}", title));
        if board.is_empty() {
            info("No activity yet.");
            return Ok(());
        }

        let mut table = Table::new(vec!["#", "USER", "HOURS"]);
        for e in &board {
            table.add_row(vec![
                e.rank.to_string(),
                e.user_name.clone(),
                format_hours(e.total_hours),
            ]);
        }

        // colour the podium lines after layout so widths stay right
        for (i, line) in table.render().lines().enumerate() {
            let color = if i >= 2 {
                color_for_rank(i - 1)
            } else {
                RESET
            };
            println!("{}{}{}", color, line, RESET);
        }
    }

    Ok(())
}
