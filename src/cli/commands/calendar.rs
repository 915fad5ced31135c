use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::Aggregator;
use crate::core::calendar::{CalendarGridBuilder, DAYS_PER_WEEK};
use crate::core::users::UserLogic;
use crate::errors::AppResult;
use crate::models::calendar::{CalendarCell, CalendarGrid, IntensityTier};
use crate::ui::messages::header;
use crate::utils::colors::{GREY, RESET, color_for_tier};
use crate::utils::date::current_year;
use crate::utils::format_hours;

const WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const CELL: &str = "■";

/// Month names placed over their week column; each column is two chars wide.
fn month_row(grid: &CalendarGrid) -> String {
    let mut row = vec![' '; grid.weeks.len() * 2 + 4];
    for label in &grid.month_labels {
        for (i, ch) in label.name.chars().enumerate() {
            if let Some(slot) = row.get_mut(label.week_index * 2 + i) {
                *slot = ch;
            }
        }
    }
    row.into_iter().collect::<String>().trim_end().to_string()
}

fn render(grid: &CalendarGrid) {
    println!("    {}", month_row(grid));

    for (d, name) in WEEKDAYS.iter().enumerate() {
        let mut line = format!("{} ", name);
        for week in &grid.weeks {
            match &week[d] {
                CalendarCell::Empty => line.push_str("  "),
                CalendarCell::Day { tier, .. } => {
                    line.push_str(&format!("{}{}{} ", color_for_tier(*tier), CELL, RESET))
                }
            }
        }
        println!("{}", line.trim_end());
    }

    let legend: String = [
        IntensityTier::None,
        IntensityTier::Low,
        IntensityTier::Medium,
        IntensityTier::High,
        IntensityTier::Max,
    ]
    .iter()
    .map(|t| format!("{}{}{} ", color_for_tier(*t), CELL, RESET))
    .collect();
    println!("\n    {}Less{} {}{}More{}", GREY, RESET, legend, GREY, RESET);
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Calendar { user, year, json } = cmd {
        let year = year.unwrap_or_else(current_year);
        let pool = super::open_store(cfg)?;
        let user = UserLogic::resolve(&pool, *user, cfg.default_user)?;

        let hours = Aggregator::hours_by_date(&pool, user.id, year)?;
        let grid = CalendarGridBuilder::build(year, &hours)?;

        if *json {
            return super::print_json(&grid);
        }

        header(format!("{} · {}", user.name, year));
        render(&grid);
        println!(
            "\n{} hours this year • {} active days",
            format_hours(grid.total_hours).trim_end_matches('h'),
            grid.active_days
        );
    }

    Ok(())
}
