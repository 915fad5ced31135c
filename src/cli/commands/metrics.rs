use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::Aggregator;
use crate::core::users::UserLogic;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_progress};
use crate::utils::date::parse_optional_date;
use crate::utils::format_hours;
use crate::utils::formatting::{pad_left, pad_right, progress_bar};

const BAR_WIDTH: usize = 20;

fn print_row(label: &str, value: f64, target: Option<f64>, percent: Option<f64>) {
    let value = pad_left(&format_hours(value), 7);
    match (target, percent) {
        (Some(target), Some(p)) => println!(
            "{} {} / {:<6} {}{} {:>3.0}%{}",
            pad_right(label, 6),
            value,
            format_hours(target),
            color_for_progress(p),
            progress_bar(p, BAR_WIDTH),
            p,
            RESET
        ),
        _ => println!("{} {}", pad_right(label, 6), value),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Metrics { user, date, json } = cmd {
        let today = parse_optional_date(date.as_ref())?;
        let pool = super::open_store(cfg)?;
        let user = UserLogic::resolve(&pool, *user, cfg.default_user)?;

        let m = Aggregator::dashboard(&pool, user.id, today, cfg.targets())?;
        if *json {
            return super::print_json(&m);
        }

        header(format!("{} · {}", user.name, today));
        print_row(
            "Today",
            m.today,
            Some(m.targets.daily),
            Some(m.daily_progress()),
        );
        print_row(
            "Week",
            m.week,
            Some(m.targets.weekly),
            Some(m.weekly_progress()),
        );
        print_row(
            "Month",
            m.month,
            Some(m.targets.monthly),
            Some(m.monthly_progress()),
        );
        print_row("Year", m.year, None, None);
    }

    Ok(())
}
