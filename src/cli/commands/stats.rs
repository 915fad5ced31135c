use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregate::{Aggregator, POINTS_PER_LEVEL};
use crate::core::users::UserLogic;
use crate::errors::AppResult;
use crate::ui::messages::header;
use crate::utils::colors::{CYAN, MAGENTA, RESET, YELLOW};
use crate::utils::date::parse_optional_date;
use crate::utils::formatting::progress_bar;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stats { user, date, json } = cmd {
        let today = parse_optional_date(date.as_ref())?;
        let pool = super::open_store(cfg)?;
        let user = UserLogic::resolve(&pool, *user, cfg.default_user)?;

        let stats = Aggregator::user_stats(&pool, user.id, today)?;
        if *json {
            return super::print_json(&stats);
        }

        header(format!("{} · points", user.name));

        let rank = match stats.rank {
            Some(r) => format!("#{} of {}", r, stats.total_users),
            None => "unranked".to_string(),
        };

        println!("{}Total points :{} {:.1}", CYAN, RESET, stats.total_points);
        println!("{}Rank         :{} {}", CYAN, RESET, rank);
        println!(
            "{}This week    :{} {:.1}",
            CYAN, RESET, stats.this_week_points
        );

        let into_level = POINTS_PER_LEVEL - stats.level.points_to_next;
        println!(
            "{}Level        :{} {}{}{} {} {:.1} to next",
            CYAN,
            RESET,
            YELLOW,
            stats.level.level,
            RESET,
            progress_bar(into_level / POINTS_PER_LEVEL * 100.0, 20),
            stats.level.points_to_next
        );
        if stats.rank == Some(1) {
            println!("\n{}🏆 Top of the board!{}", MAGENTA, RESET);
        }
    }

    Ok(())
}
