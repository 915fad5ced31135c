use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::users::UserLogic;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let pool = super::open_store(cfg)?;

        match action {
            UserAction::Add { name, email } => {
                let user = UserLogic::add(&pool, name, email)?;

                if let Err(e) = audit(
                    &pool.conn,
                    "user_add",
                    &format!("user {}", user.id),
                    &format!("Added {} <{}>", user.name, user.email),
                ) {
                    warning(format!("Failed to write internal log: {}", e));
                }

                success(format!("Added user {} (id {}).", user.name, user.id));
            }
            UserAction::List { json } => {
                let users = UserLogic::list(&pool)?;
                if *json {
                    return super::print_json(&users);
                }
                if users.is_empty() {
                    info("No users yet.");
                    return Ok(());
                }

                let mut table = Table::new(vec!["ID", "NAME", "EMAIL"]);
                for u in &users {
                    let marker = if cfg.default_user == Some(u.id) {
                        " *"
                    } else {
                        ""
                    };
                    table.add_row(vec![
                        format!("{}{}", u.id, marker),
                        u.name.clone(),
                        u.email.clone(),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
