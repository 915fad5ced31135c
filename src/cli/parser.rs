use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rDayDone
#[derive(Parser)]
#[command(
    name = "rdaydone",
    version = env!("CARGO_PKG_VERSION"),
    about = "Log daily hours and tasks; see totals, leaderboards, levels and a yearly activity calendar",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, info)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Add or list users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Save hours, notes and tasks for a day
    Save {
        /// Date of the log (YYYY-MM-DD or "today")
        date: String,

        #[arg(long = "user", help = "User id (default: configured or first user)")]
        user: Option<i64>,

        /// Hours worked; anything that is not a number is saved as 0
        #[arg(long = "hours", allow_hyphen_values = true)]
        hours: Option<String>,

        #[arg(long = "notes", help = "Free-text notes for the day")]
        notes: Option<String>,

        /// JSON file holding the full edited task list for the day
        #[arg(long = "tasks", value_name = "FILE", conflicts_with_all = ["add_task", "remove_task"])]
        tasks: Option<PathBuf>,

        /// Add a new task (repeatable)
        #[arg(long = "add-task", value_name = "NAME")]
        add_task: Vec<String>,

        /// Remove a saved task by id (repeatable)
        #[arg(long = "remove-task", value_name = "ID")]
        remove_task: Vec<i64>,
    },

    /// Show the saved log and tasks of a day
    Show {
        /// Date of the log (YYYY-MM-DD or "today")
        date: String,

        #[arg(long = "user")]
        user: Option<i64>,

        /// Print the task list as JSON, ready to edit and pass to `save --tasks`
        #[arg(long = "json")]
        json: bool,
    },

    /// Today / week / month / year totals against targets
    Metrics {
        #[arg(long = "user")]
        user: Option<i64>,

        #[arg(long = "date", help = "Reference date (default: today)")]
        date: Option<String>,

        #[arg(long = "json")]
        json: bool,
    },

    /// Rank users by hours over a period
    Leaderboard {
        #[arg(
            long = "period",
            default_value = "week",
            help = "day, week, month, year or all"
        )]
        period: String,

        #[arg(long = "date", help = "Reference date (default: today)")]
        date: Option<String>,

        #[arg(long = "json")]
        json: bool,
    },

    /// Points, rank and level of a user
    Stats {
        #[arg(long = "user")]
        user: Option<i64>,

        #[arg(long = "date", help = "Reference date for this week's points")]
        date: Option<String>,

        #[arg(long = "json")]
        json: bool,
    },

    /// Yearly activity calendar
    Calendar {
        #[arg(long = "user")]
        user: Option<i64>,

        #[arg(long = "year")]
        year: Option<i32>,

        #[arg(long = "json")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add a new user
    Add { name: String, email: String },

    /// List users
    List {
        #[arg(long = "json")]
        json: bool,
    },
}
