use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for habitflow
/// CLI application to track daily habits with SQLite
#[derive(Parser)]
#[command(
    name = "habitflow",
    version = env!("CARGO_PKG_VERSION"),
    about = "A simple habit tracker: schedule habits, tick them off daily and follow your streaks",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the owner whose habits are shown and changed
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

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

    /// Create a new habit
    Add {
        /// Habit name
        name: String,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        emoji: Option<String>,

        #[arg(long = "color", value_name = "HEX", help = "Display color, e.g. #4CAF50")]
        color: Option<String>,

        /// Weekday numbers (1 = first day of the week), e.g. 1,3,5.
        /// Omit for an every-day habit.
        #[arg(long, value_delimiter = ',', value_name = "DAYS")]
        days: Option<Vec<u8>>,

        #[arg(long, default_value_t = 1, help = "Completions needed per day")]
        target: u32,

        #[arg(long, help = "Position in lists (default: last)")]
        order: Option<i32>,
    },

    /// Change an existing habit
    Edit {
        /// Habit id or name
        habit: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        emoji: Option<String>,

        #[arg(long = "color", value_name = "HEX")]
        color: Option<String>,

        #[arg(
            long,
            value_delimiter = ',',
            value_name = "DAYS",
            conflicts_with = "every_day",
            help = "Schedule on these weekday numbers only"
        )]
        days: Option<Vec<u8>>,

        #[arg(long = "every-day", help = "Schedule the habit on every day")]
        every_day: bool,

        #[arg(long)]
        target: Option<u32>,

        #[arg(long)]
        order: Option<i32>,
    },

    /// Hide a habit from today's list and stats
    Archive {
        /// Habit id or name
        habit: String,
    },

    /// Restore an archived habit
    Unarchive {
        /// Habit id or name
        habit: String,
    },

    /// Delete a habit and all of its logs
    Del {
        /// Habit id or name
        habit: String,
    },

    /// List habits
    List {
        #[arg(long, help = "Include archived habits")]
        all: bool,
    },

    /// Show the habits due today and their progress
    Today {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Show another day")]
        date: Option<String>,
    },

    /// Record one completion of a habit
    Done {
        /// Habit id or name
        habit: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,

        #[arg(long = "no-clamp", help = "Allow counting past the daily target")]
        no_clamp: bool,
    },

    /// Attach a note to a habit's day (empty text clears it)
    Note {
        /// Habit id or name
        habit: String,

        text: String,

        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<String>,
    },

    /// Show a habit's recent logs and streaks
    Show {
        /// Habit id or name
        habit: String,

        #[arg(long, help = "Number of days to look back")]
        days: Option<u32>,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Day to count back from")]
        date: Option<String>,
    },

    /// Completion statistics over a rolling window
    Stats {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Last day of the window")]
        date: Option<String>,

        #[arg(long, help = "Window length in days")]
        window: Option<u32>,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Export habit logs
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Output file path (absolute path required)")]
        file: String,

        #[arg(long, value_name = "YYYY-MM-DD", help = "Only logs on or after this day")]
        since: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Inspect the database
    Db {
        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Keep today's list on screen, refreshing whenever habits change
    Watch {
        #[arg(long, default_value_t = 2, help = "Polling interval in seconds")]
        interval: u64,
    },
}
