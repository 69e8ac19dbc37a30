//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Diem - Track your days
#[derive(Parser)]
#[command(name = "diem")]
#[command(about = "Self-hosted personal life tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "diem.db", global = true)]
    pub db: PathBuf,

    /// User whose entries are read and written
    #[arg(long, env = "DIEM_USER", default_value = "local", global = true)]
    pub user: String,

    /// Preferences file (defaults to ~/.local/share/diem/config/preferences.toml)
    #[arg(long, global = true)]
    pub prefs: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set DIEM_DB_KEY environment variable with your passphrase.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Show entry counts per tracker
    Status,

    /// Manage habits
    Habits {
        #[command(subcommand)]
        action: Option<HabitsAction>,
    },

    /// Log an entry
    Log {
        #[command(subcommand)]
        entry: LogEntry,
    },

    /// List entries of one tracker
    Entries {
        /// Tracker (habit, sleep, study, fitness, task, meal, mood, calendar,
        /// finance, gratitude, reflection, water)
        kind: String,

        /// Maximum number of entries
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Delete an entry
    Delete {
        /// Tracker of the entry
        kind: String,

        /// Entry ID
        id: i64,
    },

    /// Dashboard statistics and insights
    Stats {
        /// Period: week, month, year
        #[arg(short, long, default_value = "week")]
        period: String,

        /// Custom range start (YYYY-MM-DD), requires --to
        #[arg(long)]
        from: Option<String>,

        /// Custom range end (YYYY-MM-DD), requires --from
        #[arg(long)]
        to: Option<String>,
    },

    /// Current and longest streaks
    Streaks,

    /// Finance totals and category breakdowns
    Finance {
        /// Period: week, month, year (whole history if omitted)
        #[arg(short, long)]
        period: Option<String>,

        /// Custom range start (YYYY-MM-DD), requires --to
        #[arg(long)]
        from: Option<String>,

        /// Custom range end (YYYY-MM-DD), requires --from
        #[arg(long)]
        to: Option<String>,
    },

    /// Summary of every tracker
    Overview {
        /// Period: week, month, year
        #[arg(short, long, default_value = "week")]
        period: String,
    },

    /// Export data
    Export {
        #[command(subcommand)]
        what: ExportWhat,
    },

    /// Import a full JSON export
    Import {
        /// Export file
        #[arg(short, long)]
        file: PathBuf,

        /// Remove existing entries first
        #[arg(long)]
        clear: bool,
    },

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },

    /// Recent audit log entries
    Audit {
        /// Number of entries
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory of static UI files
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum HabitsAction {
    /// List habits with streaks
    List,

    /// Add a habit
    Add {
        /// Habit name
        name: String,

        /// daily, weekly, monthly
        #[arg(short, long, default_value = "daily")]
        frequency: String,
    },

    /// Toggle completion for a day (today by default)
    Toggle {
        /// Habit ID
        id: i64,

        /// Day to toggle (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Delete a habit
    Delete {
        /// Habit ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum LogEntry {
    /// Hours slept
    Sleep {
        hours: f64,

        /// Quality 1-5
        #[arg(short, long, default_value = "3")]
        quality: u8,

        /// Day (YYYY-MM-DD, today by default)
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Hours studied
    Study {
        subject: String,
        hours: f64,

        #[arg(long, default_value = "")]
        topic: String,

        #[arg(long)]
        date: Option<String>,
    },

    /// Mood rating 1-10
    Mood {
        rating: u8,

        /// Emotions (comma-separated)
        #[arg(short, long)]
        emotions: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Glasses of water
    Water {
        glasses: u32,

        #[arg(short, long, default_value = "8")]
        goal: u32,

        #[arg(long)]
        date: Option<String>,
    },

    /// Income or expense
    Finance {
        /// income or expense
        kind: String,
        amount: f64,
        category: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// cash, card, transfer, other
        #[arg(long, default_value = "card")]
        payment: String,

        #[arg(long)]
        date: Option<String>,
    },

    /// Things you are grateful for
    Gratitude {
        /// Items (up to 10)
        #[arg(required = true)]
        items: Vec<String>,

        #[arg(long, default_value = "")]
        highlight: String,

        /// amazing, good, okay, rough
        #[arg(short, long, default_value = "good")]
        mood: String,

        #[arg(long)]
        date: Option<String>,
    },

    /// Any tracker entry as a JSON document
    Json {
        /// Tracker kind
        kind: String,

        /// JSON object, e.g. '{"date": "2024-01-01", "calories": 500}'
        data: String,
    },
}

#[derive(Subcommand)]
pub enum ExportWhat {
    /// Finance entries as CSV
    Finance {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Period: week, month, year (whole history if omitted)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Every tracker as JSON
    Full {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show preferences
    Show,

    /// Set the color theme (green, blue, dark, cyberpunk)
    Theme { name: String },

    /// Enable a tracker
    Enable { tracker: String },

    /// Disable a tracker
    Disable { tracker: String },
}
