//! Diem CLI - Personal life tracker
//!
//! Usage:
//!   diem init                       Initialize database
//!   diem log sleep 7.5 -q 4         Log an entry
//!   diem stats --period month       Dashboard statistics and insights
//!   diem serve --port 3000          Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user.as_str();
    let prefs = cli.prefs.as_deref();
    let open = || commands::open_db(&cli.db, cli.no_encrypt);

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Status => commands::cmd_status(&open()?, user, prefs),
        Commands::Habits { action } => {
            let db = open()?;
            match action {
                None | Some(HabitsAction::List) => commands::cmd_habits_list(&db, user),
                Some(HabitsAction::Add { name, frequency }) => {
                    commands::cmd_habits_add(&db, user, &name, &frequency)
                }
                Some(HabitsAction::Toggle { id, date }) => {
                    commands::cmd_habits_toggle(&db, user, id, date.as_deref())
                }
                Some(HabitsAction::Delete { id }) => commands::cmd_habits_delete(&db, user, id),
            }
        }
        Commands::Log { entry } => commands::cmd_log(&open()?, user, entry).map(|_| ()),
        Commands::Entries { kind, limit } => commands::cmd_entries(&open()?, user, &kind, limit),
        Commands::Delete { kind, id } => commands::cmd_delete(&open()?, user, &kind, id),
        Commands::Stats { period, from, to } => commands::cmd_stats(
            &open()?,
            user,
            &period,
            from.as_deref(),
            to.as_deref(),
        ),
        Commands::Streaks => commands::cmd_streaks(&open()?, user),
        Commands::Finance { period, from, to } => commands::cmd_finance(
            &open()?,
            user,
            period.as_deref(),
            from.as_deref(),
            to.as_deref(),
        ),
        Commands::Overview { period } => commands::cmd_overview(&open()?, user, &period),
        Commands::Export { what } => {
            let db = open()?;
            match what {
                ExportWhat::Finance { output, period } => {
                    commands::cmd_export_finance(&db, user, output.as_deref(), period.as_deref())
                }
                ExportWhat::Full { output } => commands::cmd_export_full(&db, user, &output),
            }
        }
        Commands::Import { file, clear } => commands::cmd_import(&open()?, user, &file, clear).map(|_| ()),
        Commands::Audit { limit } => commands::cmd_audit(&open()?, user, limit),
        Commands::Prefs { action } => match action {
            None | Some(PrefsAction::Show) => commands::cmd_prefs_show(prefs),
            Some(PrefsAction::Theme { name }) => commands::cmd_prefs_theme(prefs, &name),
            Some(PrefsAction::Enable { tracker }) => {
                commands::cmd_prefs_set_enabled(prefs, &tracker, true)
            }
            Some(PrefsAction::Disable { tracker }) => {
                commands::cmd_prefs_set_enabled(prefs, &tracker, false)
            }
        },
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
                prefs,
            )
            .await
        }
    }
}
