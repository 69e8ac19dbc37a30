//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `cmd_init` - Initialize the database
//! - `cmd_status` - Entry counts per tracker
//! - `cmd_audit` - Recent audit log entries

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use diem_core::{db::Database, Preferences, TrackerKind};

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path is not valid UTF-8")?;
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Reference day for streaks, periods and default entry dates
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(today()),
    }
}

pub fn parse_kind(kind: &str) -> Result<TrackerKind> {
    kind.parse::<TrackerKind>().map_err(anyhow::Error::msg)
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path, no_encrypt)?;

    if no_encrypt {
        println!("   ⚠️  Encryption: DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Log something: diem log sleep 7.5 --quality 4");
    println!("  2. See your week: diem stats");
    println!("  3. Start web UI: diem serve");

    Ok(())
}

pub fn cmd_status(db: &Database, user: &str, prefs_path: Option<&Path>) -> Result<()> {
    let prefs = Preferences::load(prefs_path).context("Failed to load preferences")?;
    let counts = db.count_entries(user)?;

    println!("📊 Diem Status");
    println!();
    println!("   Database: {}", db.path());
    println!("   User:     {}", user);
    println!("   Theme:    {}", prefs.theme);
    println!();
    println!("   {:<12} {:>8}  {}", "Tracker", "Entries", "Enabled");
    println!("   {}", "-".repeat(32));

    for kind in TrackerKind::all() {
        println!(
            "   {:<12} {:>8}  {}",
            kind.title(),
            counts.get(kind).copied().unwrap_or(0),
            if prefs.is_enabled(*kind) { "yes" } else { "no" }
        );
    }

    let total: usize = counts.values().sum();
    println!();
    println!("   Total entries: {}", total);

    Ok(())
}

pub fn cmd_audit(db: &Database, user: &str, limit: i64) -> Result<()> {
    let entries = db.list_audit_log(user, limit.max(1))?;

    if entries.is_empty() {
        println!("No audit entries for {}.", user);
        return Ok(());
    }

    println!("{:<20} {:<16} {:<12} {:>6}  Details", "Time", "Action", "Entity", "ID");
    println!("{}", "-".repeat(72));
    for entry in entries {
        println!(
            "{:<20} {:<16} {:<12} {:>6}  {}",
            entry.timestamp,
            entry.action,
            entry.entity_type.as_deref().unwrap_or("-"),
            entry.entity_id.map(|id| id.to_string()).unwrap_or_default(),
            entry.details.as_deref().unwrap_or("")
        );
    }

    Ok(())
}
