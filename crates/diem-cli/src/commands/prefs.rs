//! Preference commands

use std::path::Path;

use anyhow::{Context, Result};
use diem_core::{Preferences, Theme, TrackerKind};

use super::parse_kind;

fn load(path: Option<&Path>) -> Result<Preferences> {
    Preferences::load(path).context("Failed to load preferences")
}

pub fn cmd_prefs_show(path: Option<&Path>) -> Result<()> {
    let prefs = load(path)?;

    println!("🎨 Theme: {}", prefs.theme);
    println!(
        "   Available: {}",
        Theme::all()
            .iter()
            .map(Theme::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();
    println!(
        "📋 Trackers ({} of {} enabled)",
        prefs.enabled_count(),
        TrackerKind::all().len()
    );
    for kind in TrackerKind::all() {
        let mark = if prefs.is_enabled(*kind) { "✓" } else { "✗" };
        println!("   {} {:<12} ({})", mark, kind.title(), kind);
    }

    Ok(())
}

pub fn cmd_prefs_theme(path: Option<&Path>, name: &str) -> Result<()> {
    let theme: Theme = name.parse().map_err(anyhow::Error::msg)?;
    let mut prefs = load(path)?;
    prefs.set_theme(theme);
    let saved = prefs.save(path)?;

    println!("✅ Theme set to {} ({})", theme, saved.display());
    Ok(())
}

pub fn cmd_prefs_set_enabled(path: Option<&Path>, tracker: &str, enabled: bool) -> Result<()> {
    let kind = parse_kind(tracker)?;
    let mut prefs = load(path)?;
    prefs.set_enabled(kind, enabled);
    let saved = prefs.save(path)?;

    println!(
        "✅ {} {} ({})",
        kind.title(),
        if enabled { "enabled" } else { "disabled" },
        saved.display()
    );
    Ok(())
}
