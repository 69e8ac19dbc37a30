//! Habit commands

use anyhow::{bail, Result};
use diem_core::db::Database;
use diem_core::models::{HabitFrequency, HabitRecord};
use diem_core::stats::compute_streaks;
use diem_core::{RecordStore, TrackerKind};

use super::{parse_date, today};

pub fn cmd_habits_list(db: &Database, user: &str) -> Result<()> {
    let habits = db.list::<HabitRecord>(user)?;

    if habits.is_empty() {
        println!("No habits yet. Add one with: diem habits add \"Read 20 pages\"");
        return Ok(());
    }

    let today = today();
    println!(
        "{:>5}  {:<28} {:<8} {:>5} {:>8} {:>8}",
        "ID", "Habit", "Every", "Today", "Current", "Longest"
    );
    println!("{}", "-".repeat(68));

    for stored in &habits {
        let habit = &stored.record;
        let streak = compute_streaks(habit.completed_dates.iter().copied(), today);
        println!(
            "{:>5}  {:<28} {:<8} {:>5} {:>8} {:>8}",
            stored.id,
            truncate(&habit.name, 28),
            habit.frequency,
            if habit.is_completed_on(today) { "✓" } else { "·" },
            streak.current,
            streak.longest
        );
    }

    let done = habits
        .iter()
        .filter(|h| h.record.is_completed_on(today))
        .count();
    println!();
    println!("   {}/{} done today", done, habits.len());

    Ok(())
}

pub fn cmd_habits_add(db: &Database, user: &str, name: &str, frequency: &str) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Habit name is required");
    }
    let frequency: HabitFrequency = frequency.parse().map_err(anyhow::Error::msg)?;

    let id = db.insert(user, &HabitRecord::new(name, frequency))?;
    db.log_audit(user, "create", Some("habit"), Some(id), Some(name))?;

    println!("✅ Added habit #{}: {} ({})", id, name, frequency);
    Ok(())
}

pub fn cmd_habits_toggle(db: &Database, user: &str, id: i64, date: Option<&str>) -> Result<()> {
    let day = parse_date(date)?;
    let habit = db.toggle_habit(user, id, day, today())?;
    let done = habit.record.is_completed_on(day);

    db.log_audit(
        user,
        "toggle",
        Some("habit"),
        Some(id),
        Some(&format!("date={}, done={}", day, done)),
    )?;

    if done {
        println!(
            "✓ {} marked done for {} (streak: {})",
            habit.record.name, day, habit.record.streak
        );
    } else {
        println!(
            "· {} unmarked for {} (streak: {})",
            habit.record.name, day, habit.record.streak
        );
    }
    Ok(())
}

pub fn cmd_habits_delete(db: &Database, user: &str, id: i64) -> Result<()> {
    if !db.delete(user, TrackerKind::Habit, id)? {
        bail!("Habit {} not found", id);
    }
    db.log_audit(user, "delete", Some("habit"), Some(id), None)?;

    println!("🗑  Deleted habit #{}", id);
    Ok(())
}

/// Truncate to `max` characters, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
