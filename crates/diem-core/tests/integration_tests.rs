//! Integration tests for diem-core
//!
//! These tests exercise the store → period filter → aggregate → insights
//! workflow and the habit toggle round trip.

use chrono::{Duration, NaiveDate};
use diem_core::{
    build_overview, compute_dashboard_stats, compute_finance_summary, daily_samples,
    db::Database,
    models::{
        FinanceEntry, FinanceKind, GratitudeEntry, HabitFrequency, HabitRecord, JournalMood,
        MoodEntry, SleepEntry, StudyEntry, WaterEntry,
    },
    stats::streaks_for,
    PeriodMode, RecordStore, TrackerKind,
};
use serde_json::json;

const USER: &str = "integration";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()
}

fn days_ago(n: i64) -> NaiveDate {
    today() - Duration::days(n)
}

/// Seed two weeks of short sleep and heavy study, with water and mood
fn seed_week(db: &Database) {
    for n in 0..14 {
        db.insert(
            USER,
            &SleepEntry {
                date: Some(days_ago(n)),
                hours: 5.0,
                quality: 2,
                notes: String::new(),
            },
        )
        .expect("insert sleep");
        db.insert(
            USER,
            &StudyEntry {
                date: Some(days_ago(n)),
                subject: "Math".to_string(),
                topic: "Calculus".to_string(),
                hours: 4.0,
                notes: String::new(),
            },
        )
        .expect("insert study");
        db.insert(
            USER,
            &WaterEntry {
                date: Some(days_ago(n)),
                glasses: 6,
                goal: 8,
            },
        )
        .expect("insert water");
        db.insert(
            USER,
            &MoodEntry {
                date: Some(days_ago(n)),
                rating: 6,
                emotions: vec!["tired".to_string()],
                notes: String::new(),
            },
        )
        .expect("insert mood");
    }
}

// =============================================================================
// Statistics workflow
// =============================================================================

#[test]
fn test_store_to_insights_workflow() {
    let db = Database::in_memory().expect("Failed to create database");
    seed_week(&db);

    let snapshot = db.snapshot(USER).expect("snapshot");
    let samples = daily_samples(
        &snapshot.sleep,
        &snapshot.study,
        &snapshot.mood,
        &snapshot.water,
    );
    assert_eq!(samples.len(), 14);

    let stats = compute_dashboard_stats(&samples, PeriodMode::week(), today());
    // Trailing 7 days is inclusive of both ends
    assert_eq!(stats.days_with_data, 8);
    assert_eq!(stats.aggregates["sleep"].sum, 40.0);
    assert_eq!(stats.averages.sleep, Some(5.0));
    assert_eq!(stats.averages.water, Some(6.0));

    let rules: Vec<&str> = stats.insights.iter().map(|i| i.rule.as_str()).collect();
    assert_eq!(rules, vec!["study_without_sleep", "short_sleep"]);

    assert_eq!(stats.activity.sleep_hours, 40.0);
    assert_eq!(stats.activity.study_hours, 32.0);
    assert_eq!(stats.activity.free_hours, 8.0 * 24.0 - 72.0);
}

#[test]
fn test_empty_period_reports_no_data() {
    let db = Database::in_memory().expect("Failed to create database");
    seed_week(&db);

    let snapshot = db.snapshot(USER).expect("snapshot");
    let samples = daily_samples(
        &snapshot.sleep,
        &snapshot.study,
        &snapshot.mood,
        &snapshot.water,
    );
    let mode = PeriodMode::Range {
        start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2020, 1, 31).unwrap(),
    };
    let stats = compute_dashboard_stats(&samples, mode, today());
    assert_eq!(stats.insights.len(), 1);
    assert_eq!(stats.insights[0].rule, "no_data");
}

// =============================================================================
// Streaks
// =============================================================================

#[test]
fn test_habit_toggle_workflow() {
    let db = Database::in_memory().expect("Failed to create database");
    let id = db
        .insert(USER, &HabitRecord::new("Journal", HabitFrequency::Daily))
        .expect("insert habit");

    for n in (0..4).rev() {
        db.toggle_habit(USER, id, days_ago(n), today()).expect("toggle");
    }
    let habit = db
        .get::<HabitRecord>(USER, id)
        .expect("get")
        .expect("habit exists");
    assert_eq!(habit.record.streak, 4);

    // Un-toggling today leaves a run that has not reached today
    let habit = db.toggle_habit(USER, id, today(), today()).expect("toggle");
    assert_eq!(habit.record.streak, 0);

    // Backfilling yesterday after today counts toward the current run
    let backfilled = db
        .insert(USER, &HabitRecord::new("Stretch", HabitFrequency::Daily))
        .expect("insert habit");
    db.toggle_habit(USER, backfilled, today(), today()).expect("toggle");
    let habit = db
        .toggle_habit(USER, backfilled, days_ago(1), today())
        .expect("toggle");
    assert_eq!(habit.record.streak, 2);
}

#[test]
fn test_gratitude_streak_from_store() {
    let db = Database::in_memory().expect("Failed to create database");
    for n in [0, 1, 1, 2, 5] {
        db.insert(
            USER,
            &GratitudeEntry::new(days_ago(n), vec!["coffee".to_string()], "", JournalMood::Good),
        )
        .expect("insert gratitude");
    }
    // A malformed date in a raw document is ignored rather than failing
    db.insert_document(
        USER,
        TrackerKind::Gratitude,
        json!({"date": "someday", "items": ["rain"]}),
    )
    .expect("insert raw gratitude");

    let snapshot = db.snapshot(USER).expect("snapshot");
    let streak = streaks_for(&snapshot.gratitude, today());
    assert_eq!(streak.current, 3);
    assert_eq!(streak.longest, 3);
}

// =============================================================================
// Finance and overview
// =============================================================================

#[test]
fn test_finance_and_overview() {
    let db = Database::in_memory().expect("Failed to create database");
    seed_week(&db);

    let entries = [
        (FinanceKind::Income, "Salary", 2000.0),
        (FinanceKind::Expense, "Food", 300.0),
        (FinanceKind::Expense, "Transport", 100.0),
    ];
    for (kind, category, amount) in entries {
        db.insert(
            USER,
            &FinanceEntry {
                date: Some(days_ago(3)),
                amount,
                kind,
                category: category.to_string(),
                ..Default::default()
            },
        )
        .expect("insert finance");
    }

    let snapshot = db.snapshot(USER).expect("snapshot");
    let summary = compute_finance_summary(&snapshot.finance, Some(PeriodMode::month()), today());
    assert_eq!(summary.balance, 1600.0);
    assert_eq!(summary.expense_by_category[0].category, "Food");
    assert_eq!(summary.expense_by_category[0].percentage, 75.0);

    let overview = build_overview(&snapshot, PeriodMode::week(), today());
    assert_eq!(overview.average_sleep, Some(5.0));
    assert_eq!(overview.water_today.progress_percent, 75.0);
    assert_eq!(overview.study_by_subject[0].category, "Math");
    assert_eq!(overview.finance.total_income, 2000.0);
}
