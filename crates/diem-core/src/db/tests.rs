//! Database tests

use chrono::NaiveDate;
use serde_json::json;

use super::*;
use crate::models::*;
use crate::store::RecordStore;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sleep(date: NaiveDate, hours: f64) -> SleepEntry {
    SleepEntry {
        date: Some(date),
        hours,
        quality: 4,
        notes: String::new(),
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list::<SleepEntry>("alice").unwrap().is_empty());
    assert!(db.count_entries("alice").unwrap().is_empty());
}

#[test]
fn test_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('entries') WHERE name IN ('id', 'user_id', 'kind', 'entry_date', 'data', 'created_at', 'updated_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(columns, 7);

    let columns: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('audit_log')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(columns, 7);
}

#[test]
fn test_entry_crud() {
    let db = Database::in_memory().unwrap();

    let id = db.insert("alice", &sleep(day(2024, 1, 1), 7.0)).unwrap();
    assert!(id > 0);

    let stored = db.get::<SleepEntry>("alice", id).unwrap().unwrap();
    assert_eq!(stored.record.hours, 7.0);

    db.update("alice", id, &sleep(day(2024, 1, 1), 8.5)).unwrap();
    let stored = db.get::<SleepEntry>("alice", id).unwrap().unwrap();
    assert_eq!(stored.record.hours, 8.5);

    assert!(db.delete("alice", TrackerKind::Sleep, id).unwrap());
    assert!(!db.delete("alice", TrackerKind::Sleep, id).unwrap());
    assert!(db.get::<SleepEntry>("alice", id).unwrap().is_none());
}

#[test]
fn test_users_and_kinds_are_isolated() {
    let db = Database::in_memory().unwrap();
    let id = db.insert("alice", &sleep(day(2024, 1, 1), 7.0)).unwrap();

    assert!(db.get::<SleepEntry>("bob", id).unwrap().is_none());
    assert!(db.get::<StudyEntry>("alice", id).unwrap().is_none());
    assert!(!db.delete("bob", TrackerKind::Sleep, id).unwrap());

    let err = db
        .update("bob", id, &sleep(day(2024, 1, 1), 1.0))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_list_orders_by_entry_date_desc() {
    let db = Database::in_memory().unwrap();
    db.insert("alice", &sleep(day(2024, 1, 2), 6.0)).unwrap();
    db.insert("alice", &sleep(day(2024, 1, 5), 7.0)).unwrap();
    db.insert("alice", &sleep(day(2024, 1, 3), 8.0)).unwrap();

    let hours: Vec<f64> = db
        .list::<SleepEntry>("alice")
        .unwrap()
        .into_iter()
        .map(|s| s.record.hours)
        .collect();
    assert_eq!(hours, vec![7.0, 8.0, 6.0]);
}

#[test]
fn test_invalid_entry_rejected() {
    let db = Database::in_memory().unwrap();
    let err = db.insert("alice", &sleep(day(2024, 1, 1), -1.0)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let err = db
        .insert_document("alice", TrackerKind::Water, json!({"glasses": 3, "goal": 0}))
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(db.count_entries("alice").unwrap().is_empty());
}

#[test]
fn test_document_insert_normalizes() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_document(
            "alice",
            TrackerKind::Study,
            json!({"date": "2024-03-01T10:00:00", "subject": "Math", "hours": 2}),
        )
        .unwrap();

    let doc = db
        .get_document("alice", TrackerKind::Study, id)
        .unwrap()
        .unwrap();
    assert_eq!(doc.record["date"], "2024-03-01");
    assert_eq!(doc.record["topic"], "");
}

#[test]
fn test_toggle_habit_persists_streak() {
    let db = Database::in_memory().unwrap();
    let mut habit = HabitRecord::new("Stretch", HabitFrequency::Daily);
    habit.completed_dates.insert(day(2024, 1, 4));
    let id = db.insert("alice", &habit).unwrap();

    let today = day(2024, 1, 5);
    let toggled = db.toggle_habit("alice", id, today, today).unwrap();
    assert_eq!(toggled.record.streak, 2);

    let stored = db.get::<HabitRecord>("alice", id).unwrap().unwrap();
    assert!(stored.record.is_completed_on(day(2024, 1, 5)));
    assert_eq!(stored.record.streak, 2);

    let toggled = db.toggle_habit("alice", id, today, today).unwrap();
    assert_eq!(toggled.record.streak, 0);
    assert!(!toggled.record.is_completed_on(today));

    let err = db.toggle_habit("alice", 9999, today, today).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_snapshot_and_counts() {
    let db = Database::in_memory().unwrap();
    db.insert("alice", &sleep(day(2024, 1, 1), 7.0)).unwrap();
    db.insert("alice", &sleep(day(2024, 1, 2), 7.0)).unwrap();
    db.insert(
        "alice",
        &GratitudeEntry::new(day(2024, 1, 2), vec!["tea".to_string()], "", JournalMood::Good),
    )
    .unwrap();
    db.insert("bob", &sleep(day(2024, 1, 1), 5.0)).unwrap();

    let snapshot = db.snapshot("alice").unwrap();
    assert_eq!(snapshot.sleep.len(), 2);
    assert_eq!(snapshot.gratitude.len(), 1);
    assert!(snapshot.finance.is_empty());

    let counts = db.count_entries("alice").unwrap();
    assert_eq!(counts[&TrackerKind::Sleep], 2);
    assert_eq!(counts[&TrackerKind::Gratitude], 1);

    assert_eq!(db.clear_entries("alice").unwrap(), 3);
    assert_eq!(db.count_entries("bob").unwrap()[&TrackerKind::Sleep], 1);
}

#[test]
fn test_undecodable_documents_skipped_in_typed_list() {
    let db = Database::in_memory().unwrap();
    db.insert("alice", &sleep(day(2024, 1, 1), 7.0)).unwrap();

    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO entries (user_id, kind, entry_date, data) VALUES ('alice', 'sleep', NULL, '{\"hours\": \"many\"}')",
        [],
    )
    .unwrap();

    assert_eq!(db.list_documents("alice", TrackerKind::Sleep).unwrap().len(), 2);
    assert_eq!(db.list::<SleepEntry>("alice").unwrap().len(), 1);
}

#[test]
fn test_audit_log() {
    let db = Database::in_memory().unwrap();
    db.log_audit("alice", "create", Some("sleep"), Some(1), None)
        .unwrap();
    db.log_audit("alice", "delete", Some("sleep"), Some(1), Some("via api"))
        .unwrap();
    db.log_audit("bob", "export", None, None, None).unwrap();

    let entries = db.list_audit_log("alice", 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].details.as_deref(), Some("via api"));
}
