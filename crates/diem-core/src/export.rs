//! Export and import
//!
//! Supports:
//! - Finance CSV export, optionally limited to a period
//! - Full JSON export/import of every tracker collection of one user

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{FinanceEntry, TrackerKind};
use crate::stats::{filter_period, PeriodMode};
use crate::store::RecordStore;

pub const FINANCE_CSV_HEADER: [&str; 6] = [
    "date",
    "type",
    "category",
    "amount",
    "description",
    "payment_method",
];

/// Render finance entries as CSV, oldest first
pub fn finance_csv(entries: &[FinanceEntry]) -> Result<String> {
    let mut sorted: Vec<&FinanceEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(FINANCE_CSV_HEADER)?;
    for entry in sorted {
        writer.write_record([
            entry.date.map(|d| d.to_string()).unwrap_or_default(),
            entry.kind.to_string(),
            entry.category.clone(),
            format!("{:.2}", entry.amount),
            entry.description.clone(),
            entry.payment_method.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::InvalidData(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidData(format!("CSV is not UTF-8: {}", e)))
}

/// Finance CSV for a user; `None` exports the whole history
pub fn export_finance_csv<S: RecordStore>(
    store: &S,
    user: &str,
    period: Option<PeriodMode>,
    today: NaiveDate,
) -> Result<String> {
    let entries: Vec<FinanceEntry> = store
        .list::<FinanceEntry>(user)?
        .into_iter()
        .map(|s| s.record)
        .collect();

    let entries = match period {
        Some(mode) => filter_period(&entries, mode, today),
        None => entries,
    };
    tracing::debug!(user, rows = entries.len(), "Exporting finance CSV");
    finance_csv(&entries)
}

/// Every collection of one user as plain documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Application version that created the export
    pub version: String,
    pub exported_at: String,
    pub user_id: String,
    pub entries: BTreeMap<TrackerKind, Vec<Value>>,
}

impl FullExport {
    pub fn total_records(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportStats {
    pub imported: BTreeMap<TrackerKind, usize>,
    pub skipped: usize,
    /// One message per skipped document
    pub errors: Vec<String>,
}

impl ImportStats {
    pub fn total_imported(&self) -> usize {
        self.imported.values().sum()
    }
}

pub fn export_full<S: RecordStore>(store: &S, user: &str) -> Result<FullExport> {
    let mut entries = BTreeMap::new();
    for kind in TrackerKind::all() {
        let docs: Vec<Value> = store
            .list_documents(user, *kind)?
            .into_iter()
            .map(|s| s.record)
            .collect();
        if !docs.is_empty() {
            entries.insert(*kind, docs);
        }
    }

    let export = FullExport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        exported_at: Utc::now().to_rfc3339(),
        user_id: user.to_string(),
        entries,
    };
    tracing::info!(user, records = export.total_records(), "Created full export");
    Ok(export)
}

/// Insert every document of an export for `user`.
///
/// Documents are appended; invalid ones are skipped and reported.
pub fn import_full<S: RecordStore>(store: &S, user: &str, export: &FullExport) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for (kind, docs) in &export.entries {
        for (index, doc) in docs.iter().enumerate() {
            match store.insert_document(user, *kind, doc.clone()) {
                Ok(_) => *stats.imported.entry(*kind).or_insert(0) += 1,
                Err(Error::Validation(msg)) => {
                    stats.skipped += 1;
                    stats.errors.push(format!("{} #{}: {}", kind, index + 1, msg));
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::info!(
        user,
        imported = stats.total_imported(),
        skipped = stats.skipped,
        "Imported full export"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{FinanceKind, PaymentMethod, SleepEntry};
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(date: NaiveDate, category: &str, amount: f64, description: &str) -> FinanceEntry {
        FinanceEntry {
            date: Some(date),
            amount,
            kind: FinanceKind::Expense,
            category: category.to_string(),
            description: description.to_string(),
            payment_method: PaymentMethod::Card,
        }
    }

    #[test]
    fn test_finance_csv_format() {
        let csv = finance_csv(&[
            expense(day(2024, 2, 2), "Food", 12.5, "lunch, with friends"),
            expense(day(2024, 2, 1), "Bills", 40.0, "power"),
        ])
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "date,type,category,amount,description,payment_method");
        assert_eq!(lines[1], "2024-02-01,expense,Bills,40.00,power,card");
        assert_eq!(
            lines[2],
            "2024-02-02,expense,Food,12.50,\"lunch, with friends\",card"
        );
    }

    #[test]
    fn test_finance_csv_empty_has_header() {
        let csv = finance_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_export_finance_csv_period() {
        let db = Database::in_memory().unwrap();
        let today = day(2024, 3, 31);
        db.insert("alice", &expense(today, "Food", 5.0, "recent")).unwrap();
        db.insert("alice", &expense(day(2023, 1, 1), "Food", 9.0, "old"))
            .unwrap();

        let recent = export_finance_csv(&db, "alice", Some(PeriodMode::month()), today).unwrap();
        assert_eq!(recent.lines().count(), 2);
        assert!(recent.contains("recent"));

        let all = export_finance_csv(&db, "alice", None, today).unwrap();
        assert_eq!(all.lines().count(), 3);
    }

    #[test]
    fn test_full_export_import_between_users() {
        let db = Database::in_memory().unwrap();
        db.insert(
            "alice",
            &SleepEntry {
                date: Some(day(2024, 1, 1)),
                hours: 7.0,
                quality: 4,
                notes: "ok".to_string(),
            },
        )
        .unwrap();
        db.insert("alice", &expense(day(2024, 1, 1), "Food", 3.0, "snack"))
            .unwrap();

        let export = export_full(&db, "alice").unwrap();
        assert_eq!(export.total_records(), 2);
        assert!(!export.version.is_empty());

        let json = serde_json::to_string(&export).unwrap();
        let parsed: FullExport = serde_json::from_str(&json).unwrap();

        let stats = import_full(&db, "bob", &parsed).unwrap();
        assert_eq!(stats.total_imported(), 2);
        assert_eq!(stats.skipped, 0);
        assert_eq!(db.snapshot("bob").unwrap().sleep[0].notes, "ok");
    }

    #[test]
    fn test_import_skips_invalid_documents() {
        let db = Database::in_memory().unwrap();
        let mut entries = BTreeMap::new();
        entries.insert(
            TrackerKind::Mood,
            vec![
                json!({"date": "2024-01-01", "rating": 6}),
                json!({"date": "2024-01-02", "rating": 42}),
            ],
        );
        let export = FullExport {
            version: "0.1.0".to_string(),
            exported_at: "2024-01-03T00:00:00Z".to_string(),
            user_id: "someone".to_string(),
            entries,
        };

        let stats = import_full(&db, "alice", &export).unwrap();
        assert_eq!(stats.imported[&TrackerKind::Mood], 1);
        assert_eq!(stats.skipped, 1);
        assert!(stats.errors[0].starts_with("mood #2"));
    }
}
