//! Entry logging, listing and deletion

use anyhow::{bail, Context, Result};
use diem_core::db::Database;
use diem_core::models::{
    clean_items, FinanceEntry, GratitudeEntry, MoodEntry, SleepEntry, StudyEntry, WaterEntry,
};
use diem_core::{RecordStore, TrackerKind, TrackerRecord};
use serde_json::Value;

use super::{parse_date, parse_kind};
use crate::cli::LogEntry;

fn insert_logged<R: TrackerRecord>(db: &Database, user: &str, record: &R) -> Result<i64> {
    let id = db.insert(user, record)?;
    db.log_audit(user, "create", Some(R::KIND.as_str()), Some(id), None)?;
    Ok(id)
}

/// Store one entry built from command-line arguments; returns its id
pub fn cmd_log(db: &Database, user: &str, entry: LogEntry) -> Result<i64> {
    let (kind, id) = match entry {
        LogEntry::Sleep {
            hours,
            quality,
            date,
            notes,
        } => {
            let record = SleepEntry {
                date: Some(parse_date(date.as_deref())?),
                hours,
                quality,
                notes,
            };
            (TrackerKind::Sleep, insert_logged(db, user, &record)?)
        }
        LogEntry::Study {
            subject,
            hours,
            topic,
            date,
        } => {
            let record = StudyEntry {
                date: Some(parse_date(date.as_deref())?),
                subject,
                topic,
                hours,
                notes: String::new(),
            };
            (TrackerKind::Study, insert_logged(db, user, &record)?)
        }
        LogEntry::Mood {
            rating,
            emotions,
            date,
        } => {
            let record = MoodEntry {
                date: Some(parse_date(date.as_deref())?),
                rating,
                emotions: clean_items(
                    emotions
                        .unwrap_or_default()
                        .split(',')
                        .map(str::to_string),
                ),
                notes: String::new(),
            };
            (TrackerKind::Mood, insert_logged(db, user, &record)?)
        }
        LogEntry::Water {
            glasses,
            goal,
            date,
        } => {
            let record = WaterEntry {
                date: Some(parse_date(date.as_deref())?),
                glasses,
                goal,
            };
            (TrackerKind::Water, insert_logged(db, user, &record)?)
        }
        LogEntry::Finance {
            kind,
            amount,
            category,
            description,
            payment,
            date,
        } => {
            let record = FinanceEntry {
                date: Some(parse_date(date.as_deref())?),
                amount,
                kind: kind.parse().map_err(anyhow::Error::msg)?,
                category: category.trim().to_string(),
                description,
                payment_method: payment.parse().map_err(anyhow::Error::msg)?,
            };
            (TrackerKind::Finance, insert_logged(db, user, &record)?)
        }
        LogEntry::Gratitude {
            items,
            highlight,
            mood,
            date,
        } => {
            let record = GratitudeEntry::new(
                parse_date(date.as_deref())?,
                items,
                highlight,
                mood.parse().map_err(anyhow::Error::msg)?,
            );
            (TrackerKind::Gratitude, insert_logged(db, user, &record)?)
        }
        LogEntry::Json { kind, data } => {
            let kind = parse_kind(&kind)?;
            let document: Value = serde_json::from_str(&data).context("Invalid JSON document")?;
            if !document.is_object() {
                bail!("Entry must be a JSON object");
            }
            let id = db.insert_document(user, kind, document)?;
            db.log_audit(user, "create", Some(kind.as_str()), Some(id), None)?;
            (kind, id)
        }
    };

    println!("✅ Logged {} entry #{}", kind, id);
    Ok(id)
}

pub fn cmd_entries(db: &Database, user: &str, kind: &str, limit: usize) -> Result<()> {
    let kind = parse_kind(kind)?;
    let entries = db.list_documents(user, kind)?;

    if entries.is_empty() {
        println!("No {} entries.", kind);
        return Ok(());
    }

    println!("{} entries ({} total):", kind.title(), entries.len());
    for stored in entries.iter().take(limit) {
        let date = stored
            .record
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or("-");
        let mut fields = stored.record.clone();
        if let Some(obj) = fields.as_object_mut() {
            obj.remove("date");
        }
        println!("{:>6}  {:<10}  {}", stored.id, date, fields);
    }
    if entries.len() > limit {
        println!("... and {} more (use --limit)", entries.len() - limit);
    }

    Ok(())
}

pub fn cmd_delete(db: &Database, user: &str, kind: &str, id: i64) -> Result<()> {
    let kind = parse_kind(kind)?;
    if !db.delete(user, kind, id)? {
        bail!("{} entry {} not found", kind.title(), id);
    }
    db.log_audit(user, "delete", Some(kind.as_str()), Some(id), None)?;

    println!("🗑  Deleted {} entry #{}", kind, id);
    Ok(())
}
