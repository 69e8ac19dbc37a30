//! Per-user record store
//!
//! Entries are JSON documents keyed by `(user, tracker kind, id)`. The
//! document-level methods are the storage contract; typed access, habit
//! toggling and snapshots are built on top of them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{
    CalendarEntry, FinanceEntry, FitnessEntry, GratitudeEntry, HabitRecord, MealEntry, MoodEntry,
    ReflectionEntry, SleepEntry, StudyEntry, TaskEntry, TrackerKind, TrackerRecord,
    TrackerSnapshot, WaterEntry,
};

/// A record together with its storage metadata
///
/// The record is flattened into the same object, so storage field names must
/// not collide with record fields such as a habit's `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<R> {
    pub id: i64,
    pub stored_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: R,
}

impl<R> Stored<R> {
    pub fn map<T>(self, f: impl FnOnce(R) -> T) -> Stored<T> {
        Stored {
            id: self.id,
            stored_at: self.stored_at,
            updated_at: self.updated_at,
            record: f(self.record),
        }
    }
}

fn typed_document<R: TrackerRecord>(value: Value) -> Result<(Value, Option<NaiveDate>)> {
    let record: R = serde_json::from_value(value)
        .map_err(|e| Error::Validation(format!("invalid {} entry: {}", R::KIND, e)))?;
    record.validate()?;
    Ok((serde_json::to_value(&record)?, record.entry_date()))
}

/// Decode a document as the record type for `kind` and validate it.
///
/// Returns the normalized document and the date it is ordered by.
pub fn normalize_document(kind: TrackerKind, value: Value) -> Result<(Value, Option<NaiveDate>)> {
    match kind {
        TrackerKind::Habit => typed_document::<HabitRecord>(value),
        TrackerKind::Sleep => typed_document::<SleepEntry>(value),
        TrackerKind::Study => typed_document::<StudyEntry>(value),
        TrackerKind::Fitness => typed_document::<FitnessEntry>(value),
        TrackerKind::Task => typed_document::<TaskEntry>(value),
        TrackerKind::Meal => typed_document::<MealEntry>(value),
        TrackerKind::Mood => typed_document::<MoodEntry>(value),
        TrackerKind::Calendar => typed_document::<CalendarEntry>(value),
        TrackerKind::Finance => typed_document::<FinanceEntry>(value),
        TrackerKind::Gratitude => typed_document::<GratitudeEntry>(value),
        TrackerKind::Reflection => typed_document::<ReflectionEntry>(value),
        TrackerKind::Water => typed_document::<WaterEntry>(value),
    }
}

/// Storage for tracker entries
pub trait RecordStore {
    /// Validate and store a document, returning its id
    fn insert_document(&self, user: &str, kind: TrackerKind, document: Value) -> Result<i64>;

    /// All documents of one kind, newest entry date first
    fn list_documents(&self, user: &str, kind: TrackerKind) -> Result<Vec<Stored<Value>>>;

    fn get_document(&self, user: &str, kind: TrackerKind, id: i64) -> Result<Option<Stored<Value>>>;

    /// Replace a stored document; `NotFound` if it does not exist
    fn update_document(&self, user: &str, kind: TrackerKind, id: i64, document: Value)
        -> Result<()>;

    /// Returns whether a document was removed
    fn delete(&self, user: &str, kind: TrackerKind, id: i64) -> Result<bool>;

    fn insert<R: TrackerRecord>(&self, user: &str, record: &R) -> Result<i64>
    where
        Self: Sized,
    {
        self.insert_document(user, R::KIND, serde_json::to_value(record)?)
    }

    /// Typed listing; documents that no longer decode are skipped
    fn list<R: TrackerRecord>(&self, user: &str) -> Result<Vec<Stored<R>>>
    where
        Self: Sized,
    {
        let stored = self.list_documents(user, R::KIND)?;
        let mut records = Vec::with_capacity(stored.len());
        for doc in stored {
            let id = doc.id;
            match serde_json::from_value::<R>(doc.record.clone()) {
                Ok(record) => records.push(doc.map(|_| record)),
                Err(e) => tracing::warn!(kind = %R::KIND, id, error = %e, "Skipping undecodable entry"),
            }
        }
        Ok(records)
    }

    fn get<R: TrackerRecord>(&self, user: &str, id: i64) -> Result<Option<Stored<R>>>
    where
        Self: Sized,
    {
        match self.get_document(user, R::KIND, id)? {
            Some(doc) => {
                let record: R = serde_json::from_value(doc.record.clone())?;
                Ok(Some(doc.map(|_| record)))
            }
            None => Ok(None),
        }
    }

    fn update<R: TrackerRecord>(&self, user: &str, id: i64, record: &R) -> Result<()>
    where
        Self: Sized,
    {
        self.update_document(user, R::KIND, id, serde_json::to_value(record)?)
    }

    /// Toggle a habit's completion for `day` and persist the streak as of `today`
    fn toggle_habit(
        &self,
        user: &str,
        id: i64,
        day: NaiveDate,
        today: NaiveDate,
    ) -> Result<Stored<HabitRecord>>
    where
        Self: Sized,
    {
        let mut stored = self
            .get::<HabitRecord>(user, id)?
            .ok_or_else(|| Error::NotFound(format!("habit {}", id)))?;

        let done = stored.record.toggle_completion(day, today);
        self.update(user, id, &stored.record)?;
        tracing::debug!(habit = id, %day, done, streak = stored.record.streak, "Toggled habit");

        stored.updated_at = Utc::now();
        Ok(stored)
    }

    /// Every collection of a user
    fn snapshot(&self, user: &str) -> Result<TrackerSnapshot>
    where
        Self: Sized,
    {
        fn records<S: RecordStore, R: TrackerRecord>(store: &S, user: &str) -> Result<Vec<R>> {
            Ok(store.list::<R>(user)?.into_iter().map(|s| s.record).collect())
        }

        Ok(TrackerSnapshot {
            habits: records(self, user)?,
            sleep: records(self, user)?,
            study: records(self, user)?,
            fitness: records(self, user)?,
            tasks: records(self, user)?,
            meals: records(self, user)?,
            mood: records(self, user)?,
            calendar: records(self, user)?,
            finance: records(self, user)?,
            gratitude: records(self, user)?,
            reflections: records(self, user)?,
            water: records(self, user)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_fills_defaults_and_strips_time() {
        let (doc, date) = normalize_document(
            TrackerKind::Sleep,
            json!({"date": "2024-02-03T22:15:00Z", "hours": 7.5, "quality": 4}),
        )
        .unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 3));
        assert_eq!(doc["date"], "2024-02-03");
        assert_eq!(doc["notes"], "");
    }

    #[test]
    fn test_normalize_rejects_invalid_record() {
        let err = normalize_document(TrackerKind::Mood, json!({"date": "2024-02-03", "rating": 0}))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = normalize_document(TrackerKind::Finance, json!({"amount": "lots"})).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_stored_flattens_record() {
        let stored = Stored {
            id: 3,
            stored_at: Utc::now(),
            updated_at: Utc::now(),
            record: json!({"hours": 2.0}),
        };
        let value = serde_json::to_value(&stored).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["hours"], 2.0);
    }

    #[test]
    fn test_stored_habit_has_single_created_at() {
        let stored = Stored {
            id: 1,
            stored_at: Utc::now(),
            updated_at: Utc::now(),
            record: HabitRecord::new("Read", crate::models::HabitFrequency::Daily),
        };
        let json = serde_json::to_string(&stored).unwrap();
        assert_eq!(json.matches("\"created_at\"").count(), 1);
        assert_eq!(json.matches("\"stored_at\"").count(), 1);

        let back: Stored<HabitRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.record.name, "Read");
        assert!(back.record.created_at.is_some());
    }
}
