//! Data models for Diem trackers

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use crate::stats::aggregate::Measured;
use crate::stats::streak::current_streak;

/// The tracker domains a user can record entries in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    Habit,
    Sleep,
    Study,
    Fitness,
    Task,
    Meal,
    Mood,
    Calendar,
    Finance,
    Gratitude,
    Reflection,
    Water,
}

impl TrackerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Habit => "habit",
            Self::Sleep => "sleep",
            Self::Study => "study",
            Self::Fitness => "fitness",
            Self::Task => "task",
            Self::Meal => "meal",
            Self::Mood => "mood",
            Self::Calendar => "calendar",
            Self::Finance => "finance",
            Self::Gratitude => "gratitude",
            Self::Reflection => "reflection",
            Self::Water => "water",
        }
    }

    /// Display title shown in tracker lists
    pub fn title(&self) -> &'static str {
        match self {
            Self::Habit => "Habit Tracker",
            Self::Sleep => "Sleep Tracker",
            Self::Study => "Study Planner",
            Self::Fitness => "Fitness Planner",
            Self::Task => "Task Planner",
            Self::Meal => "Meal Planner",
            Self::Mood => "Mood Tracker",
            Self::Calendar => "Calendar",
            Self::Finance => "Finance Tracker",
            Self::Gratitude => "Gratitude Journal",
            Self::Reflection => "Daily Reflection",
            Self::Water => "Water Intake",
        }
    }

    /// Get all tracker kinds in display order
    pub fn all() -> &'static [TrackerKind] {
        &[
            Self::Habit,
            Self::Sleep,
            Self::Study,
            Self::Fitness,
            Self::Task,
            Self::Meal,
            Self::Mood,
            Self::Calendar,
            Self::Finance,
            Self::Gratitude,
            Self::Reflection,
            Self::Water,
        ]
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TrackerKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TrackerKind::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown tracker: {}", s))
    }
}

/// Records that carry a calendar date
///
/// `None` means the record has no usable date and contributes nothing to
/// streak or period computations.
pub trait Dated {
    fn date(&self) -> Option<NaiveDate>;
}

/// A record type stored in one tracker collection
pub trait TrackerRecord: Serialize + DeserializeOwned + Clone + Send + Sync {
    const KIND: TrackerKind;

    /// Date used to order entries in the store
    fn entry_date(&self) -> Option<NaiveDate>;

    /// Check record invariants before it is written
    fn validate(&self) -> Result<()>;
}

// =============================================================================
// Date decoding
// =============================================================================

/// Parse a date from `YYYY-MM-DD`, RFC 3339, or a naive timestamp.
///
/// Time of day is discarded. Returns `None` for anything unparseable.
pub fn parse_lenient_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    Other(IgnoredAny),
}

fn lenient_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawDate> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawDate::Text(s)) => parse_lenient_date(&s),
        _ => None,
    })
}

fn lenient_date_set<'de, D>(deserializer: D) -> std::result::Result<BTreeSet<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawDate>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|d| match d {
            RawDate::Text(s) => parse_lenient_date(&s),
            RawDate::Other(_) => None,
        })
        .collect())
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Validation(message.into()))
    }
}

fn ensure_measure(value: f64, name: &str) -> Result<()> {
    ensure(
        value.is_finite() && value >= 0.0,
        format!("{} must be a non-negative number", name),
    )
}

fn ensure_items(items: &[String], label: &str, max: usize) -> Result<()> {
    ensure(!items.is_empty(), format!("at least one {} is required", label))?;
    ensure(
        items.len() <= max,
        format!("at most {} {} entries are allowed", max, label),
    )?;
    ensure(
        items.iter().all(|i| !i.trim().is_empty()),
        format!("{} entries must not be blank", label),
    )
}

/// Trim list items and drop blank ones
pub fn clean_items(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect()
}

macro_rules! string_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($s => Ok(Self::$variant),)+
                    _ => Err(format!(
                        "Unknown {}: {}. Available: {}",
                        stringify!($name),
                        s,
                        [$($s),+].join(", ")
                    )),
                }
            }
        }
    };
}

pub(crate) use string_enum;

// =============================================================================
// Habits
// =============================================================================

/// How often a habit is meant to be done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

string_enum!(HabitFrequency { Daily => "daily", Weekly => "weekly", Monthly => "monthly" });

/// A habit and the days it was completed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitRecord {
    pub name: String,
    pub frequency: HabitFrequency,
    #[serde(deserialize_with = "lenient_date_set")]
    pub completed_dates: BTreeSet<NaiveDate>,
    /// Current streak as of the last toggle; maintained by `toggle_completion`
    pub streak: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl HabitRecord {
    pub fn new(name: impl Into<String>, frequency: HabitFrequency) -> Self {
        Self {
            name: name.into(),
            frequency,
            completed_dates: BTreeSet::new(),
            streak: 0,
            created_at: Some(Utc::now()),
        }
    }

    pub fn is_completed_on(&self, day: NaiveDate) -> bool {
        self.completed_dates.contains(&day)
    }

    /// Toggle completion for `day` and recompute the streak as of `today`.
    ///
    /// Returns whether the habit is now marked done for `day`.
    pub fn toggle_completion(&mut self, day: NaiveDate, today: NaiveDate) -> bool {
        let done = if self.completed_dates.remove(&day) {
            false
        } else {
            self.completed_dates.insert(day);
            true
        };
        self.streak = current_streak(self.completed_dates.iter().copied(), today);
        done
    }
}

impl TrackerRecord for HabitRecord {
    const KIND: TrackerKind = TrackerKind::Habit;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.created_at.map(|dt| dt.date_naive())
    }

    fn validate(&self) -> Result<()> {
        ensure(!self.name.trim().is_empty(), "habit name is required")
    }
}

// =============================================================================
// Daily measurements
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub hours: f64,
    /// 1-5 stars
    pub quality: u8,
    pub notes: String,
}

impl Dated for SleepEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for SleepEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "hours" => Some(self.hours),
            "quality" => Some(f64::from(self.quality)),
            _ => None,
        }
    }
}

impl TrackerRecord for SleepEntry {
    const KIND: TrackerKind = TrackerKind::Sleep;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure_measure(self.hours, "hours")?;
        ensure(self.hours <= 24.0, "hours cannot exceed 24")?;
        ensure((1..=5).contains(&self.quality), "quality must be between 1 and 5")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub subject: String,
    pub topic: String,
    pub hours: f64,
    pub notes: String,
}

impl Dated for StudyEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for StudyEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "hours" => Some(self.hours),
            _ => None,
        }
    }
}

impl TrackerRecord for StudyEntry {
    const KIND: TrackerKind = TrackerKind::Study;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure(!self.subject.trim().is_empty(), "subject is required")?;
        ensure_measure(self.hours, "hours")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MoodEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    /// 1-10
    pub rating: u8,
    pub emotions: Vec<String>,
    pub notes: String,
}

impl Dated for MoodEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for MoodEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "rating" => Some(f64::from(self.rating)),
            _ => None,
        }
    }
}

impl TrackerRecord for MoodEntry {
    const KIND: TrackerKind = TrackerKind::Mood;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure((1..=10).contains(&self.rating), "rating must be between 1 and 10")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub glasses: u32,
    pub goal: u32,
}

impl WaterEntry {
    /// Share of the daily goal reached, capped at 100
    pub fn progress_percent(&self) -> f64 {
        if self.goal == 0 {
            return 0.0;
        }
        (f64::from(self.glasses) / f64::from(self.goal) * 100.0).min(100.0)
    }
}

impl Dated for WaterEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for WaterEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "glasses" => Some(f64::from(self.glasses)),
            "goal" => Some(f64::from(self.goal)),
            _ => None,
        }
    }
}

impl TrackerRecord for WaterEntry {
    const KIND: TrackerKind = TrackerKind::Water;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure(self.goal >= 1, "goal must be at least 1 glass")
    }
}

// =============================================================================
// Planners
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessKind {
    #[default]
    Cardio,
    Strength,
    Flexibility,
    Sports,
}

string_enum!(FitnessKind {
    Cardio => "cardio",
    Strength => "strength",
    Flexibility => "flexibility",
    Sports => "sports",
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FitnessEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub exercise: String,
    pub duration_minutes: u32,
    pub calories: u32,
    #[serde(rename = "type")]
    pub kind: FitnessKind,
    pub notes: String,
}

impl Dated for FitnessEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for FitnessEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "duration" => Some(f64::from(self.duration_minutes)),
            "calories" => Some(f64::from(self.calories)),
            _ => None,
        }
    }
}

impl TrackerRecord for FitnessEntry {
    const KIND: TrackerKind = TrackerKind::Fitness;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure(!self.exercise.trim().is_empty(), "exercise is required")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

string_enum!(TaskPriority { Low => "low", Medium => "medium", High => "high" });

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskEntry {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub priority: TaskPriority,
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskEntry {
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

impl Dated for TaskEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.due_date
    }
}

impl TrackerRecord for TaskEntry {
    const KIND: TrackerKind = TrackerKind::Task;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn validate(&self) -> Result<()> {
        ensure(!self.title.trim().is_empty(), "task title is required")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MealEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
    pub snacks: String,
    pub calories: u32,
    pub notes: String,
}

impl Dated for MealEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for MealEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "calories" => Some(f64::from(self.calories)),
            _ => None,
        }
    }
}

impl TrackerRecord for MealEntry {
    const KIND: TrackerKind = TrackerKind::Meal;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    #[default]
    Event,
    Task,
    Reminder,
    Meeting,
}

string_enum!(CalendarKind {
    Event => "event",
    Task => "task",
    Reminder => "reminder",
    Meeting => "meeting",
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CalendarKind,
    /// "HH:MM"
    pub time: String,
    pub completed: bool,
}

impl Dated for CalendarEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl TrackerRecord for CalendarEntry {
    const KIND: TrackerKind = TrackerKind::Calendar;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure(!self.title.trim().is_empty(), "event title is required")?;
        if !self.time.is_empty() {
            ensure(
                chrono::NaiveTime::parse_from_str(&self.time, "%H:%M").is_ok(),
                "time must be HH:MM",
            )?;
        }
        Ok(())
    }
}

// =============================================================================
// Finance
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceKind {
    Income,
    #[default]
    Expense,
}

string_enum!(FinanceKind { Income => "income", Expense => "expense" });

impl FinanceKind {
    /// Built-in category vocabulary for this kind
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::Expense => &[
                "Food",
                "Transport",
                "Bills",
                "Entertainment",
                "Health",
                "Education",
                "Clothing",
                "Other",
            ],
            Self::Income => &["Salary", "Freelance", "Investments", "Gift", "Other"],
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Income => Self::Expense,
            Self::Expense => Self::Income,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
    Other,
}

string_enum!(PaymentMethod {
    Cash => "cash",
    Card => "card",
    Transfer => "transfer",
    Other => "other",
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: FinanceKind,
    pub category: String,
    pub description: String,
    pub payment_method: PaymentMethod,
}

impl Dated for FinanceEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for FinanceEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "amount" => Some(self.amount),
            _ => None,
        }
    }
}

impl TrackerRecord for FinanceEntry {
    const KIND: TrackerKind = TrackerKind::Finance;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure(
            self.amount.is_finite() && self.amount > 0.0,
            "amount must be greater than zero",
        )?;
        let category = self.category.trim();
        ensure(!category.is_empty(), "category is required")?;

        let belongs = |kind: FinanceKind| {
            kind.categories()
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
        };
        ensure(
            belongs(self.kind) || !belongs(self.kind.opposite()),
            format!(
                "category '{}' is an {} category",
                category,
                self.kind.opposite()
            ),
        )
    }
}

// =============================================================================
// Journals
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMood {
    Amazing,
    #[default]
    Good,
    Okay,
    Rough,
}

string_enum!(JournalMood {
    Amazing => "amazing",
    Good => "good",
    Okay => "okay",
    Rough => "rough",
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GratitudeEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub items: Vec<String>,
    pub highlight: String,
    pub mood: JournalMood,
    pub color: String,
}

impl GratitudeEntry {
    pub fn new(
        date: NaiveDate,
        items: impl IntoIterator<Item = String>,
        highlight: impl Into<String>,
        mood: JournalMood,
    ) -> Self {
        Self {
            date: Some(date),
            items: clean_items(items),
            highlight: highlight.into(),
            mood,
            color: "#10b981".to_string(),
        }
    }
}

impl Dated for GratitudeEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl TrackerRecord for GratitudeEntry {
    const KIND: TrackerKind = TrackerKind::Gratitude;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure_items(&self.items, "gratitude item", 10)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReflectionCategory {
    Work,
    #[default]
    Personal,
    Health,
    Learning,
    Relationships,
}

string_enum!(ReflectionCategory {
    Work => "work",
    Personal => "personal",
    Health => "health",
    Learning => "learning",
    Relationships => "relationships",
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionEntry {
    #[serde(deserialize_with = "lenient_date")]
    pub date: Option<NaiveDate>,
    pub time: String,
    /// 1-10
    pub rating: u8,
    pub category: ReflectionCategory,
    pub what_learned: String,
    pub what_to_do_differently: String,
    pub goals_achieved: bool,
    pub goals_description: String,
    pub wins: Vec<String>,
    pub lessons: Vec<String>,
    pub free_thoughts: String,
    pub mood: JournalMood,
    pub color: String,
}

impl Dated for ReflectionEntry {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for ReflectionEntry {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "rating" => Some(f64::from(self.rating)),
            _ => None,
        }
    }
}

impl TrackerRecord for ReflectionEntry {
    const KIND: TrackerKind = TrackerKind::Reflection;

    fn entry_date(&self) -> Option<NaiveDate> {
        self.date
    }

    fn validate(&self) -> Result<()> {
        ensure((1..=10).contains(&self.rating), "rating must be between 1 and 10")?;
        ensure_items(&self.wins, "win", 5)?;
        ensure_items(&self.lessons, "lesson", 5)
    }
}

// =============================================================================
// Statistics inputs
// =============================================================================

/// One day of the measures the statistics page charts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyMetricSample {
    pub date: Option<NaiveDate>,
    pub sleep: Option<f64>,
    pub study: Option<f64>,
    pub mood: Option<f64>,
    pub water: Option<f64>,
}

impl Dated for DailyMetricSample {
    fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

impl Measured for DailyMetricSample {
    fn measure(&self, field: &str) -> Option<f64> {
        match field {
            "sleep" => self.sleep,
            "study" => self.study,
            "mood" => self.mood,
            "water" => self.water,
            _ => None,
        }
    }
}

/// Every collection of one user, as read from the store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub habits: Vec<HabitRecord>,
    pub sleep: Vec<SleepEntry>,
    pub study: Vec<StudyEntry>,
    pub fitness: Vec<FitnessEntry>,
    pub tasks: Vec<TaskEntry>,
    pub meals: Vec<MealEntry>,
    pub mood: Vec<MoodEntry>,
    pub calendar: Vec<CalendarEntry>,
    pub finance: Vec<FinanceEntry>,
    pub gratitude: Vec<GratitudeEntry>,
    pub reflections: Vec<ReflectionEntry>,
    pub water: Vec<WaterEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_tracker_kind_round_trip_names() {
        for kind in TrackerKind::all() {
            assert_eq!(kind.as_str().parse::<TrackerKind>().unwrap(), *kind);
        }
        assert!("bingo".parse::<TrackerKind>().is_err());
        assert_eq!(TrackerKind::all().len(), 12);
    }

    #[test]
    fn test_parse_lenient_date_formats() {
        assert_eq!(parse_lenient_date("2024-01-05"), Some(day(2024, 1, 5)));
        assert_eq!(
            parse_lenient_date("2024-01-05T23:59:00Z"),
            Some(day(2024, 1, 5))
        );
        assert_eq!(
            parse_lenient_date("2024-01-05T08:30:00"),
            Some(day(2024, 1, 5))
        );
        assert_eq!(parse_lenient_date("yesterday"), None);
        assert_eq!(parse_lenient_date(""), None);
    }

    #[test]
    fn test_malformed_date_decodes_to_none() {
        let entry: SleepEntry =
            serde_json::from_str(r#"{"date": "not a date", "hours": 7.5, "quality": 4}"#).unwrap();
        assert_eq!(entry.date, None);
        assert_eq!(entry.hours, 7.5);

        let entry: SleepEntry = serde_json::from_str(r#"{"date": 12345, "hours": 6}"#).unwrap();
        assert_eq!(entry.date, None);

        let entry: SleepEntry = serde_json::from_str(r#"{"hours": 6}"#).unwrap();
        assert_eq!(entry.date, None);
    }

    #[test]
    fn test_habit_completed_dates_skip_bad_values() {
        let habit: HabitRecord = serde_json::from_str(
            r#"{"name": "Read", "completed_dates": ["2024-01-01", "oops", 7, "2024-01-02T10:00:00Z"]}"#,
        )
        .unwrap();
        assert_eq!(habit.completed_dates.len(), 2);
        assert_eq!(habit.frequency, HabitFrequency::Daily);
    }

    #[test]
    fn test_habit_toggle_recomputes_streak() {
        let mut habit = HabitRecord::new("Meditate", HabitFrequency::Daily);
        habit.completed_dates.insert(day(2024, 1, 3));
        habit.completed_dates.insert(day(2024, 1, 4));

        let today = day(2024, 1, 5);
        assert!(habit.toggle_completion(today, today));
        assert_eq!(habit.streak, 3);

        assert!(!habit.toggle_completion(today, today));
        assert!(!habit.is_completed_on(today));
        // The run ends yesterday and has not reached today
        assert_eq!(habit.streak, 0);
    }

    #[test]
    fn test_habit_backfill_counts_against_today() {
        let today = day(2024, 3, 10);
        let mut habit = HabitRecord::new("Walk", HabitFrequency::Daily);
        assert!(habit.toggle_completion(today, today));
        assert_eq!(habit.streak, 1);

        assert!(habit.toggle_completion(day(2024, 3, 9), today));
        assert!(habit.is_completed_on(day(2024, 3, 9)));
        assert_eq!(habit.streak, 2);
    }

    #[test]
    fn test_finance_category_vocabulary_depends_on_kind() {
        let mut entry = FinanceEntry {
            date: Some(day(2024, 1, 1)),
            amount: 12.5,
            kind: FinanceKind::Expense,
            category: "Food".to_string(),
            ..Default::default()
        };
        assert!(entry.validate().is_ok());

        entry.category = "Salary".to_string();
        assert!(matches!(entry.validate(), Err(Error::Validation(_))));

        // "Other" is shared, custom labels are open-ended
        entry.category = "Other".to_string();
        assert!(entry.validate().is_ok());
        entry.category = "Pets".to_string();
        assert!(entry.validate().is_ok());

        entry.kind = FinanceKind::Income;
        entry.category = "transport".to_string();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_finance_amount_must_be_positive() {
        let entry = FinanceEntry {
            amount: 0.0,
            category: "Food".to_string(),
            ..Default::default()
        };
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_gratitude_items_cleaned_and_validated() {
        let entry = GratitudeEntry::new(
            day(2024, 1, 1),
            vec!["  sunshine ".to_string(), "   ".to_string()],
            "walk",
            JournalMood::Amazing,
        );
        assert_eq!(entry.items, vec!["sunshine".to_string()]);
        assert!(entry.validate().is_ok());

        let empty = GratitudeEntry::new(day(2024, 1, 1), Vec::new(), "", JournalMood::Good);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_reflection_requires_wins_and_lessons() {
        let mut entry = ReflectionEntry {
            date: Some(day(2024, 1, 1)),
            rating: 7,
            wins: vec!["shipped".to_string()],
            lessons: vec![],
            ..Default::default()
        };
        assert!(entry.validate().is_err());

        entry.lessons = vec!["rest more".to_string()];
        assert!(entry.validate().is_ok());

        entry.rating = 11;
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_water_progress_is_capped_and_zero_safe() {
        let mut entry = WaterEntry {
            date: None,
            glasses: 4,
            goal: 8,
        };
        assert_eq!(entry.progress_percent(), 50.0);
        entry.glasses = 12;
        assert_eq!(entry.progress_percent(), 100.0);
        entry.goal = 0;
        assert_eq!(entry.progress_percent(), 0.0);
    }

    #[test]
    fn test_task_overdue() {
        let task = TaskEntry {
            title: "Essay".to_string(),
            due_date: Some(day(2024, 1, 4)),
            ..Default::default()
        };
        assert!(task.is_overdue(day(2024, 1, 5)));
        assert!(!task.is_overdue(day(2024, 1, 4)));

        let done = TaskEntry {
            completed: true,
            ..task
        };
        assert!(!done.is_overdue(day(2024, 1, 5)));
    }

    #[test]
    fn test_calendar_time_format() {
        let mut entry = CalendarEntry {
            title: "Dentist".to_string(),
            time: "09:30".to_string(),
            ..Default::default()
        };
        assert!(entry.validate().is_ok());
        entry.time = "half past nine".to_string();
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_enum_string_names() {
        assert_eq!("weekly".parse::<HabitFrequency>().unwrap(), HabitFrequency::Weekly);
        assert_eq!(FinanceKind::Income.as_str(), "income");
        assert_eq!("Rough".parse::<JournalMood>().unwrap(), JournalMood::Rough);
        assert!("sometimes".parse::<HabitFrequency>().is_err());
    }
}
