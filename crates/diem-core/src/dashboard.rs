//! Dashboard composites
//!
//! Glue between the store and the statistics core: merges per-tracker
//! collections into daily samples, runs period filtering and aggregation, and
//! assembles the summaries the CLI and API render.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::insights::{generate_insights, Insight, MetricAverages};
use crate::models::{
    DailyMetricSample, FinanceEntry, FinanceKind, MoodEntry, SleepEntry, StudyEntry,
    TrackerSnapshot, WaterEntry,
};
use crate::stats::{
    aggregate, breakdown, filter_period, group_by_category, round1, streaks_for, CategoryShare,
    FieldAggregate, PeriodMode, StreakSummary,
};

/// Measures charted on the statistics page
pub const DAILY_FIELDS: &[&str] = &["sleep", "study", "mood", "water"];

const HOURS_PER_DAY: f64 = 24.0;

/// Default daily water goal when no entry exists for today
pub const DEFAULT_WATER_GOAL: u32 = 8;

#[derive(Default)]
struct DayAccumulator {
    sleep: Option<f64>,
    study: Option<f64>,
    mood_sum: f64,
    mood_count: u32,
    water: Option<f64>,
}

fn add(slot: &mut Option<f64>, value: f64) {
    *slot = Some(slot.unwrap_or(0.0) + value);
}

/// Merge tracker collections into one sample per calendar day.
///
/// Sleep hours, study hours and glasses of water are summed per day; mood
/// ratings are averaged. Undated entries are skipped.
pub fn daily_samples(
    sleep: &[SleepEntry],
    study: &[StudyEntry],
    mood: &[MoodEntry],
    water: &[WaterEntry],
) -> Vec<DailyMetricSample> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();

    for (date, hours) in sleep.iter().filter_map(|e| e.date.map(|d| (d, e.hours))) {
        add(&mut days.entry(date).or_default().sleep, hours);
    }
    for (date, hours) in study.iter().filter_map(|e| e.date.map(|d| (d, e.hours))) {
        add(&mut days.entry(date).or_default().study, hours);
    }
    for (date, rating) in mood.iter().filter_map(|e| e.date.map(|d| (d, e.rating))) {
        let day = days.entry(date).or_default();
        day.mood_sum += f64::from(rating);
        day.mood_count += 1;
    }
    for (date, glasses) in water.iter().filter_map(|e| e.date.map(|d| (d, e.glasses))) {
        add(&mut days.entry(date).or_default().water, f64::from(glasses));
    }

    days.into_iter()
        .map(|(date, acc)| DailyMetricSample {
            date: Some(date),
            sleep: acc.sleep,
            study: acc.study,
            mood: (acc.mood_count > 0).then(|| acc.mood_sum / f64::from(acc.mood_count)),
            water: acc.water,
        })
        .collect()
}

/// How the hours of the period split between sleep, study and the rest
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityBreakdown {
    pub sleep_hours: f64,
    pub study_hours: f64,
    pub free_hours: f64,
}

impl ActivityBreakdown {
    /// Free time is whatever is left of `days * 24`, never negative
    pub fn from_totals(days: usize, sleep_hours: f64, study_hours: f64) -> Self {
        let available = days as f64 * HOURS_PER_DAY;
        Self {
            sleep_hours,
            study_hours,
            free_hours: (available - sleep_hours - study_hours).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub period: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Days in the window that carry at least one measure
    pub days_with_data: usize,
    pub aggregates: BTreeMap<String, FieldAggregate>,
    /// Averages rounded to one decimal
    pub averages: MetricAverages,
    pub activity: ActivityBreakdown,
    pub insights: Vec<Insight>,
    /// Per-day series inside the window, oldest first, for charting
    pub days: Vec<DailyMetricSample>,
}

/// Aggregate daily samples over a period and derive insights
pub fn compute_dashboard_stats(
    samples: &[DailyMetricSample],
    mode: PeriodMode,
    today: NaiveDate,
) -> DashboardStats {
    let window = filter_period(samples, mode, today);
    let aggregates = aggregate(&window, DAILY_FIELDS);

    let mean = |field: &str| aggregates.get(field).and_then(FieldAggregate::mean);
    let averages = MetricAverages {
        sleep: mean("sleep"),
        study: mean("study"),
        mood: mean("mood"),
        water: mean("water"),
    };
    let insights = generate_insights(&averages);

    let total = |field: &str| aggregates.get(field).map(|a| a.sum).unwrap_or(0.0);
    let activity = ActivityBreakdown::from_totals(window.len(), total("sleep"), total("study"));

    let (start, end) = mode.bounds(today);
    tracing::debug!(
        period = %mode.label(),
        days = window.len(),
        insights = insights.len(),
        "Computed dashboard stats"
    );

    DashboardStats {
        period: mode.label(),
        start,
        end,
        days_with_data: window.len(),
        aggregates,
        averages: MetricAverages {
            sleep: averages.sleep.map(round1),
            study: averages.study.map(round1),
            mood: averages.mood.map(round1),
            water: averages.water.map(round1),
        },
        activity,
        insights,
        days: window,
    }
}

// =============================================================================
// Finance
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSummary {
    pub period: String,
    pub entries: usize,
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub expense_by_category: Vec<CategoryShare>,
    pub income_by_category: Vec<CategoryShare>,
    /// Up to the six most recent months across the whole history
    pub monthly: Vec<MonthlyTotals>,
}

const MONTHS_SHOWN: usize = 6;

fn kind_breakdown(entries: &[FinanceEntry], kind: FinanceKind) -> Vec<CategoryShare> {
    let of_kind: Vec<&FinanceEntry> = entries.iter().filter(|e| e.kind == kind).collect();
    breakdown(&group_by_category(
        &of_kind,
        |e| e.category.trim().to_string(),
        |e| e.amount,
    ))
}

/// Income/expense months, oldest first, limited to the latest six
pub fn monthly_totals(entries: &[FinanceEntry]) -> Vec<MonthlyTotals> {
    let mut months: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for entry in entries {
        let Some(date) = entry.date else { continue };
        let slot = months
            .entry(format!("{}-{:02}", date.year(), date.month()))
            .or_insert((0.0, 0.0));
        match entry.kind {
            FinanceKind::Income => slot.0 += entry.amount,
            FinanceKind::Expense => slot.1 += entry.amount,
        }
    }

    let skip = months.len().saturating_sub(MONTHS_SHOWN);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, (income, expense))| MonthlyTotals {
            month,
            income,
            expense,
        })
        .collect()
}

/// Totals and breakdowns for a period; `None` covers the whole history
pub fn compute_finance_summary(
    entries: &[FinanceEntry],
    mode: Option<PeriodMode>,
    today: NaiveDate,
) -> FinanceSummary {
    let window: Vec<FinanceEntry> = match mode {
        Some(mode) => filter_period(entries, mode, today),
        None => entries.to_vec(),
    };

    let total = |kind: FinanceKind| {
        window
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.amount)
            .sum::<f64>()
    };
    let total_income = total(FinanceKind::Income);
    let total_expense = total(FinanceKind::Expense);

    FinanceSummary {
        period: mode.map(|m| m.label()).unwrap_or_else(|| "all".to_string()),
        entries: window.len(),
        total_income,
        total_expense,
        balance: total_income - total_expense,
        expense_by_category: kind_breakdown(&window, FinanceKind::Expense),
        income_by_category: kind_breakdown(&window, FinanceKind::Income),
        monthly: monthly_totals(entries),
    }
}

// =============================================================================
// Tracker overview
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitStreak {
    pub name: String,
    pub completed_today: bool,
    pub current: u32,
    pub longest: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalOverview {
    pub entries: usize,
    pub streak: StreakSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionOverview {
    pub entries: usize,
    pub streak: StreakSummary,
    /// Rounded to one decimal; 0 without entries
    pub average_rating: f64,
    pub goals_achieved: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FitnessTotals {
    pub sessions: usize,
    pub minutes: f64,
    pub calories: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterToday {
    pub glasses: u32,
    pub goal: u32,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerOverview {
    pub period: String,
    pub habits: Vec<HabitStreak>,
    pub gratitude: JournalOverview,
    pub reflection: ReflectionOverview,
    pub tasks: TaskCounts,
    pub fitness: FitnessTotals,
    pub study_by_subject: Vec<CategoryShare>,
    pub total_study_hours: f64,
    pub average_sleep: Option<f64>,
    pub average_sleep_quality: Option<f64>,
    pub average_mood: Option<f64>,
    pub average_meal_calories: Option<f64>,
    pub total_meal_calories: f64,
    pub upcoming_events: usize,
    pub completed_events: usize,
    pub water_today: WaterToday,
    pub finance: FinanceSummary,
}

pub fn task_counts(snapshot: &TrackerSnapshot, today: NaiveDate) -> TaskCounts {
    let completed = snapshot.tasks.iter().filter(|t| t.completed).count();
    TaskCounts {
        total: snapshot.tasks.len(),
        completed,
        pending: snapshot.tasks.len() - completed,
        overdue: snapshot.tasks.iter().filter(|t| t.is_overdue(today)).count(),
    }
}

fn water_today(entries: &[WaterEntry], today: NaiveDate) -> WaterToday {
    let todays: Vec<&WaterEntry> = entries.iter().filter(|e| e.date == Some(today)).collect();
    let Some(last) = todays.last() else {
        return WaterToday {
            glasses: 0,
            goal: DEFAULT_WATER_GOAL,
            progress_percent: 0.0,
        };
    };
    let merged = WaterEntry {
        date: Some(today),
        glasses: todays
            .iter()
            .fold(0u32, |total, e| total.saturating_add(e.glasses)),
        goal: last.goal,
    };
    WaterToday {
        glasses: merged.glasses,
        goal: merged.goal,
        progress_percent: merged.progress_percent(),
    }
}

fn average_of<R: crate::stats::Measured>(records: &[R], field: &str) -> Option<f64> {
    aggregate(records, &[field])
        .get(field)
        .and_then(FieldAggregate::mean)
        .map(round1)
}

fn total_of<R: crate::stats::Measured>(records: &[R], field: &str) -> f64 {
    aggregate(records, &[field])
        .get(field)
        .map(|a| round1(a.sum))
        .unwrap_or(0.0)
}

/// Summarize every tracker for the overview screen.
///
/// Streaks, task counts and today's water use the full history; averages,
/// totals and breakdowns use the period window.
pub fn build_overview(
    snapshot: &TrackerSnapshot,
    mode: PeriodMode,
    today: NaiveDate,
) -> TrackerOverview {
    let habits = snapshot
        .habits
        .iter()
        .map(|h| {
            let streak = crate::stats::compute_streaks(h.completed_dates.iter().copied(), today);
            HabitStreak {
                name: h.name.clone(),
                completed_today: h.is_completed_on(today),
                current: streak.current,
                longest: streak.longest,
            }
        })
        .collect();

    let reflections = filter_period(&snapshot.reflections, mode, today);
    let reflection = ReflectionOverview {
        entries: snapshot.reflections.len(),
        streak: streaks_for(&snapshot.reflections, today),
        average_rating: average_of(&reflections, "rating").unwrap_or(0.0),
        goals_achieved: reflections.iter().filter(|r| r.goals_achieved).count(),
    };

    let fitness_window = filter_period(&snapshot.fitness, mode, today);
    let fitness_totals = aggregate(&fitness_window, &["duration", "calories"]);
    let sum = |field: &str| fitness_totals.get(field).map(|a| a.sum).unwrap_or(0.0);
    let fitness = FitnessTotals {
        sessions: fitness_window.len(),
        minutes: sum("duration"),
        calories: sum("calories"),
    };

    let study_window = filter_period(&snapshot.study, mode, today);
    let study_by_subject = breakdown(&group_by_category(
        &study_window,
        |e| e.subject.trim().to_string(),
        |e| e.hours,
    ));

    let upcoming_events = snapshot
        .calendar
        .iter()
        .filter(|e| !e.completed && e.date.is_some_and(|d| d >= today))
        .count();
    let completed_events = snapshot.calendar.iter().filter(|e| e.completed).count();

    let sleep_window = filter_period(&snapshot.sleep, mode, today);
    let meal_window = filter_period(&snapshot.meals, mode, today);

    TrackerOverview {
        period: mode.label(),
        habits,
        gratitude: JournalOverview {
            entries: snapshot.gratitude.len(),
            streak: streaks_for(&snapshot.gratitude, today),
        },
        reflection,
        tasks: task_counts(snapshot, today),
        fitness,
        total_study_hours: total_of(&study_window, "hours"),
        study_by_subject,
        average_sleep: average_of(&sleep_window, "hours"),
        average_sleep_quality: average_of(&sleep_window, "quality"),
        average_mood: average_of(&filter_period(&snapshot.mood, mode, today), "rating"),
        average_meal_calories: average_of(&meal_window, "calories"),
        total_meal_calories: total_of(&meal_window, "calories"),
        upcoming_events,
        completed_events,
        water_today: water_today(&snapshot.water, today),
        finance: compute_finance_summary(&snapshot.finance, Some(mode), today),
    }
}
