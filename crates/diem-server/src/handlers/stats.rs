//! Dashboard, overview, streak and finance statistics

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::{today, AppError, AppState, CurrentUser};
use diem_core::stats::streaks_for;
use diem_core::{
    build_overview, compute_dashboard_stats, compute_finance_summary, daily_samples,
    DashboardStats, FinanceSummary, PeriodMode, RecordStore, StreakSummary, TrackerOverview,
};

/// Period selection shared by the statistics endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PeriodQuery {
    /// week, month or year
    pub period: Option<String>,
    /// Custom range start (YYYY-MM-DD), requires `to`
    pub from: Option<String>,
    /// Custom range end (YYYY-MM-DD), requires `from`
    pub to: Option<String>,
}

impl PeriodQuery {
    /// Resolve to a mode, defaulting to the trailing week
    pub fn mode(&self) -> Result<PeriodMode, AppError> {
        PeriodMode::parse(
            self.period.as_deref().unwrap_or("week"),
            self.from.as_deref(),
            self.to.as_deref(),
        )
        .map_err(AppError::from_core)
    }

    /// `None` when neither a preset nor a range was requested
    pub fn optional_mode(&self) -> Result<Option<PeriodMode>, AppError> {
        if self.period.is_none() && self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        self.mode().map(Some)
    }
}

/// GET /api/stats/dashboard - Sleep, study, mood and water over a period
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<DashboardStats>, AppError> {
    let mode = params.mode()?;
    let snapshot = state.db.snapshot(&user.id)?;

    let samples = daily_samples(
        &snapshot.sleep,
        &snapshot.study,
        &snapshot.mood,
        &snapshot.water,
    );

    Ok(Json(compute_dashboard_stats(&samples, mode, today())))
}

/// GET /api/stats/overview - Every tracker summarized
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<TrackerOverview>, AppError> {
    let mode = params.mode()?;
    let snapshot = state.db.snapshot(&user.id)?;

    Ok(Json(build_overview(&snapshot, mode, today())))
}

#[derive(Serialize)]
pub struct StreaksResponse {
    pub gratitude: StreakSummary,
    pub reflection: StreakSummary,
    /// Days where any habit was completed
    pub habits: StreakSummary,
}

/// GET /api/stats/streaks
pub async fn get_streaks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<StreaksResponse>, AppError> {
    let snapshot = state.db.snapshot(&user.id)?;
    let today = today();

    let habit_days = snapshot
        .habits
        .iter()
        .flat_map(|h| h.completed_dates.iter().copied());

    Ok(Json(StreaksResponse {
        gratitude: streaks_for(&snapshot.gratitude, today),
        reflection: streaks_for(&snapshot.reflections, today),
        habits: diem_core::stats::compute_streaks(habit_days, today),
    }))
}

/// GET /api/stats/finance - Totals and category breakdowns
///
/// Without period parameters the whole history is summarized.
pub async fn get_finance_summary(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Json<FinanceSummary>, AppError> {
    let mode = params.optional_mode()?;
    let entries: Vec<_> = state
        .db
        .list::<diem_core::models::FinanceEntry>(&user.id)?
        .into_iter()
        .map(|s| s.record)
        .collect();

    Ok(Json(compute_finance_summary(&entries, mode, today())))
}
