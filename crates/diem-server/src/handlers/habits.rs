//! Habit handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{today, AppError, AppState, CurrentUser, SuccessResponse};
use diem_core::models::{HabitFrequency, HabitRecord};
use diem_core::stats::compute_streaks;
use diem_core::{RecordStore, Stored, TrackerKind};

/// A habit with streaks computed for today
#[derive(Serialize)]
pub struct HabitView {
    #[serde(flatten)]
    pub habit: Stored<HabitRecord>,
    pub completed_today: bool,
    pub current_streak: u32,
    pub longest_streak: u32,
}

impl HabitView {
    fn new(habit: Stored<HabitRecord>) -> Self {
        let today = today();
        let streaks = compute_streaks(habit.record.completed_dates.iter().copied(), today);
        Self {
            completed_today: habit.record.is_completed_on(today),
            current_streak: streaks.current,
            longest_streak: streaks.longest,
            habit,
        }
    }
}

/// GET /api/habits
pub async fn list_habits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<HabitView>>, AppError> {
    let habits = state
        .db
        .list::<HabitRecord>(&user.id)
        .map_err(AppError::from_core)?;

    Ok(Json(habits.into_iter().map(HabitView::new).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateHabitRequest {
    pub name: String,
    #[serde(default)]
    pub frequency: HabitFrequency,
}

/// POST /api/habits
pub async fn create_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateHabitRequest>,
) -> Result<Json<HabitView>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Habit name is required"));
    }

    let id = state
        .db
        .insert(&user.id, &HabitRecord::new(name, req.frequency))
        .map_err(AppError::from_core)?;
    let habit = state
        .db
        .get::<HabitRecord>(&user.id, id)
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::not_found("Habit not found"))?;

    info!(user = %user.id, habit = id, "Created habit");
    state
        .db
        .log_audit(&user.id, "create", Some("habit"), Some(id), Some(name))?;

    Ok(Json(HabitView::new(habit)))
}

/// DELETE /api/habits/:id
pub async fn delete_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    if !state.db.delete(&user.id, TrackerKind::Habit, id)? {
        return Err(AppError::not_found("Habit not found"));
    }

    state
        .db
        .log_audit(&user.id, "delete", Some("habit"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// POST /api/habits/:id/toggle - Flip today's completion
pub async fn toggle_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<HabitView>, AppError> {
    let today = today();
    let habit = state
        .db
        .toggle_habit(&user.id, id, today, today)
        .map_err(AppError::from_core)?;

    let view = HabitView::new(habit);
    state.db.log_audit(
        &user.id,
        "toggle",
        Some("habit"),
        Some(id),
        Some(&format!("done={}", view.completed_today)),
    )?;

    Ok(Json(view))
}
