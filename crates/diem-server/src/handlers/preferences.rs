//! Tracker catalogue and preference handlers

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppError, AppState, CurrentUser};
use diem_core::{Preferences, Theme, TrackerKind};

/// One tracker as listed by /api/trackers
#[derive(Serialize)]
pub struct TrackerInfo {
    pub kind: TrackerKind,
    pub title: &'static str,
    pub enabled: bool,
    /// Number of entries the caller has stored
    pub entries: usize,
}

/// GET /api/trackers - All trackers with enablement and entry counts
pub async fn list_trackers(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<TrackerInfo>>, AppError> {
    let counts = state.db.count_entries(&user.id)?;
    let prefs = state.preferences.read().await;

    let trackers = TrackerKind::all()
        .iter()
        .map(|kind| TrackerInfo {
            kind: *kind,
            title: kind.title(),
            enabled: prefs.is_enabled(*kind),
            entries: counts.get(kind).copied().unwrap_or(0),
        })
        .collect();

    Ok(Json(trackers))
}

/// GET /api/preferences
pub async fn get_preferences(State(state): State<Arc<AppState>>) -> Json<Preferences> {
    Json(state.preferences.read().await.clone())
}

/// Partial preference update; omitted fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub theme: Option<String>,
    pub trackers: Option<BTreeMap<String, bool>>,
}

/// PUT /api/preferences - Change theme or tracker enablement
pub async fn update_preferences(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<Preferences>, AppError> {
    // Validate everything before touching shared state
    let theme = req
        .theme
        .as_deref()
        .map(str::parse::<Theme>)
        .transpose()
        .map_err(|e| AppError::bad_request(&e))?;

    let mut toggles = Vec::new();
    for (name, enabled) in req.trackers.unwrap_or_default() {
        let kind = name
            .parse::<TrackerKind>()
            .map_err(|e| AppError::bad_request(&e))?;
        toggles.push((kind, enabled));
    }

    let updated = {
        let mut prefs = state.preferences.write().await;
        if let Some(theme) = theme {
            prefs.set_theme(theme);
        }
        for (kind, enabled) in &toggles {
            prefs.set_enabled(*kind, *enabled);
        }
        prefs.clone()
    };

    if let Some(path) = &state.config.preferences_path {
        updated.save(Some(path)).map_err(AppError::from_core)?;
    }

    info!(
        user = %user.id,
        theme = %updated.theme,
        enabled = updated.enabled_count(),
        "Updated preferences"
    );

    state.db.log_audit(
        &user.id,
        "update",
        Some("preferences"),
        None,
        Some(&format!(
            "theme={}, trackers_changed={}",
            updated.theme,
            toggles.len()
        )),
    )?;

    Ok(Json(updated))
}
