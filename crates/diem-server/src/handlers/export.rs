//! Export and full import handlers

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, Response, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stats::PeriodQuery;
use crate::{today, AppError, AppState, CurrentUser};
use diem_core::{export_finance_csv, export_full as build_full_export, FullExport, ImportStats};

/// GET /api/export/finance - Finance entries as CSV
///
/// Accepts the same period parameters as the statistics endpoints; without
/// them the whole history is exported.
pub async fn export_finance(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PeriodQuery>,
) -> Result<Response<Body>, AppError> {
    let mode = params.optional_mode()?;
    let csv = export_finance_csv(&state.db, &user.id, mode, today())?;
    let rows = csv.lines().count().saturating_sub(1);
    info!(user = %user.id, rows, "Exported finance entries to CSV");

    state.db.log_audit(
        &user.id,
        "export_finance",
        Some("finance"),
        None,
        Some(&format!(
            "period={}, rows={}",
            mode.map(|m| m.label()).unwrap_or_else(|| "all".to_string()),
            rows
        )),
    )?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"diem-finance-{}.csv\"",
                today().format("%Y-%m-%d")
            ),
        )
        .body(Body::from(csv))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// GET /api/export/full - Every tracker collection as JSON
pub async fn export_full(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response<Body>, AppError> {
    let export = build_full_export(&state.db, &user.id)?;

    state.db.log_audit(
        &user.id,
        "export_full",
        None,
        None,
        Some(&format!(
            "version={}, total_records={}",
            export.version,
            export.total_records()
        )),
    )?;

    let json =
        serde_json::to_string_pretty(&export).map_err(|e| AppError::internal(&e.to_string()))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"diem-export-{}.json\"",
                today().format("%Y-%m-%d")
            ),
        )
        .body(Body::from(json))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// Query parameters for full import
#[derive(Debug, Deserialize)]
pub struct ImportFullQuery {
    /// Remove the caller's existing entries first
    #[serde(default)]
    pub clear: bool,
}

/// Response for full import
#[derive(Serialize)]
pub struct ImportFullResponse {
    pub success: bool,
    pub cleared: usize,
    pub stats: ImportStats,
}

/// POST /api/import/full - Import an export document into the caller's data
pub async fn import_full(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ImportFullQuery>,
    body: String,
) -> Result<Json<ImportFullResponse>, AppError> {
    let export: FullExport = serde_json::from_str(&body)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))?;

    info!(
        user = %user.id,
        version = %export.version,
        records = export.total_records(),
        "Importing full export"
    );

    let cleared = if params.clear {
        state.db.clear_entries(&user.id)?
    } else {
        0
    };

    let stats = diem_core::import_full(&state.db, &user.id, &export)?;

    state.db.log_audit(
        &user.id,
        "import_full",
        None,
        None,
        Some(&format!(
            "imported={}, skipped={}, cleared={}",
            stats.total_imported(),
            stats.skipped,
            cleared
        )),
    )?;

    Ok(Json(ImportFullResponse {
        success: true,
        cleared,
        stats,
    }))
}
