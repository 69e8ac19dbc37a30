//! Generic tracker entry handlers
//!
//! Every tracker shares the same routes under `/api/entries/:kind`. Bodies
//! are JSON documents validated against the tracker's record type.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppError, AppState, CurrentUser, SuccessResponse, MAX_PAGE_LIMIT};
use diem_core::{RecordStore, Stored, TrackerKind};

fn parse_kind(kind: &str) -> Result<TrackerKind, AppError> {
    kind.parse::<TrackerKind>()
        .map_err(|e| AppError::bad_request(&e))
}

#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    pub limit: Option<i64>,
}

/// GET /api/entries/:kind - Entries of one tracker, newest first
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(kind): Path<String>,
    Query(params): Query<ListEntriesQuery>,
) -> Result<Json<Vec<Stored<Value>>>, AppError> {
    let kind = parse_kind(&kind)?;
    let mut entries = state.db.list_documents(&user.id, kind)?;

    if let Some(limit) = params.limit {
        entries.truncate(limit.clamp(1, MAX_PAGE_LIMIT) as usize);
    }

    Ok(Json(entries))
}

/// POST /api/entries/:kind
pub async fn create_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(kind): Path<String>,
    Json(document): Json<Value>,
) -> Result<Json<Stored<Value>>, AppError> {
    let kind = parse_kind(&kind)?;
    let id = state
        .db
        .insert_document(&user.id, kind, document)
        .map_err(AppError::from_core)?;

    let stored = state
        .db
        .get_document(&user.id, kind, id)?
        .ok_or_else(|| AppError::not_found("Entry not found"))?;

    state
        .db
        .log_audit(&user.id, "create", Some(kind.as_str()), Some(id), None)?;

    Ok(Json(stored))
}

/// GET /api/entries/:kind/:id
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<Stored<Value>>, AppError> {
    let kind = parse_kind(&kind)?;
    state
        .db
        .get_document(&user.id, kind, id)?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Entry not found"))
}

/// PUT /api/entries/:kind/:id - Replace an entry
pub async fn update_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((kind, id)): Path<(String, i64)>,
    Json(document): Json<Value>,
) -> Result<Json<Stored<Value>>, AppError> {
    let kind = parse_kind(&kind)?;
    state
        .db
        .update_document(&user.id, kind, id, document)
        .map_err(AppError::from_core)?;

    let stored = state
        .db
        .get_document(&user.id, kind, id)?
        .ok_or_else(|| AppError::not_found("Entry not found"))?;

    state
        .db
        .log_audit(&user.id, "update", Some(kind.as_str()), Some(id), None)?;

    Ok(Json(stored))
}

/// DELETE /api/entries/:kind/:id
pub async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<SuccessResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    if !state.db.delete(&user.id, kind, id)? {
        return Err(AppError::not_found("Entry not found"));
    }

    state
        .db
        .log_audit(&user.id, "delete", Some(kind.as_str()), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
