//! Authentication-related handlers

use axum::{Extension, Json};
use serde::Serialize;

use crate::{AuthMethod, CurrentUser};

/// Response for the /api/me endpoint
#[derive(Serialize)]
pub struct MeResponse {
    /// The user all entries are scoped to
    pub user: String,
    /// How the user was authenticated
    pub auth_method: AuthMethod,
}

/// Get the currently authenticated user
pub async fn get_me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        user: user.id,
        auth_method: user.method,
    })
}
