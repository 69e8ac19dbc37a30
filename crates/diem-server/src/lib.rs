//! Diem Web Server
//!
//! Axum-based REST API for the Diem life tracker.
//!
//! Security features:
//! - Authentication required by default (upstream identity header or API key)
//! - Restrictive CORS policy
//! - Audit logging for writes and exports
//! - Sanitized error responses

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use diem_core::{Database, Preferences};

mod handlers;

/// Header an upstream proxy sets to the authenticated user id
pub const DEFAULT_IDENTITY_HEADER: &str = "x-authenticated-user";

/// User id for requests when authentication is disabled
pub const LOCAL_USER: &str = "local";

/// Upper bound for list limits
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// An API key and the user it authenticates as
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiKey {
    pub user: String,
    pub key: String,
}

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Bearer keys accepted in the Authorization header
    pub api_keys: Vec<ApiKey>,
    /// Header carrying the user id set by a trusted reverse proxy
    pub identity_header: String,
    /// Preferences file; `None` uses the default location
    pub preferences_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
            identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
            preferences_path: None,
        }
    }
}

/// Parse comma-separated `user:key` pairs
///
/// Entries without a user or key are skipped with a warning.
pub fn parse_api_keys(input: &str) -> Vec<ApiKey> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|entry| match entry.split_once(':') {
            Some((user, key)) if !user.trim().is_empty() && !key.trim().is_empty() => {
                Some(ApiKey {
                    user: user.trim().to_string(),
                    key: key.trim().to_string(),
                })
            }
            _ => {
                warn!("Ignoring malformed API key entry (expected user:key)");
                None
            }
        })
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub preferences: RwLock<Preferences>,
}

/// How a request was authenticated
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    IdentityHeader,
    ApiKey,
    None,
}

/// The user a request acts for, resolved by the auth middleware
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: String,
    pub method: AuthMethod,
}

/// Authentication middleware
///
/// Resolves the user from the identity header set by a trusted reverse
/// proxy, or from a bearer API key. API keys are compared in constant time.
/// The resolved `CurrentUser` is stored in request extensions.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let user = if !state.config.require_auth {
        Some(CurrentUser {
            id: LOCAL_USER.to_string(),
            method: AuthMethod::None,
        })
    } else {
        resolve_user(request.headers(), &state.config)
    };

    match user {
        Some(user) => {
            tracing::debug!(user = %user.id, method = ?user.method, path = %path, "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        None => {
            warn!(path = %path, "Unauthorized request - no valid auth");
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({
                    "error": "Authentication required"
                })),
            )
                .into_response()
        }
    }
}

fn resolve_user(headers: &axum::http::HeaderMap, config: &ServerConfig) -> Option<CurrentUser> {
    let identity = headers
        .get(config.identity_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(id) = identity {
        return Some(CurrentUser {
            id: id.to_string(),
            method: AuthMethod::IdentityHeader,
        });
    }

    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .and_then(|key| validate_api_key(key.trim(), &config.api_keys))
        .map(|user| CurrentUser {
            id: user,
            method: AuthMethod::ApiKey,
        })
}

/// Find the user owning `provided`, comparing keys in constant time
fn validate_api_key(provided: &str, valid_keys: &[ApiKey]) -> Option<String> {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();
    let mut owner = None;

    for entry in valid_keys {
        let key_bytes = entry.key.as_bytes();
        if provided_bytes.len() == key_bytes.len()
            && bool::from(provided_bytes.ct_eq(key_bytes))
            && owner.is_none()
        {
            owner = Some(entry.user.clone());
        }
    }
    owner
}

/// Reference day for streaks and periods
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(
    db: Database,
    preferences: Preferences,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        preferences: RwLock::new(preferences),
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Trackers and preferences
        .route("/trackers", get(handlers::list_trackers))
        .route(
            "/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        // Habits
        .route(
            "/habits",
            get(handlers::list_habits).post(handlers::create_habit),
        )
        .route(
            "/habits/:id",
            axum::routing::delete(handlers::delete_habit),
        )
        .route("/habits/:id/toggle", post(handlers::toggle_habit))
        // Entries of any tracker
        .route(
            "/entries/:kind",
            get(handlers::list_entries).post(handlers::create_entry),
        )
        .route(
            "/entries/:kind/:id",
            get(handlers::get_entry)
                .put(handlers::update_entry)
                .delete(handlers::delete_entry),
        )
        // Statistics
        .route("/stats/dashboard", get(handlers::get_dashboard))
        .route("/stats/overview", get(handlers::get_overview))
        .route("/stats/streaks", get(handlers::get_streaks))
        .route("/stats/finance", get(handlers::get_finance_summary))
        // Export / import
        .route("/export/finance", get(handlers::export_finance))
        .route("/export/full", get(handlers::export_full))
        .route("/import/full", post(handlers::import_full))
        // Audit log
        .route("/audit", get(handlers::list_audit_log));

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("Authentication disabled - do not expose to network!");
    }

    let preferences = Preferences::load(config.preferences_path.as_deref())?;
    info!(
        theme = %preferences.theme,
        enabled = preferences.enabled_count(),
        "Loaded preferences"
    );

    let app = create_router(db, preferences, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(anyhow::anyhow!("{}", msg)),
        }
    }

    /// Map a core error: bad input is 400, missing records 404, the rest 500
    pub fn from_core(err: diem_core::Error) -> Self {
        match err {
            diem_core::Error::Validation(msg) | diem_core::Error::InvalidData(msg) => {
                Self::bad_request(&msg)
            }
            diem_core::Error::NotFound(msg) => Self::not_found(&format!("Not found: {}", msg)),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}
