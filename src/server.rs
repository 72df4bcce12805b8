//! JSON HTTP API and static search page.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Static search page |
//! | `GET`  | `/api/search?q=&category=` | Substring search over the snapshot |
//! | `GET`  | `/api/file?path=` | Serve an archive file (PDF/image/XML) |
//! | `GET`  | `/api/stats` | Snapshot statistics |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! The snapshot is reloaded from disk on every search/stats request; it is
//! read-only input, so there is no cache invalidation to coordinate.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "file not found" } }
//! ```
//!
//! Error codes: `bad_request` (400), `forbidden` (403), `not_found` (404).
//!
//! # File serving containment
//!
//! `/api/file` only serves paths that canonicalize under a configured
//! archive root. Requests outside the roots get `403`; the endpoint never
//! discloses arbitrary local files.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the static page can be
//! hosted separately from the API.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::models::{SearchMatch, Stats};
use crate::search::{search_parts, ALL_CATEGORIES};
use crate::snapshot;

/// Shared application state passed to all route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
}

/// Starts the HTTP server. Binds to the address configured in
/// `[server].bind` and runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_index))
        .route("/api/search", get(handle_search))
        .route("/api/file", get(handle_file))
        .route("/api/stats", get(handle_stats))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("partdex server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn forbidden(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::FORBIDDEN,
        code: "forbidden".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET / ============

async fn handle_index() -> Html<&'static str> {
    Html(include_str!("../assets/search.html"))
}

// ============ GET /api/search ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default = "default_category")]
    category: String,
}

fn default_category() -> String {
    ALL_CATEGORIES.to_string()
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<SearchMatch>,
}

/// Handler for `GET /api/search`.
///
/// Reloads the snapshot and runs a linear substring scan. Sub-minimum-length
/// queries return an empty result set, not an error.
async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    let snapshot = snapshot::load_or_empty(&state.config.snapshot.path);
    let results = search_parts(&snapshot, &params.q, &params.category);
    Json(SearchResponse { results })
}

// ============ GET /api/file ============

#[derive(Deserialize)]
struct FileParams {
    #[serde(default)]
    path: String,
}

/// Handler for `GET /api/file`.
///
/// Serves raw bytes of a referenced archive file. The stored paths are weak
/// references, so absence is an expected condition and maps to `404`.
async fn handle_file(
    State(state): State<AppState>,
    Query(params): Query<FileParams>,
) -> Result<Response, AppError> {
    if params.path.trim().is_empty() {
        return Err(bad_request("path must not be empty"));
    }

    let roots = state.config.archive.serve_roots();
    let path = match resolve_contained(Path::new(&params.path), &roots) {
        FileAccess::Resolved(path) => path,
        FileAccess::NotFound => return Err(not_found("file not found")),
        FileAccess::Forbidden => {
            return Err(forbidden("path is outside the configured archive roots"))
        }
    };

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| not_found("file not found"))?;
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok(([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response())
}

/// Outcome of resolving a requested path against the allowed roots.
enum FileAccess {
    Resolved(PathBuf),
    NotFound,
    Forbidden,
}

/// Canonicalizes the requested path and checks it lives under one of the
/// allowed roots. Canonicalization resolves `..` and symlinks, so prefix
/// comparison is sufficient.
fn resolve_contained(requested: &Path, roots: &[PathBuf]) -> FileAccess {
    let canonical = match requested.canonicalize() {
        Ok(path) => path,
        Err(_) => return FileAccess::NotFound,
    };

    for root in roots {
        if let Ok(root) = root.canonicalize() {
            if canonical.starts_with(&root) {
                return FileAccess::Resolved(canonical);
            }
        }
    }

    FileAccess::Forbidden
}

// ============ GET /api/stats ============

/// Handler for `GET /api/stats`. Returns the precomputed counts from the
/// snapshot (zeros when no snapshot exists).
async fn handle_stats(State(state): State<AppState>) -> Json<Stats> {
    let snapshot = snapshot::load_or_empty(&state.config.snapshot.path);
    Json(snapshot.stats)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
