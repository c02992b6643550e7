//! Axum route handlers for the SocialCrew HTTP server.
//!
//! # Routes
//!
//! - `GET  /`            — Static HTML welcome page
//! - `GET  /health`      — Returns `{"status": "healthy", "cwd": ..., "files_exist": {...}}`
//! - `GET  /debug/files` — Returns `{"cwd": ..., "files": [{name, size, path}, ...]}`
//! - `GET  /file/:name`  — Serves an allow-listed artifact; 404 otherwise
//! - `POST /run`         — Runs the crew; 500 with the failure message on error
//! - `GET  /favicon.ico` — Fixed 1x1 transparent PNG

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::artifacts::Artifact;
use crate::config::{AppConfig, ALLOWED_ORIGINS, DEFAULT_TOPIC};
use crate::converter;
use crate::crew::CrewRunner;
use crate::run_log::RunLog;
use crate::runner::{self, RunReport, RunStatus};

/// Extensions listed by the debug endpoint.
const DEBUG_EXTENSIONS: &[&str] = &["json", "md", "txt", "log"];

const WELCOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>SocialCrew AI</title></head>
<body>
<h1>SocialCrew AI Backend</h1>
<p>The API is running.</p>
<ul>
<li><a href="/health">/health</a></li>
<li><a href="/debug/files">/debug/files</a></li>
<li><code>GET /file/{name}</code></li>
<li><code>POST /run</code></li>
</ul>
</body>
</html>
"#;

/// 1x1 transparent PNG served for `/favicon.ico`.
static FAVICON_PNG: Lazy<Vec<u8>> = Lazy::new(|| {
    base64::engine::general_purpose::STANDARD
        .decode("iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=")
        .expect("favicon base64")
});

/// Body of a `POST /run` request.
#[derive(Debug, Default, Deserialize)]
pub struct RunRequest {
    pub topic: Option<String>,
}

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Resolved directories and defaults.
    pub config: Arc<AppConfig>,
    /// The crew invoked by `POST /run`.
    pub runner: Arc<dyn CrewRunner>,
    /// Append-only run log.
    pub run_log: RunLog,
}

impl AppState {
    pub fn new(config: AppConfig, runner: Arc<dyn CrewRunner>) -> Self {
        let run_log = RunLog::new(&config.output_dir);
        Self {
            config: Arc::new(config),
            runner,
            run_log,
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/debug/files", get(debug_files_handler))
        .route("/file/:name", get(file_handler))
        .route("/run", post(run_handler))
        .route("/favicon.ico", get(favicon_handler))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the two known frontends: any method, any header, credentials.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ALLOWED_ORIGINS
        .iter()
        .map(|origin| HeaderValue::from_static(origin))
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// GET / — static welcome page.
async fn index_handler() -> Html<&'static str> {
    Html(WELCOME_PAGE)
}

/// GET /favicon.ico — fixed transparent pixel.
async fn favicon_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/png")],
        FAVICON_PNG.clone(),
    )
}

/// GET /health — liveness probe with artifact presence.
async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let files_exist: Value = Artifact::GENERATED
        .iter()
        .map(|a| (a.name().to_string(), Value::Bool(a.exists(&state.config))))
        .collect::<serde_json::Map<String, Value>>()
        .into();

    Json(json!({
        "status": "healthy",
        "cwd": state.config.output_dir.display().to_string(),
        "files_exist": files_exist,
    }))
}

/// GET /debug/files — enumerate known-extension files in the output dir.
///
/// Read-only and side-effect-free; unreadable entries are skipped rather
/// than failing the response.
async fn debug_files_handler(State(state): State<AppState>) -> Json<Value> {
    let mut files: Vec<Value> = Vec::new();

    if let Ok(entries) = std::fs::read_dir(&state.config.output_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or_default();
            if !DEBUG_EXTENSIONS.contains(&extension) {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            files.push(json!({
                "name": entry.file_name().to_string_lossy(),
                "size": metadata.len(),
                "path": path.display().to_string(),
            }));
        }
    }

    files.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));

    Json(json!({
        "cwd": state.config.output_dir.display().to_string(),
        "files": files,
    }))
}

/// GET /file/:name — serve an allow-listed artifact.
///
/// JSON artifacts are parsed tolerantly (see [`converter::extract_json`]):
/// a malformed file degrades to a 200 pass-through payload rather than an
/// error. Non-JSON artifacts are returned byte-for-byte.
async fn file_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "File not found"})),
        )
    };

    let artifact = Artifact::from_name(&name).ok_or_else(not_found)?;
    let path = artifact.path(&state.config);
    if !path.exists() {
        return Err(not_found());
    }

    if artifact.is_json() {
        let text = std::fs::read_to_string(&path).map_err(internal_error)?;
        return Ok(Json(converter::extract_json(&text)).into_response());
    }

    let bytes = std::fs::read(&path).map_err(internal_error)?;
    Ok(([(header::CONTENT_TYPE, artifact.content_type())], bytes).into_response())
}

/// POST /run — execute a crew run.
///
/// The body is optional; a missing or empty topic falls back to the fixed
/// API default ("AI LLMs"). The `TOPIC` environment variable only affects
/// the CLI binary, never this endpoint. The crew runs synchronously on a
/// blocking thread and is never retried; a failed run surfaces its message
/// as a 500.
async fn run_handler(
    State(state): State<AppState>,
    body: Option<Json<RunRequest>>,
) -> Result<Json<RunReport>, (StatusCode, Json<Value>)> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let topic = runner::effective_topic(request.topic.as_deref(), DEFAULT_TOPIC);

    let report = tokio::task::spawn_blocking(move || {
        runner::execute_run(
            state.runner.as_ref(),
            &state.config,
            &state.run_log,
            &topic,
        )
    })
    .await
    .map_err(|join_error| internal_error(format!("crew run panicked: {}", join_error)))?;

    match report.status {
        RunStatus::Completed => Ok(Json(report)),
        RunStatus::Failed => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": report.message})),
        )),
    }
}

fn internal_error(err: impl ToString) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": err.to_string()})),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
