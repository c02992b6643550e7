//! HTTP server for the SocialCrew backend.
//!
//! Exposes the crew behind a thin API the frontend polls for artifacts.
//!
//! # Endpoints
//!
//! - `GET  /`            — Welcome page
//! - `GET  /health`      — Liveness probe with artifact presence
//! - `GET  /debug/files` — Enumerate known-extension files in the output dir
//! - `GET  /file/:name`  — Serve an allow-listed artifact
//! - `POST /run`         — Execute a crew run
//! - `GET  /favicon.ico` — 1x1 transparent PNG

pub mod routes;

pub use routes::{app_router, AppState, RunRequest};
