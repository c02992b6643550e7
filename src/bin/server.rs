//! SocialCrew HTTP server binary.
//!
//! Starts an axum server exposing the crew behind the file-serving API.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8000)
//! - `TOPIC` — default run topic (default: "AI LLMs")
//! - `GROQ_API_KEY` / `OPENAI_API_KEY` — LLM provider credentials
//! - `RUST_LOG` — Tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::sync::Arc;

use socialcrew::config::AppConfig;
use socialcrew::crew::SocialCrew;
use socialcrew::llm;
use socialcrew::server::{app_router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,socialcrew=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = format!("0.0.0.0:{}", config.port);

    let provider = llm::from_env();
    match &provider {
        Some(p) => tracing::info!("LLM provider configured: {}", p.model()),
        None => tracing::warn!(
            "no LLM provider configured; /run will fail until GROQ_API_KEY or OPENAI_API_KEY is set"
        ),
    }

    let crew = SocialCrew::new(config.output_dir.clone(), provider);
    let state = AppState::new(config, Arc::new(crew));
    let app = app_router(state);

    tracing::info!("socialcrew server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health      — liveness probe");
    tracing::info!("  GET  /file/:name  — artifact retrieval");
    tracing::info!("  POST /run         — crew run");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
