//! SocialCrew AI backend.
//!
//! A two-agent content/analytics pipeline behind a thin HTTP API. A
//! content creator agent writes social media posts about a topic, a
//! social analyst reviews them, and the resulting artifacts are served
//! to the frontend through an allow-listed file endpoint with tolerant
//! JSON parsing.
//!
//! # Modules
//!
//! - [`agent`] / [`task`] / [`crew`] — the pipeline itself
//! - [`llm`] — OpenAI-compatible providers (Groq, OpenAI)
//! - [`runner`] / [`run_log`] — run orchestration and the append-only log
//! - [`artifacts`] / [`converter`] — artifact allow-list and tolerant parsing
//! - [`server`] — axum HTTP surface
//! - [`config`] — directories, port, defaults

pub mod agent;
pub mod artifacts;
pub mod config;
pub mod converter;
pub mod crew;
pub mod llm;
pub mod run_log;
pub mod runner;
pub mod server;
pub mod task;

pub use agent::Agent;
pub use artifacts::Artifact;
pub use config::AppConfig;
pub use crew::{CrewOutput, CrewRunner, SocialCrew};
pub use run_log::RunLog;
pub use runner::{RunReport, RunStatus};
pub use task::{Task, TaskOutput};

/// Crate version, reported by the server.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
