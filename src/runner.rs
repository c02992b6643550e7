//! Run orchestration: invoke the crew, log the attempt, report the outcome.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use crate::artifacts::Artifact;
use crate::config::AppConfig;
use crate::crew::CrewRunner;
use crate::run_log::RunLog;

/// Outcome of a run attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
}

/// Result of a run attempt, constructed fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub topic: String,
    pub year: String,
    pub message: String,
    /// Existence of the generated artifacts, re-checked after the run.
    pub files: BTreeMap<String, bool>,
}

/// Resolve the effective topic: trimmed request topic, or the default.
pub fn effective_topic(requested: Option<&str>, default: &str) -> String {
    match requested {
        Some(topic) if !topic.trim().is_empty() => topic.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Execute one crew run and append exactly one line to the run log.
///
/// Crew failures are not retried or classified; the error's string form
/// is logged and carried in the report for the caller to surface.
pub fn execute_run(runner: &dyn CrewRunner, config: &AppConfig, log: &RunLog, topic: &str) -> RunReport {
    let year = Local::now().year().to_string();
    let inputs = HashMap::from([
        ("topic".to_string(), topic.to_string()),
        ("current_year".to_string(), year.clone()),
    ]);

    tracing::info!(topic, %year, "starting crew run");

    match runner.kickoff(&inputs) {
        Ok(_) => {
            if let Err(err) = log.completed(topic, &year) {
                tracing::warn!("failed to append to run log: {}", err);
            }
            RunReport {
                status: RunStatus::Completed,
                topic: topic.to_string(),
                year,
                message: "Crew run completed successfully".to_string(),
                files: artifact_presence(config),
            }
        }
        Err(err) => {
            let message = err.to_string();
            if let Err(log_err) = log.failed(topic, &year, &message) {
                tracing::warn!("failed to append to run log: {}", log_err);
            }
            tracing::error!(topic, "crew run failed: {}", message);
            RunReport {
                status: RunStatus::Failed,
                topic: topic.to_string(),
                year,
                message,
                files: artifact_presence(config),
            }
        }
    }
}

/// Stat the generated artifacts after a run.
fn artifact_presence(config: &AppConfig) -> BTreeMap<String, bool> {
    Artifact::GENERATED
        .iter()
        .map(|artifact| (artifact.name().to_string(), artifact.exists(config)))
        .collect()
}
