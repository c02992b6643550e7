//! SocialCrew CLI binary.
//!
//! Runs the crew once from the command line, without the HTTP server.
//! The topic comes from the first argument, then the `TOPIC` environment
//! variable, then the built-in default.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin crew -- "electric cars"
//! ```

use std::sync::Arc;

use anyhow::bail;

use socialcrew::config::AppConfig;
use socialcrew::crew::SocialCrew;
use socialcrew::llm;
use socialcrew::run_log::RunLog;
use socialcrew::runner::{self, RunStatus};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let topic = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.default_topic.clone());

    let crew = SocialCrew::new(config.output_dir.clone(), llm::from_env());
    let log = RunLog::new(&config.output_dir);

    let report = runner::execute_run(&crew, &config, &log, &topic);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.status == RunStatus::Failed {
        bail!("crew run failed: {}", report.message);
    }
    Ok(())
}
