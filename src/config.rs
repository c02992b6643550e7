//! Runtime configuration for the SocialCrew service.
//!
//! Directories are resolved once at startup and injected into the server
//! state, instead of living as process-wide working-directory globals.
//! Tests point the service at temporary directories through [`AppConfig::new`].

use std::path::PathBuf;

/// Topic used when a run request carries no topic.
pub const DEFAULT_TOPIC: &str = "AI LLMs";

/// Default HTTP listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Origins allowed by the CORS layer.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "https://socialcrew-ai-frontend.vercel.app", // Vercel prod
    "http://localhost:3000",                     // Local dev
];

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory where the crew writes its generated artifacts.
    pub output_dir: PathBuf,
    /// Directory holding knowledge files (`user_preference.txt`).
    pub knowledge_dir: PathBuf,
    /// HTTP listen port.
    pub port: u16,
    /// Default topic for CLI runs.
    pub default_topic: String,
}

impl AppConfig {
    /// Build a config rooted at the given output directory.
    ///
    /// The knowledge directory defaults to `<output_dir>/knowledge`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let knowledge_dir = output_dir.join("knowledge");
        Self {
            output_dir,
            knowledge_dir,
            port: DEFAULT_PORT,
            default_topic: DEFAULT_TOPIC.to_string(),
        }
    }

    /// Build a config from the environment.
    ///
    /// * `PORT` — HTTP listen port (default: 8000)
    /// * `TOPIC` — default topic for CLI runs (default: "AI LLMs")
    ///
    /// The output directory is the process working directory, which is
    /// where the crew writes its artifacts.
    pub fn from_env() -> Self {
        let output_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut config = Self::new(output_dir);

        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(topic) = std::env::var("TOPIC") {
            if !topic.trim().is_empty() {
                config.default_topic = topic;
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knowledge_dir_is_nested_under_output_dir() {
        let config = AppConfig::new("/srv/socialcrew");
        assert_eq!(config.output_dir, PathBuf::from("/srv/socialcrew"));
        assert_eq!(
            config.knowledge_dir,
            PathBuf::from("/srv/socialcrew/knowledge")
        );
    }

    #[test]
    fn defaults_applied() {
        let config = AppConfig::new(".");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.default_topic, DEFAULT_TOPIC);
    }
}
