//! Artifact allow-list and path resolution.
//!
//! Retrieval is gated by a fixed set of filenames; the set is the single
//! source of truth for what may be exposed, independent of filesystem
//! contents. Names are matched exactly before any path is constructed, so
//! request input never participates in path building.

use std::path::PathBuf;

use crate::config::AppConfig;

/// Filename of the generated social posts artifact.
pub const SOCIAL_POSTS: &str = "social_posts.json";
/// Filename of the generated analytics summary artifact.
pub const ANALYTICS_SUMMARY: &str = "analytics_summary.md";
/// Filename of the user preference knowledge file.
pub const USER_PREFERENCE: &str = "user_preference.txt";

/// A file the service is allowed to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// `social_posts.json`, written by the content creation task.
    SocialPosts,
    /// `analytics_summary.md`, written by the analytics task.
    AnalyticsSummary,
    /// `knowledge/user_preference.txt`, a knowledge input for the crew.
    UserPreference,
}

impl Artifact {
    /// Artifacts produced by a crew run, in task order.
    pub const GENERATED: [Artifact; 2] = [Artifact::SocialPosts, Artifact::AnalyticsSummary];

    /// Look a name up in the allow-list. Anything else is rejected.
    pub fn from_name(name: &str) -> Option<Artifact> {
        match name {
            SOCIAL_POSTS => Some(Artifact::SocialPosts),
            ANALYTICS_SUMMARY => Some(Artifact::AnalyticsSummary),
            USER_PREFERENCE => Some(Artifact::UserPreference),
            _ => None,
        }
    }

    /// Canonical filename of the artifact.
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::SocialPosts => SOCIAL_POSTS,
            Artifact::AnalyticsSummary => ANALYTICS_SUMMARY,
            Artifact::UserPreference => USER_PREFERENCE,
        }
    }

    /// Resolve the artifact's location.
    ///
    /// The user preference file lives in the knowledge subdirectory;
    /// generated artifacts live in the output directory.
    pub fn path(&self, config: &AppConfig) -> PathBuf {
        match self {
            Artifact::UserPreference => config.knowledge_dir.join(self.name()),
            _ => config.output_dir.join(self.name()),
        }
    }

    /// Whether the artifact is served as parsed JSON.
    pub fn is_json(&self) -> bool {
        self.name().ends_with(".json")
    }

    /// Content type for byte responses.
    pub fn content_type(&self) -> &'static str {
        match self {
            Artifact::SocialPosts => "application/json",
            Artifact::AnalyticsSummary => "text/markdown; charset=utf-8",
            Artifact::UserPreference => "text/plain; charset=utf-8",
        }
    }

    /// Check existence on disk at call time.
    pub fn exists(&self, config: &AppConfig) -> bool {
        self.path(config).exists()
    }
}
