//! The SocialCrew pipeline.
//!
//! A concrete two-agent crew: a content creator writes social media posts
//! for a topic, then a social analyst reviews the generated posts and
//! writes an analytics summary. Tasks run sequentially; each task receives
//! the raw output of the previous tasks as context, and tasks with an
//! output file persist their raw result into the crew's output directory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::Agent;
use crate::artifacts;
use crate::llm::{BaseLlm, LlmError};
use crate::task::{Task, TaskOutput};

/// Role of the content creation agent.
pub const CONTENT_CREATOR: &str = "Social Media Content Creator";
/// Role of the analytics agent.
pub const SOCIAL_ANALYST: &str = "Social Media Analytics Expert";

/// Error raised while running the crew.
#[derive(Debug, Error)]
pub enum CrewError {
    /// No LLM credentials were available when the crew was built.
    #[error("no LLM provider configured; set GROQ_API_KEY or OPENAI_API_KEY")]
    MissingLlm,
    /// A provider call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// Writing a task's output file failed.
    #[error("failed to write task output '{file}': {source}")]
    OutputFile {
        file: String,
        #[source]
        source: std::io::Error,
    },
    /// A task referenced an agent the crew does not know.
    #[error("agent '{0}' is not registered with the crew")]
    UnknownAgent(String),
    /// The crew finished without producing any task output.
    #[error("no task outputs available to create crew output")]
    NoOutput,
}

/// The result of a crew execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Raw output of the final task.
    pub raw: String,
    /// Output of each task, in execution order.
    pub tasks_output: Vec<TaskOutput>,
}

/// The synchronous collaborator the HTTP layer delegates runs to.
///
/// Invoked once per request; failures are surfaced verbatim to the caller
/// and never retried.
pub trait CrewRunner: Send + Sync {
    /// Run the crew workflow with the given inputs.
    fn kickoff(&self, inputs: &HashMap<String, String>) -> Result<CrewOutput, CrewError>;
}

/// The SocialCrew AI crew: content generation followed by analytics.
///
/// Agents and tasks are built fresh for every kickoff, so a crew value can
/// be shared across requests without carrying interpolated state over.
pub struct SocialCrew {
    output_dir: PathBuf,
    llm: Option<Arc<dyn BaseLlm>>,
    verbose: bool,
}

impl SocialCrew {
    /// Create the crew, writing artifacts into `output_dir`.
    ///
    /// `llm` is typically [`crate::llm::from_env`]; a crew without an LLM
    /// fails each kickoff rather than refusing to start.
    pub fn new(output_dir: impl Into<PathBuf>, llm: Option<Arc<dyn BaseLlm>>) -> Self {
        Self {
            output_dir: output_dir.into(),
            llm,
            verbose: true,
        }
    }

    /// Disable per-task logging.
    pub fn quiet(mut self) -> Self {
        self.verbose = false;
        self
    }

    fn content_creator(&self, llm: Arc<dyn BaseLlm>) -> Agent {
        let mut agent = Agent::new(
            CONTENT_CREATOR,
            "Create engaging, platform-ready social media posts about {topic} \
             that are accurate and relevant for {current_year}",
            "You are a social media content specialist with years of experience \
             writing posts that drive engagement. You know how to adapt tone and \
             format for different platforms and audiences.",
            llm,
        );
        agent.verbose = self.verbose;
        agent
    }

    fn social_analyst(&self, llm: Arc<dyn BaseLlm>) -> Agent {
        let mut agent = Agent::new(
            SOCIAL_ANALYST,
            "Analyze social media content about {topic} and report on expected \
             reach, engagement, and concrete improvement opportunities",
            "You are a social media analytics expert. You evaluate content \
             against current platform trends and back every recommendation \
             with a clear rationale.",
            llm,
        );
        agent.verbose = self.verbose;
        agent
    }

    fn generate_content_task(&self) -> Task {
        Task::new(
            "generate_content_task",
            "Create a set of 5 social media posts about {topic}, suitable for \
             publication in {current_year}. Cover different angles of the topic \
             and vary the tone across posts.",
            "A JSON array of post objects, each with \"platform\", \"content\", \
             and \"hashtags\" fields. Output only the JSON document.",
            CONTENT_CREATOR,
        )
        .with_output_file(artifacts::SOCIAL_POSTS)
    }

    fn analytics_task(&self) -> Task {
        Task::new(
            "analytics_task",
            "Review the social media posts generated for {topic} and produce an \
             analytics summary: likely audience, expected engagement per post, \
             and suggestions to improve reach in {current_year}.",
            "A markdown report with a section per post and a closing list of \
             overall recommendations.",
            SOCIAL_ANALYST,
        )
        .with_output_file(artifacts::ANALYTICS_SUMMARY)
        .with_markdown()
    }

    /// Execute tasks sequentially, feeding earlier outputs forward as context.
    fn execute_tasks(
        &self,
        agents: &HashMap<String, Agent>,
        mut tasks: Vec<Task>,
    ) -> Result<CrewOutput, CrewError> {
        let mut task_outputs: Vec<TaskOutput> = Vec::new();

        for task in &mut tasks {
            let context = if task_outputs.is_empty() {
                None
            } else {
                Some(
                    task_outputs
                        .iter()
                        .map(|o| o.raw.clone())
                        .collect::<Vec<String>>()
                        .join("\n\n---\n\n"),
                )
            };

            let agent = agents
                .get(&task.agent)
                .ok_or_else(|| CrewError::UnknownAgent(task.agent.clone()))?;

            task.start_time = Some(Utc::now());
            let raw = agent.execute_task(&task.prompt(), context.as_deref())?;
            task.end_time = Some(Utc::now());

            task.save_file(&self.output_dir, &raw)
                .map_err(|source| CrewError::OutputFile {
                    file: task.output_file.clone().unwrap_or_default(),
                    source,
                })?;

            log::debug!(
                "task '{}' finished in {:?}s",
                task.name,
                task.execution_duration()
            );

            task_outputs.push(TaskOutput {
                name: task.name.clone(),
                description: task.description.clone(),
                expected_output: task.expected_output.clone(),
                json: crate::converter::parse_json(&raw),
                raw,
                agent: task.agent.clone(),
            });
        }

        let final_output = task_outputs.last().ok_or(CrewError::NoOutput)?;
        Ok(CrewOutput {
            raw: final_output.raw.clone(),
            tasks_output: task_outputs,
        })
    }
}

impl CrewRunner for SocialCrew {
    fn kickoff(&self, inputs: &HashMap<String, String>) -> Result<CrewOutput, CrewError> {
        let llm = self.llm.clone().ok_or(CrewError::MissingLlm)?;

        log::info!("SocialCrew kickoff with inputs: {:?}", inputs);

        let mut content_creator = self.content_creator(llm.clone());
        let mut social_analyst = self.social_analyst(llm);
        content_creator.interpolate_inputs(inputs);
        social_analyst.interpolate_inputs(inputs);

        // Keyed by the declared role so tasks resolve regardless of any
        // placeholders interpolated into the persona.
        let mut agents = HashMap::new();
        agents.insert(CONTENT_CREATOR.to_string(), content_creator);
        agents.insert(SOCIAL_ANALYST.to_string(), social_analyst);

        let mut tasks = vec![self.generate_content_task(), self.analytics_task()];
        for task in &mut tasks {
            task.interpolate_inputs(inputs);
        }

        self.execute_tasks(&agents, tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmMessage;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// LLM double that replays scripted answers and records every call.
    struct ScriptedLlm {
        answers: Mutex<VecDeque<String>>,
        calls: Mutex<Vec<Vec<LlmMessage>>>,
    }

    impl ScriptedLlm {
        fn new(answers: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl BaseLlm for ScriptedLlm {
        fn model(&self) -> &str {
            "scripted"
        }

        fn call(&self, messages: &[LlmMessage]) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Response("script exhausted".to_string()))
        }
    }

    fn inputs(topic: &str) -> HashMap<String, String> {
        HashMap::from([
            ("topic".to_string(), topic.to_string()),
            ("current_year".to_string(), "2026".to_string()),
        ])
    }

    #[test]
    fn kickoff_writes_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(&["[{\"platform\": \"x\"}]", "# Analytics\n\nLooks good."]);
        let crew = SocialCrew::new(dir.path(), Some(llm)).quiet();

        let output = crew.kickoff(&inputs("rust")).unwrap();

        assert_eq!(output.tasks_output.len(), 2);
        assert_eq!(output.raw, "# Analytics\n\nLooks good.");
        assert!(output.tasks_output[0].json.is_some());
        assert!(output.tasks_output[1].json.is_none());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("social_posts.json")).unwrap(),
            "[{\"platform\": \"x\"}]"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("analytics_summary.md")).unwrap(),
            "# Analytics\n\nLooks good."
        );
    }

    #[test]
    fn second_task_receives_first_output_as_context() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(&["FIRST-OUTPUT", "second"]);
        let crew = SocialCrew::new(dir.path(), Some(llm.clone())).quiet();

        crew.kickoff(&inputs("rust")).unwrap();

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        // First task has no context.
        assert!(!calls[0][1].content.contains("context you're working with"));
        // Second task sees the first task's raw output.
        assert!(calls[1][1].content.contains("FIRST-OUTPUT"));
    }

    #[test]
    fn inputs_are_interpolated_into_prompts() {
        let dir = tempfile::tempdir().unwrap();
        let llm = ScriptedLlm::new(&["a", "b"]);
        let crew = SocialCrew::new(dir.path(), Some(llm.clone())).quiet();

        crew.kickoff(&inputs("electric cars")).unwrap();

        let calls = llm.calls.lock().unwrap();
        assert!(calls[0][1].content.contains("electric cars"));
        assert!(calls[0][1].content.contains("2026"));
        assert!(calls[0][0].content.contains("electric cars"));
    }

    #[test]
    fn llm_failure_propagates_and_skips_remaining_tasks() {
        let dir = tempfile::tempdir().unwrap();
        // Script is exhausted on the first call.
        let llm = ScriptedLlm::new(&[]);
        let crew = SocialCrew::new(dir.path(), Some(llm)).quiet();

        let err = crew.kickoff(&inputs("rust")).unwrap_err();
        assert!(matches!(err, CrewError::Llm(_)));
        assert!(!dir.path().join("social_posts.json").exists());
    }

    #[test]
    fn missing_llm_fails_the_kickoff() {
        let dir = tempfile::tempdir().unwrap();
        let crew = SocialCrew::new(dir.path(), None).quiet();

        let err = crew.kickoff(&inputs("rust")).unwrap_err();
        assert!(matches!(err, CrewError::MissingLlm));
    }
}
