//! Agent definitions for the social crew.
//!
//! An agent pairs a persona (role, goal, backstory) with a language model.
//! Role, goal, and backstory support `{key}` interpolation from run inputs,
//! matching the configuration style of the upstream agent framework.

use std::collections::HashMap;
use std::sync::Arc;

use md5::{Digest, Md5};
use uuid::Uuid;

use crate::llm::{BaseLlm, LlmError, LlmMessage};
use crate::task::interpolate_string;

/// Represents an agent in the crew.
pub struct Agent {
    /// Unique identifier for the agent instance.
    pub id: Uuid,
    /// Role of the agent.
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Backstory of the agent.
    pub backstory: String,
    /// Verbose mode for agent execution.
    pub verbose: bool,
    llm: Arc<dyn BaseLlm>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("llm", &self.llm.model())
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create a new agent with required fields.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn BaseLlm>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            llm,
        }
    }

    /// Compute the key property (MD5 hash of role|goal|backstory).
    pub fn key(&self) -> String {
        let source = format!("{}|{}|{}", self.role, self.goal, self.backstory);
        let mut hasher = Md5::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Interpolate `{key}` placeholders into role, goal, and backstory.
    pub fn interpolate_inputs(&mut self, inputs: &HashMap<String, String>) {
        if inputs.is_empty() {
            return;
        }
        self.role = interpolate_string(&self.role, inputs);
        self.goal = interpolate_string(&self.goal, inputs);
        self.backstory = interpolate_string(&self.backstory, inputs);
    }

    /// Execute a task prompt with the agent.
    ///
    /// Builds a system prompt from the agent persona and sends it together
    /// with the task prompt (plus optional context from earlier tasks) to
    /// the language model.
    pub fn execute_task(
        &self,
        task_prompt: &str,
        context: Option<&str>,
    ) -> Result<String, LlmError> {
        log::debug!("Agent '{}' executing task", self.role);

        let system_prompt = format!(
            "You are {}.\n{}\n\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        );

        let user_prompt = match context {
            Some(ctx) => format!(
                "{}\n\nThis is the context you're working with:\n{}",
                task_prompt, ctx
            ),
            None => task_prompt.to_string(),
        };

        if self.verbose {
            log::info!("# Agent: {}\n## Task: {}", self.role, task_prompt);
        }

        let messages = vec![
            LlmMessage::system(system_prompt),
            LlmMessage::user(user_prompt),
        ];
        let answer = self.llm.call(&messages)?;

        if self.verbose {
            log::info!("# Agent: {}\n## Final Answer:\n{}", self.role, answer);
        }

        Ok(answer)
    }
}

impl std::fmt::Display for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent(role={}, goal={})", self.role, self.goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// LLM double that records calls and replies with a fixed answer.
    struct RecordingLlm {
        answer: String,
        calls: Mutex<Vec<Vec<LlmMessage>>>,
    }

    impl RecordingLlm {
        fn new(answer: &str) -> Self {
            Self {
                answer: answer.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl BaseLlm for RecordingLlm {
        fn model(&self) -> &str {
            "test-model"
        }

        fn call(&self, messages: &[LlmMessage]) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            Ok(self.answer.clone())
        }
    }

    fn agent(llm: Arc<dyn BaseLlm>) -> Agent {
        Agent::new(
            "Content Creator",
            "Write posts about {topic}",
            "You write social media posts.",
            llm,
        )
    }

    #[test]
    fn interpolation_fills_goal_placeholders() {
        let llm = Arc::new(RecordingLlm::new("ok"));
        let mut agent = agent(llm);
        let inputs = HashMap::from([("topic".to_string(), "rust".to_string())]);
        agent.interpolate_inputs(&inputs);
        assert_eq!(agent.goal, "Write posts about rust");
    }

    #[test]
    fn execute_task_sends_persona_and_context() {
        let llm = Arc::new(RecordingLlm::new("the answer"));
        let agent = agent(llm.clone());

        let answer = agent
            .execute_task("Write 5 posts", Some("previous output"))
            .unwrap();
        assert_eq!(answer, "the answer");

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let messages = &calls[0];
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("You are Content Creator"));
        assert!(messages[0].content.contains("You write social media posts."));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.starts_with("Write 5 posts"));
        assert!(messages[1].content.contains("previous output"));
    }

    #[test]
    fn execute_task_without_context_sends_prompt_verbatim() {
        let llm = Arc::new(RecordingLlm::new("ok"));
        let agent = agent(llm.clone());
        agent.execute_task("Just the task", None).unwrap();

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls[0][1].content, "Just the task");
    }

    #[test]
    fn key_depends_on_persona() {
        let llm: Arc<dyn BaseLlm> = Arc::new(RecordingLlm::new("ok"));
        let a = agent(llm.clone());
        let b = agent(llm.clone());
        assert_eq!(a.key(), b.key());

        let other = Agent::new("Analyst", "Analyze", "You analyze.", llm);
        assert_ne!(a.key(), other.key());
    }
}
