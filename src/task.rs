//! Task definitions for the social crew.
//!
//! A task pairs a description and expected output with the role of the
//! agent responsible for it. Descriptions support `{key}` interpolation
//! from run inputs, and a task may persist its raw result to a file in
//! the crew's output directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a task to be executed by an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// Name for the task.
    pub name: String,
    /// Descriptive text detailing the task's purpose and execution.
    pub description: String,
    /// Clear definition of the expected task outcome.
    pub expected_output: String,
    /// Role of the agent responsible for execution.
    pub agent: String,
    /// Output filename, resolved against the crew's output directory.
    pub output_file: Option<String>,
    /// Whether the agent should return the final answer in Markdown.
    pub markdown: bool,
    /// Start time of the task execution.
    pub start_time: Option<DateTime<Utc>>,
    /// End time of the task execution.
    pub end_time: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task with required fields.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            output_file: None,
            markdown: false,
            start_time: None,
            end_time: None,
        }
    }

    /// Persist the task's raw result to the given filename.
    pub fn with_output_file(mut self, file: impl Into<String>) -> Self {
        self.output_file = Some(file.into());
        self
    }

    /// Instruct the agent to answer in Markdown.
    pub fn with_markdown(mut self) -> Self {
        self.markdown = true;
        self
    }

    /// Generate the task prompt sent to the agent.
    pub fn prompt(&self) -> String {
        let mut slices = vec![self.description.clone()];
        slices.push(format!("Expected Output: {}", self.expected_output));
        if self.markdown {
            slices.push("Your final answer MUST be formatted in Markdown syntax.".to_string());
        }
        slices.join("\n")
    }

    /// Compute the key property (MD5 hash of description|expected_output).
    pub fn key(&self) -> String {
        let source = format!("{}|{}", self.description, self.expected_output);
        let mut hasher = Md5::new();
        hasher.update(source.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Interpolate `{key}` placeholders into description and expected output.
    pub fn interpolate_inputs(&mut self, inputs: &HashMap<String, String>) {
        if inputs.is_empty() {
            return;
        }
        self.description = interpolate_string(&self.description, inputs);
        self.expected_output = interpolate_string(&self.expected_output, inputs);
    }

    /// Save the task result under `output_file` in the given directory.
    ///
    /// Creates intermediate directories as needed. No-op when the task
    /// has no output file.
    pub fn save_file(&self, output_dir: &Path, result: &str) -> io::Result<()> {
        match &self.output_file {
            Some(name) => {
                let path = output_dir.join(name);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, result)
            }
            None => Ok(()),
        }
    }

    /// Execution duration in seconds, if the task ran to completion.
    pub fn execution_duration(&self) -> Option<f64> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task(name={}, agent={}, output_file={:?})",
            self.name, self.agent, self.output_file
        )
    }
}

/// The result of a single task execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Name of the task.
    pub name: String,
    /// Description of the task.
    pub description: String,
    /// Expected output of the task.
    pub expected_output: String,
    /// Raw output of the task.
    pub raw: String,
    /// Best-effort structured form of `raw`, when it parses as JSON.
    pub json: Option<serde_json::Value>,
    /// Agent that executed the task.
    pub agent: String,
}

/// Replace `{key}` placeholders with corresponding input values.
pub(crate) fn interpolate_string(template: &str, inputs: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in inputs {
        let pattern = format!("{{{}}}", key);
        result = result.replace(&pattern, value);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> HashMap<String, String> {
        HashMap::from([
            ("topic".to_string(), "electric cars".to_string()),
            ("current_year".to_string(), "2026".to_string()),
        ])
    }

    #[test]
    fn interpolation_replaces_all_placeholders() {
        let mut task = Task::new(
            "t",
            "Write posts about {topic} for {current_year}. {topic} matters.",
            "Posts about {topic}",
            "Writer",
        );
        task.interpolate_inputs(&inputs());

        assert_eq!(
            task.description,
            "Write posts about electric cars for 2026. electric cars matters."
        );
        assert_eq!(task.expected_output, "Posts about electric cars");
    }

    #[test]
    fn prompt_includes_expected_output_and_markdown_instruction() {
        let plain = Task::new("t", "Do the thing", "A result", "Writer");
        assert_eq!(plain.prompt(), "Do the thing\nExpected Output: A result");

        let md = Task::new("t", "Do the thing", "A result", "Writer").with_markdown();
        assert!(md.prompt().contains("Markdown syntax"));
    }

    #[test]
    fn save_file_writes_into_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let task = Task::new("t", "d", "e", "Writer").with_output_file("nested/out.json");

        task.save_file(dir.path(), "[1]").unwrap();
        let written = std::fs::read_to_string(dir.path().join("nested/out.json")).unwrap();
        assert_eq!(written, "[1]");
    }

    #[test]
    fn save_file_without_output_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let task = Task::new("t", "d", "e", "Writer");
        task.save_file(dir.path(), "ignored").unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn key_is_stable_for_identical_content() {
        let a = Task::new("a", "desc", "out", "Writer");
        let b = Task::new("b", "desc", "out", "Analyst");
        assert_eq!(a.key(), b.key());

        let c = Task::new("c", "other desc", "out", "Writer");
        assert_ne!(a.key(), c.key());
    }
}
