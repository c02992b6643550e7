//! Append-only run log.
//!
//! Every run attempt appends exactly one line to `run.log` in the output
//! directory, successful or not. Lines are appended with a single write
//! and no locking, relying on the OS append guarantee for short writes.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

/// Filename of the run log, resolved against the output directory.
pub const RUN_LOG_FILE: &str = "run.log";

/// Writer for the append-only run log.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a run log writing into `output_dir`.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            path: output_dir.join(RUN_LOG_FILE),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a completed run.
    pub fn completed(&self, topic: &str, year: &str) -> io::Result<()> {
        self.append(&format!(
            "status=completed topic={} year={}",
            single_line(topic),
            year
        ))
    }

    /// Record a failed run.
    pub fn failed(&self, topic: &str, year: &str, error: &str) -> io::Result<()> {
        self.append(&format!(
            "status=failed topic={} year={} error={}",
            single_line(topic),
            year,
            single_line(error)
        ))
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "[{}] {}", timestamp, line)
    }
}

/// Every record must stay one physical line; embedded line breaks in
/// caller-supplied text become spaces.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_appends_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path());

        log.completed("AI LLMs", "2026").unwrap();

        let content = std::fs::read_to_string(dir.path().join(RUN_LOG_FILE)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("status=completed topic=AI LLMs year=2026"));
    }

    #[test]
    fn failed_records_the_error_message() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path());

        log.failed("rust", "2026", "provider unreachable").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("status=failed topic=rust year=2026 error=provider unreachable"));
    }

    #[test]
    fn lines_accumulate_across_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path());

        log.completed("a", "2026").unwrap();
        log.failed("b", "2026", "boom").unwrap();
        log.completed("c", "2026").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn embedded_newlines_never_split_a_record() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path());

        log.failed("multi\nline topic", "2026", "boom\r\nbang").unwrap();
        log.completed("another\rone", "2026").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("topic=multi line topic"));
        assert!(content.contains("error=boom"));
        assert!(content.contains("topic=another one"));
    }

    #[test]
    fn timestamp_has_the_expected_shape() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::new(dir.path());
        log.completed("t", "2026").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let line = content.lines().next().unwrap();
        // "[YYYY-MM-DD HH:MM:SS] ..."
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[5..6], "-");
        assert_eq!(&line[8..9], "-");
        assert_eq!(&line[11..12], " ");
        assert_eq!(&line[20..21], "]");
    }
}
