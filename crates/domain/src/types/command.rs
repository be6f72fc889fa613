//! Outcome of a shell command

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Captured result of a finished (or killed) process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Command line as displayed in logs
    pub command: String,
    /// `None` when the process could not be started or was killed
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    pub timed_out: bool,
}

impl CommandResult {
    /// Result for a process that never started
    pub fn spawn_failure(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            exit_code: None,
            stdout: String::new(),
            stderr: message.into(),
            duration: Duration::ZERO,
            timed_out: false,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }

    /// Trimmed standard output
    pub fn output(&self) -> &str {
        self.stdout.trim()
    }

    /// Trimmed standard error
    pub fn error_output(&self) -> &str {
        self.stderr.trim()
    }

    /// Output lines, without trailing blanks
    pub fn output_lines(&self) -> Vec<&str> {
        self.stdout.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit_and_no_timeout() {
        let mut result = CommandResult {
            command: "ls".into(),
            exit_code: Some(0),
            stdout: " a\nb \n\n".into(),
            stderr: String::new(),
            duration: Duration::from_millis(3),
            timed_out: false,
        };
        assert!(result.is_successful());
        assert_eq!(result.output(), "a\nb");
        assert_eq!(result.output_lines(), vec![" a", "b"]);

        result.timed_out = true;
        assert!(!result.is_successful());
    }

    #[test]
    fn spawn_failure_has_no_exit_code() {
        let result = CommandResult::spawn_failure("nope", "No such file or directory\n");
        assert_eq!(result.exit_code, None);
        assert!(!result.is_successful());
        assert_eq!(result.error_output(), "No such file or directory");
    }
}
