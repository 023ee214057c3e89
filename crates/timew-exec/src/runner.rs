//! Command runners.

use std::process::{Command, Stdio};

use async_trait::async_trait;
use timew_core::{CommandLine, ExecutionOutcome};
use tracing::{debug, info};

use crate::error::ExecError;

/// Executable used when none is configured.
pub const DEFAULT_TIMEW_BIN: &str = "timew";

/// Shell used to interpret command lines.
pub const DEFAULT_SHELL: &str = "sh";

/// Runs a planned command line to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and wait for it to exit.
    ///
    /// Returns `Err` only when the process could not be run at all.
    async fn run(&self, command: &CommandLine) -> Result<ExecutionOutcome, ExecError>;
}

/// Runs `<program> <command line>` through `<shell> -c`.
///
/// Each call spawns one child and blocks a worker thread until it exits.
/// There is no timeout and no retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRunner {
    /// Path or name of the `timew` executable.
    program: String,

    /// POSIX shell that interprets the line.
    shell: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEW_BIN)
    }
}

impl ShellRunner {
    /// Create a runner for the given executable.
    ///
    /// The program can be just "timew" to use PATH lookup, or a full path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            shell: DEFAULT_SHELL.to_string(),
        }
    }

    /// Set the shell used to interpret the command line.
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// The full line handed to the shell.
    pub fn script(&self, command: &CommandLine) -> String {
        format!("{} {}", shell_words::quote(&self.program), command)
    }

    fn run_blocking(shell: &str, script: &str) -> Result<ExecutionOutcome, ExecError> {
        let output = Command::new(shell)
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ExecError::Spawn {
                program: shell.to_string(),
                source,
            })?;

        Ok(ExecutionOutcome {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_status: output.status.code(),
        })
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &CommandLine) -> Result<ExecutionOutcome, ExecError> {
        let shell = self.shell.clone();
        let script = self.script(command);
        info!(command = %script, "Running timew command");

        let outcome = tokio::task::spawn_blocking(move || Self::run_blocking(&shell, &script))
            .await
            .map_err(|e| ExecError::Join(e.to_string()))??;

        debug!(
            exit_status = ?outcome.exit_status,
            stdout_len = outcome.stdout.len(),
            stderr_len = outcome.stderr.len(),
            "timew command finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timew_core::{ListTagsRequest, StartRequest, StopRequest};

    #[test]
    fn test_runner_builder() {
        let runner = ShellRunner::new("/opt/timew/bin/timew").with_shell("/bin/dash");
        assert_eq!(runner.program(), "/opt/timew/bin/timew");
        assert_eq!(runner.shell(), "/bin/dash");
    }

    #[test]
    fn test_default_runner() {
        let runner = ShellRunner::default();
        assert_eq!(runner.program(), "timew");
        assert_eq!(runner.shell(), "sh");
    }

    #[test]
    fn test_script_prefixes_program() {
        let runner = ShellRunner::default();
        let invocation = StartRequest::new(["work"]).plan().unwrap();
        assert_eq!(runner.script(invocation.command()), "timew start 'work'");

        let spaced = ShellRunner::new("/opt/my tools/timew");
        assert_eq!(
            spaced.script(StopRequest::default().plan().command()),
            "'/opt/my tools/timew' stop"
        );
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let runner = ShellRunner::new("echo");
        let invocation = StartRequest::new(["deep work", "it's", "a;b"]).plan().unwrap();

        let outcome = runner.run(invocation.command()).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.stdout, "start deep work its ab\n");
        assert!(outcome.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_an_outcome() {
        let runner = ShellRunner::new("false");
        let outcome = runner
            .run(ListTagsRequest::default().plan().command())
            .await
            .unwrap();

        assert_eq!(outcome.exit_status, Some(1));
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_missing_program_reports_shell_stderr() {
        let runner = ShellRunner::new("timew-definitely-not-installed");
        let outcome = runner
            .run(StopRequest::default().plan().command())
            .await
            .unwrap();

        assert_eq!(outcome.exit_status, Some(127));
        assert!(outcome.stderr.contains("timew-definitely-not-installed"));
    }

    #[tokio::test]
    async fn test_missing_shell_is_a_spawn_error() {
        let runner = ShellRunner::default().with_shell("/nonexistent/bin/sh");
        let result = runner.run(StopRequest::default().plan().command()).await;

        assert!(matches!(result, Err(ExecError::Spawn { .. })));
    }
}
