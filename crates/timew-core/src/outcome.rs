//! What a finished `timew` process left behind.

/// Captured output of one process run.
///
/// A non-zero exit is not an error at this level; the result mapper decides
/// what it means for each operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub stdout: String,
    pub stderr: String,

    /// Exit code, or `None` if the process was terminated by a signal.
    pub exit_status: Option<i32>,
}

impl ExecutionOutcome {
    /// Outcome of a process that exited with status 0.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_status: Some(0),
        }
    }

    /// Outcome of a process that exited with the given status.
    pub fn failure(exit_status: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_status: Some(exit_status),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_status == Some(0)
    }
}
