//! Error types for process execution.

use thiserror::Error;

/// Errors that prevent a command from producing an outcome at all.
///
/// A command that runs and exits non-zero is not an error here.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The shell could not be launched.
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The blocking task running the process panicked or was cancelled.
    #[error("Command task did not complete: {0}")]
    Join(String),
}
