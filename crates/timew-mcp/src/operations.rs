//! The four Timewarrior operations.
//!
//! Each operation plans an invocation, runs it once through the configured
//! [`CommandRunner`] and maps the outcome. Start and summary raise on failure;
//! stop and list-tags answer with the failure text instead.

use std::sync::Arc;

use thiserror::Error;
use timew_core::{
    CoreError, Invocation, ListTagsRequest, StartRequest, StopRequest, SummaryRequest,
    ToolFailure, ToolResponse,
};
use timew_exec::CommandRunner;
use tracing::{debug, error, info, warn};

/// Errors raised by an operation.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The request violates the tool's input schema.
    #[error("{0}")]
    InvalidRequest(CoreError),

    /// The operation ran (or was refused locally) and failed.
    #[error(transparent)]
    Failed(#[from] ToolFailure),
}

/// Timewarrior operations bound to one command runner.
#[derive(Clone)]
pub struct Timewarrior {
    runner: Arc<dyn CommandRunner>,
}

impl Timewarrior {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Start a new interval with the given tags.
    pub async fn start_timer(&self, request: &StartRequest) -> Result<ToolResponse, OperationError> {
        let invocation = request.plan().map_err(|e| match e {
            CoreError::EmptyTags => OperationError::InvalidRequest(e),
            CoreError::NoValidTags => {
                warn!(tag_count = request.tags.len(), "No tags left after sanitization");
                OperationError::Failed(ToolFailure::new(e.to_string()))
            }
        })?;

        info!(tag_count = invocation.tags().len(), "Starting timer");
        Ok(self.execute(&invocation).await?)
    }

    /// Stop all tracking, or only the given tags.
    pub async fn stop_timer(&self, request: &StopRequest) -> Result<ToolResponse, ToolFailure> {
        if request.falls_back_to_stop_all() {
            warn!("Provided tags were invalid after sanitization, stopping all timers");
        }
        let invocation = request.plan();

        info!(tag_count = invocation.tags().len(), "Stopping timer");
        self.execute(&invocation).await
    }

    /// Aggregate report, optionally filtered by range and tags.
    pub async fn get_summary(&self, request: &SummaryRequest) -> Result<ToolResponse, ToolFailure> {
        let invocation = request.plan();

        info!(show_ids = request.show_ids, "Getting summary");
        self.execute(&invocation).await
    }

    /// Tags used, optionally within a range.
    pub async fn list_tags(&self, request: &ListTagsRequest) -> Result<ToolResponse, ToolFailure> {
        let invocation = request.plan();

        info!("Listing tags");
        self.execute(&invocation).await
    }

    async fn execute(&self, invocation: &Invocation) -> Result<ToolResponse, ToolFailure> {
        let command = invocation.command();
        let result = self.runner.run(command).await;

        match &result {
            Ok(outcome) if outcome.is_success() => {
                debug!(
                    command = %command,
                    stdout = %outcome.stdout.trim(),
                    "timew succeeded"
                );
            }
            Ok(outcome) => {
                error!(
                    command = %command,
                    exit_status = ?outcome.exit_status,
                    stderr = %outcome.stderr.trim(),
                    "timew exited with failure"
                );
            }
            Err(e) => {
                error!(command = %command, error = %e, "Failed to run timew");
            }
        }

        invocation.respond(result)
    }
}
