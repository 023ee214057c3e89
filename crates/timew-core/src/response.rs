//! Tool responses and failure policies.

use serde::Serialize;
use thiserror::Error;

/// One content block of a tool response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
}

/// Successful result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResponse {
    pub content: Vec<ContentItem>,
}

impl ToolResponse {
    /// A response made of a single text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text { text: text.into() }],
        }
    }
}

/// A failed operation, carrying the message shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ToolFailure {
    message: String,
}

impl ToolFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Fold the failure into a success-shaped response.
    pub fn into_response(self) -> ToolResponse {
        ToolResponse::text(self.message)
    }
}

/// How an execution failure is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The failure is raised; the dispatcher reports it as a tool error.
    Hard,

    /// The failure becomes the text of a normal response.
    Soft,
}

impl FailurePolicy {
    pub fn apply(self, failure: ToolFailure) -> Result<ToolResponse, ToolFailure> {
        match self {
            FailurePolicy::Hard => Err(failure),
            FailurePolicy::Soft => Ok(failure.into_response()),
        }
    }
}
