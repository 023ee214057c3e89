//! Timewarrior MCP Core
//!
//! This crate contains the pure command-construction layer with no dependencies on:
//! - Process spawning
//! - The MCP transport
//! - Runtime specifics
//!
//! Everything that turns caller-supplied input into a `timew` command line,
//! and a finished process back into a tool response, lives here.

pub mod command;
pub mod error;
pub mod outcome;
pub mod request;
pub mod response;
pub mod sanitize;

// Re-export commonly used types
pub use command::{build_command, quote, CommandLine, Flag, Subcommand};
pub use error::CoreError;
pub use outcome::ExecutionOutcome;
pub use request::{
    Invocation, ListTagsRequest, Operation, StartRequest, StopRequest, SummaryRequest,
};
pub use response::{ContentItem, FailurePolicy, ToolFailure, ToolResponse};
pub use sanitize::{sanitize_range_expression, sanitize_tag, SanitizedToken};
