//! Core domain errors.

use thiserror::Error;

/// Errors raised while turning a request into a command line.
///
/// These never reach the external process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The request carried no tags at all.
    #[error("At least one tag is required.")]
    EmptyTags,

    /// Tags were supplied but none survived sanitization.
    #[error(
        "No valid tags provided after sanitization. Please provide tags with letters, numbers, spaces, hyphens, or underscores."
    )]
    NoValidTags,
}
