//! Tool requests and their translation into `timew` invocations.
//!
//! Each request type plans an [`Invocation`]: the command line to run plus
//! enough context to map the process outcome back into a response.

use std::fmt;

use crate::command::{build_command, CommandLine, Flag, Subcommand};
use crate::error::CoreError;
use crate::outcome::ExecutionOutcome;
use crate::response::{FailurePolicy, ToolFailure, ToolResponse};
use crate::sanitize::SanitizedToken;

/// The four tool operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Stop,
    Summary,
    ListTags,
}

impl Operation {
    /// Verb phrase used in failure messages ("Failed to <action>: ...").
    pub fn action(&self) -> &'static str {
        match self {
            Operation::Start => "start timer",
            Operation::Stop => "stop timer",
            Operation::Summary => "get summary",
            Operation::ListTags => "list tags",
        }
    }

    /// Start and summary raise; stop and list-tags answer with the failure text.
    pub fn policy(&self) -> FailurePolicy {
        match self {
            Operation::Start | Operation::Summary => FailurePolicy::Hard,
            Operation::Stop | Operation::ListTags => FailurePolicy::Soft,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action())
    }
}

/// Start tracking with the given tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartRequest {
    pub tags: Vec<String>,
}

impl StartRequest {
    pub fn new<S: Into<String>>(tags: impl IntoIterator<Item = S>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Plan `timew start <tags...>`.
    ///
    /// Fails with [`CoreError::EmptyTags`] when no tags were given and with
    /// [`CoreError::NoValidTags`] when none survived sanitization.
    pub fn plan(&self) -> Result<Invocation, CoreError> {
        if self.tags.is_empty() {
            return Err(CoreError::EmptyTags);
        }
        let tags = SanitizedToken::tags(&self.tags);
        if tags.is_empty() {
            return Err(CoreError::NoValidTags);
        }
        let command = build_command(Subcommand::Start, &[], &tags);
        Ok(Invocation::new(Operation::Start, command, tags))
    }
}

/// Stop tracking, either everything or only the given tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopRequest {
    pub tags: Option<Vec<String>>,
}

impl StopRequest {
    /// Plan `timew stop [tags...]`.
    ///
    /// Tags that all sanitize to empty fall back to stopping everything.
    pub fn plan(&self) -> Invocation {
        let tags = self
            .tags
            .as_deref()
            .map(SanitizedToken::tags)
            .unwrap_or_default();
        let command = build_command(Subcommand::Stop, &[], &tags);
        Invocation::new(Operation::Stop, command, tags)
    }

    /// True when tags were supplied but none were usable.
    pub fn falls_back_to_stop_all(&self) -> bool {
        match &self.tags {
            Some(tags) => !tags.is_empty() && SanitizedToken::tags(tags).is_empty(),
            None => false,
        }
    }
}

/// Aggregate report of tracked time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub range: Option<String>,
    pub tags: Option<Vec<String>>,
    pub show_ids: bool,
}

impl Default for SummaryRequest {
    fn default() -> Self {
        Self {
            range: None,
            tags: None,
            show_ids: true,
        }
    }
}

impl SummaryRequest {
    /// Plan `timew summary [:ids] [range] [tags...]`.
    pub fn plan(&self) -> Invocation {
        let flags: &[Flag] = if self.show_ids { &[Flag::Ids] } else { &[] };
        let tags = self
            .tags
            .as_deref()
            .map(SanitizedToken::tags)
            .unwrap_or_default();
        let positional: Vec<SanitizedToken> = self
            .range
            .as_deref()
            .and_then(SanitizedToken::range)
            .into_iter()
            .chain(tags)
            .collect();
        let command = build_command(Subcommand::Summary, flags, &positional);
        Invocation::new(Operation::Summary, command, Vec::new())
    }
}

/// Tags in use, optionally within a range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListTagsRequest {
    pub range: Option<String>,
}

impl ListTagsRequest {
    /// Plan `timew tags [range]`.
    pub fn plan(&self) -> Invocation {
        let range: Vec<SanitizedToken> = self
            .range
            .as_deref()
            .and_then(SanitizedToken::range)
            .into_iter()
            .collect();
        let command = build_command(Subcommand::Tags, &[], &range);
        Invocation::new(Operation::ListTags, command, Vec::new())
    }
}

/// A planned `timew` run and the rules for reporting its result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    operation: Operation,
    command: CommandLine,
    tags: Vec<SanitizedToken>,
}

impl Invocation {
    fn new(operation: Operation, command: CommandLine, tags: Vec<SanitizedToken>) -> Self {
        Self {
            operation,
            command,
            tags,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    /// Sanitized tags passed to start/stop; empty for the other operations.
    pub fn tags(&self) -> &[SanitizedToken] {
        &self.tags
    }

    /// Map a run result to a response according to the operation's policy.
    ///
    /// `Err` means the process could not be run at all.
    pub fn respond<E: fmt::Display>(
        &self,
        result: Result<ExecutionOutcome, E>,
    ) -> Result<ToolResponse, ToolFailure> {
        let detail = match result {
            Ok(outcome) if outcome.is_success() => {
                return Ok(self.render_success(outcome.stdout.trim()));
            }
            Ok(outcome) => self.exit_detail(&outcome),
            Err(e) => e.to_string().trim().to_string(),
        };
        let detail = if detail.is_empty() {
            self.unknown_error()
        } else {
            detail
        };
        let failure = ToolFailure::new(format!("Failed to {}: {}", self.operation.action(), detail));
        self.operation.policy().apply(failure)
    }

    fn render_success(&self, stdout: &str) -> ToolResponse {
        match self.operation {
            Operation::Start => {
                ToolResponse::text(format!("Timer started with tags: {}", self.joined_tags()))
            }
            Operation::Stop if stdout.is_empty() => {
                ToolResponse::text(format!("Attempted to stop {}.", self.stop_target()))
            }
            Operation::ListTags if stdout.is_empty() => ToolResponse::text("No tags found."),
            Operation::Stop | Operation::Summary | Operation::ListTags => {
                ToolResponse::text(stdout)
            }
        }
    }

    fn exit_detail(&self, outcome: &ExecutionOutcome) -> String {
        let stderr = outcome.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        if outcome.exit_status.is_some() {
            format!("Command failed: {}", self.command)
        } else {
            format!("Command terminated by signal: {}", self.command)
        }
    }

    fn unknown_error(&self) -> String {
        match self.operation {
            Operation::Start => "Unknown error starting timer.".to_string(),
            Operation::Stop => format!("Unknown error stopping {}.", self.stop_target()),
            Operation::Summary => "Unknown error getting summary.".to_string(),
            Operation::ListTags => "Unknown error listing tags.".to_string(),
        }
    }

    fn stop_target(&self) -> String {
        if self.tags.is_empty() {
            "all timers".to_string()
        } else {
            format!("timer(s) with tags: {}", self.joined_tags())
        }
    }

    fn joined_tags(&self) -> String {
        self.tags
            .iter()
            .map(SanitizedToken::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_start_plan_strips_metacharacters() {
        let invocation = StartRequest::new(["a;rm -rf", "ok-tag"]).plan().unwrap();
        assert_eq!(invocation.command().render(), "start 'arm -rf' 'ok-tag'");
        assert_eq!(invocation.operation(), Operation::Start);
        for forbidden in [';', '|', '$', '`', '"', '\n'] {
            assert!(!invocation.command().render().contains(forbidden));
        }
    }

    #[test]
    fn test_start_plan_rejects_empty_and_all_invalid_tags() {
        assert_eq!(StartRequest::default().plan(), Err(CoreError::EmptyTags));
        assert_eq!(
            StartRequest::new(["???", "  "]).plan(),
            Err(CoreError::NoValidTags)
        );
        assert!(CoreError::NoValidTags
            .to_string()
            .starts_with("No valid tags provided after sanitization"));
    }

    #[test]
    fn test_stop_plan() {
        let all = StopRequest::default().plan();
        assert_eq!(all.command().render(), "stop");

        let empty_list = StopRequest { tags: Some(vec![]) };
        assert_eq!(empty_list.plan().command().render(), "stop");
        assert!(!empty_list.falls_back_to_stop_all());

        let tagged = StopRequest {
            tags: Some(strings(&["deep work", "x$"])),
        };
        assert_eq!(tagged.plan().command().render(), "stop 'deep work' 'x'");
        assert!(!tagged.falls_back_to_stop_all());
    }

    #[test]
    fn test_stop_plan_falls_back_when_tags_sanitize_away() {
        let request = StopRequest {
            tags: Some(strings(&["???"])),
        };
        assert!(request.falls_back_to_stop_all());
        let invocation = request.plan();
        assert_eq!(invocation.command().render(), "stop");
        assert!(invocation.tags().is_empty());
    }

    #[test]
    fn test_summary_plan_argument_order() {
        let cases = [
            (SummaryRequest::default(), "summary :ids"),
            (
                SummaryRequest {
                    range: Some("today".into()),
                    show_ids: false,
                    ..Default::default()
                },
                "summary 'today'",
            ),
            (
                SummaryRequest {
                    tags: Some(strings(&["ops", "client"])),
                    ..Default::default()
                },
                "summary :ids 'ops' 'client'",
            ),
            (
                SummaryRequest {
                    range: Some("2025-04-20..2025-04-29".into()),
                    tags: Some(strings(&["ops"])),
                    show_ids: true,
                },
                "summary :ids '2025-04-20..2025-04-29' 'ops'",
            ),
            (
                SummaryRequest {
                    range: Some("$(;)".into()),
                    tags: Some(strings(&["!!", "ops"])),
                    show_ids: false,
                },
                "summary 'ops'",
            ),
        ];
        for (request, expected) in cases {
            assert_eq!(request.plan().command().render(), expected, "{request:?}");
        }
    }

    #[test]
    fn test_list_tags_plan() {
        assert_eq!(ListTagsRequest::default().plan().command().render(), "tags");
        let ranged = ListTagsRequest {
            range: Some("this.week".into()),
        };
        assert_eq!(ranged.plan().command().render(), "tags 'this.week'");
        let stripped = ListTagsRequest {
            range: Some("';'".into()),
        };
        assert_eq!(stripped.plan().command().render(), "tags");
    }

    #[test]
    fn test_start_success_synthesizes_confirmation() {
        let invocation = StartRequest::new(["work", "client-a"]).plan().unwrap();
        let response = invocation
            .respond::<String>(Ok(ExecutionOutcome::success("Tracking work client-a\n")))
            .unwrap();
        assert_eq!(
            response,
            ToolResponse::text("Timer started with tags: work, client-a")
        );
    }

    #[test]
    fn test_success_returns_trimmed_stdout() {
        let invocation = SummaryRequest::default().plan();
        let response = invocation
            .respond::<String>(Ok(ExecutionOutcome::success("\n  Wk Date  Tags  \n\n")))
            .unwrap();
        assert_eq!(response, ToolResponse::text("Wk Date  Tags"));
    }

    #[test]
    fn test_empty_stdout_substitutions() {
        let tags = ListTagsRequest::default()
            .plan()
            .respond::<String>(Ok(ExecutionOutcome::success("  \n")))
            .unwrap();
        assert_eq!(tags, ToolResponse::text("No tags found."));

        let stop_all = StopRequest::default()
            .plan()
            .respond::<String>(Ok(ExecutionOutcome::success("")))
            .unwrap();
        assert_eq!(stop_all, ToolResponse::text("Attempted to stop all timers."));

        let stop_tagged = StopRequest {
            tags: Some(strings(&["a", "b"])),
        }
        .plan()
        .respond::<String>(Ok(ExecutionOutcome::success("")))
        .unwrap();
        assert_eq!(
            stop_tagged,
            ToolResponse::text("Attempted to stop timer(s) with tags: a, b.")
        );
    }

    #[test]
    fn test_hard_fail_operations_raise() {
        let start = StartRequest::new(["work"]).plan().unwrap();
        let err = start
            .respond::<String>(Ok(ExecutionOutcome::failure(255, "Database locked\n")))
            .unwrap_err();
        assert_eq!(err.message(), "Failed to start timer: Database locked");

        let summary = SummaryRequest::default().plan();
        let err = summary
            .respond(Err("No such file or directory (os error 2)"))
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Failed to get summary: No such file or directory (os error 2)"
        );
    }

    #[test]
    fn test_soft_fail_operations_answer_with_failure_text() {
        let stop = StopRequest::default().plan();
        let response = stop
            .respond::<String>(Ok(ExecutionOutcome::failure(255, "There is no active time tracking.")))
            .unwrap();
        assert_eq!(
            response,
            ToolResponse::text("Failed to stop timer: There is no active time tracking.")
        );

        let tags = ListTagsRequest::default().plan();
        let response = tags.respond(Err("spawn failed")).unwrap();
        assert_eq!(response, ToolResponse::text("Failed to list tags: spawn failed"));
    }

    #[test]
    fn test_failure_detail_without_stderr() {
        let summary = SummaryRequest {
            show_ids: false,
            ..Default::default()
        }
        .plan();
        let err = summary
            .respond::<String>(Ok(ExecutionOutcome::failure(2, "   ")))
            .unwrap_err();
        assert_eq!(
            err.message(),
            "Failed to get summary: Command failed: summary"
        );

        let signalled = ExecutionOutcome {
            exit_status: None,
            ..Default::default()
        };
        let response = ListTagsRequest::default()
            .plan()
            .respond::<String>(Ok(signalled))
            .unwrap();
        assert_eq!(
            response,
            ToolResponse::text("Failed to list tags: Command terminated by signal: tags")
        );

        let err = StartRequest::new(["x"]).plan().unwrap().respond(Err("")).unwrap_err();
        assert_eq!(err.message(), "Failed to start timer: Unknown error starting timer.");
    }

    #[test]
    fn test_silent_non_zero_exit_names_the_command() {
        let err = SummaryRequest::default()
            .plan()
            .respond::<String>(Ok(ExecutionOutcome::failure(1, "")))
            .unwrap_err();
        assert_eq!(err.message(), "Failed to get summary: Command failed: summary :ids");
    }

    #[test]
    fn test_stop_unknown_error_names_the_target() {
        let response = StopRequest::default().plan().respond(Err(" ")).unwrap();
        assert_eq!(
            response,
            ToolResponse::text("Failed to stop timer: Unknown error stopping all timers.")
        );

        let response = StopRequest {
            tags: Some(strings(&["work", "client-a"])),
        }
        .plan()
        .respond(Err(""))
        .unwrap();
        assert_eq!(
            response,
            ToolResponse::text(
                "Failed to stop timer: Unknown error stopping timer(s) with tags: work, client-a."
            )
        );
    }
}
