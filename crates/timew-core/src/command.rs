//! Typed construction of `timew` command lines.
//!
//! A [`CommandLine`] is the only thing the executor ever receives. It is made
//! of a fixed subcommand, unquoted flags from a closed set, and positional
//! arguments that must be [`SanitizedToken`]s. Every positional argument goes
//! through [`quote`], so there is exactly one quoting rule in the system.

use std::fmt;

use crate::sanitize::SanitizedToken;

/// `timew` subcommands this server issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subcommand {
    Start,
    Stop,
    Summary,
    Tags,
}

impl Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subcommand::Start => "start",
            Subcommand::Stop => "stop",
            Subcommand::Summary => "summary",
            Subcommand::Tags => "tags",
        }
    }
}

/// Report hints passed to `timew` unquoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    /// `:ids`, adds the interval ID column to reports.
    Ids,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Ids => ":ids",
        }
    }
}

/// Wrap a token in single quotes for a POSIX shell.
///
/// Embedded single quotes become `'\''` (close, escaped quote, reopen).
pub fn quote(token: &str) -> String {
    let mut quoted = String::with_capacity(token.len() + 2);
    quoted.push('\'');
    for c in token.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// An ordered, shell-ready argument list for one `timew` invocation.
///
/// The executable itself is not part of the line; the executor prepends it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Start a command line for the given subcommand.
    pub fn new(subcommand: Subcommand) -> Self {
        Self {
            tokens: vec![subcommand.as_str().to_string()],
        }
    }

    /// Append an unquoted flag.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.tokens.push(flag.as_str().to_string());
        self
    }

    /// Append a quoted positional argument.
    pub fn arg(mut self, token: &SanitizedToken) -> Self {
        self.tokens.push(quote(token.as_str()));
        self
    }

    /// Append quoted positional arguments in order.
    pub fn args<'a>(self, tokens: impl IntoIterator<Item = &'a SanitizedToken>) -> Self {
        tokens.into_iter().fold(self, |line, token| line.arg(token))
    }

    /// Render as a single string joined by spaces.
    pub fn render(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Compose a command line: subcommand, then flags, then positional tokens.
pub fn build_command(
    subcommand: Subcommand,
    flags: &[Flag],
    positional: &[SanitizedToken],
) -> CommandLine {
    flags
        .iter()
        .fold(CommandLine::new(subcommand), |line, flag| line.flag(*flag))
        .args(positional)
}
