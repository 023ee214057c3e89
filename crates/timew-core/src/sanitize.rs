//! Allow-list sanitization of caller-supplied text.
//!
//! Every string that ends up on a `timew` command line passes through one of
//! these filters first. Anything outside the allowed alphabet is dropped, so
//! shell metacharacters (quotes, `;`, `|`, `$`, backticks, newlines) can never
//! survive, regardless of how the token is quoted afterwards.

use std::fmt;

/// Characters allowed in a tag besides ASCII alphanumerics.
const TAG_EXTRA: &[char] = &[' ', '_', '-'];

/// Characters allowed in a range expression besides ASCII alphanumerics.
const RANGE_EXTRA: &[char] = &['.', ':', '-', ' '];

fn retain_allowed(raw: &str, extra: &[char]) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || extra.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Strip every character outside `[A-Za-z0-9 _-]`, then trim.
///
/// An empty result means the input held no usable tag.
pub fn sanitize_tag(raw: &str) -> String {
    retain_allowed(raw, TAG_EXTRA)
}

/// Strip every character outside `[A-Za-z0-9.:- ]`, then trim.
///
/// An empty result means "no range supplied".
pub fn sanitize_range_expression(raw: &str) -> String {
    retain_allowed(raw, RANGE_EXTRA)
}

/// A non-empty string that has been through one of the sanitizers.
///
/// The only way to obtain one is through [`SanitizedToken::tag`] or
/// [`SanitizedToken::range`], which is what lets the command builder accept
/// nothing else as a positional argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedToken(String);

impl SanitizedToken {
    /// Sanitize a raw tag. Returns `None` if nothing usable remains.
    pub fn tag(raw: &str) -> Option<Self> {
        Self::non_empty(sanitize_tag(raw))
    }

    /// Sanitize a raw range expression. Returns `None` if nothing usable remains.
    pub fn range(raw: &str) -> Option<Self> {
        Self::non_empty(sanitize_range_expression(raw))
    }

    /// Sanitize a list of raw tags, dropping the ones that end up empty.
    pub fn tags<S: AsRef<str>>(raw: &[S]) -> Vec<Self> {
        raw.iter().filter_map(|t| Self::tag(t.as_ref())).collect()
    }

    fn non_empty(value: String) -> Option<Self> {
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Get the inner string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SanitizedToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
