//! @ai:module:intent Severity-tagged, positioned messages raised while reading an outline
//! @ai:module:layer domain
//! @ai:module:public_api Diagnostic, Severity
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of the source excerpt shown under a diagnostic.
pub const EXCERPT_WIDTH: usize = 72;

/// @ai:intent Whether a diagnostic lets the run continue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ignorable,
    Critical,
}

/// @ai:intent A single problem found in the outline, pointing at a column of a line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// 1-based line number.
    pub line: usize,
    /// Character offset of the caret marker within `source`.
    pub column: usize,
    pub message: String,
    /// The text the caret points into, usually the offending line.
    pub source: String,
}

impl Diagnostic {
    /// @ai:intent Build an ignorable diagnostic
    pub fn ignorable(line: usize, column: usize, message: impl Into<String>, source: &str) -> Self {
        Self::new(Severity::Ignorable, line, column, message, source)
    }

    /// @ai:intent Build a critical diagnostic
    pub fn critical(line: usize, column: usize, message: impl Into<String>, source: &str) -> Self {
        Self::new(Severity::Critical, line, column, message, source)
    }

    fn new(
        severity: Severity,
        line: usize,
        column: usize,
        message: impl Into<String>,
        source: &str,
    ) -> Self {
        Self {
            severity,
            line,
            column,
            message: message.into(),
            source: source.trim_end_matches(['\r', '\n']).to_string(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }

    /// @ai:intent Source text cut to fit `width` characters, with the caret column adjusted
    /// @ai:post returned column points at the same character as `self.column` when it is visible
    /// @ai:example (source of 100 chars, column 90, width 72) -> ("..." + last 72 chars, 65)
    /// @ai:effects pure
    pub fn excerpt(&self, width: usize) -> (String, usize) {
        let chars: Vec<char> = self.source.chars().collect();
        if chars.len() <= width {
            return (self.source.clone(), self.column.min(chars.len()));
        }

        let start = (chars.len() - width).min(self.column);
        let visible: String = chars[start..].iter().take(width).collect();
        (format!("...{}", visible), self.column - start + 3)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Ignorable => "ignorable",
            Severity::Critical => "critical",
        };
        write!(f, "line {} ({}): {}", self.line, tag, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_source_is_not_truncated() {
        let diag = Diagnostic::ignorable(3, 4, "oops", "abc def\n");
        assert_eq!(diag.source, "abc def");
        assert_eq!(diag.excerpt(EXCERPT_WIDTH), ("abc def".to_string(), 4));
    }

    #[test]
    fn test_long_source_is_truncated_from_front() {
        let source: String = (0..100).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let diag = Diagnostic::critical(1, 90, "oops", &source);

        let (text, column) = diag.excerpt(72);
        assert!(text.starts_with("..."));
        assert_eq!(text.chars().count(), 75);
        assert_eq!(column, 65);
        assert_eq!(text.chars().nth(column), source.chars().nth(90));
    }

    #[test]
    fn test_caret_near_front_keeps_marker_visible() {
        let source = "x".repeat(100);
        let diag = Diagnostic::ignorable(1, 5, "oops", &source);

        let (text, column) = diag.excerpt(72);
        assert_eq!(column, 3);
        assert_eq!(text.chars().count(), 75);
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::critical(7, 0, "Arrow (->) is expected in CONTRACT", "");
        assert_eq!(
            diag.to_string(),
            "line 7 (critical): Arrow (->) is expected in CONTRACT"
        );
    }
}
