use std::fmt;

use codespan_reporting::diagnostic::{Diagnostic, Severity};

/// One problem found in a JavaScript port.
///
/// The `Display` form is the message shown to the user. Findings carry no
/// source location; the offending line text is included instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintError {
    /// The page `<h1>` differs from its `<title>`.
    HeadingMismatch { title: String, heading: String },
    /// A leftover source-language pattern appears in the script.
    TrickyCase(String),
    /// The line, with trailing whitespace removed, ended in whitespace.
    TrailingWhitespace(String),
    /// The line does not end with an accepted terminator.
    BadEnding(String),
}

impl LintError {
    /// The offending line, for per-line findings.
    pub fn context(&self) -> Option<&str> {
        match self {
            LintError::TrailingWhitespace(line) | LintError::BadEnding(line) => Some(line),
            _ => None,
        }
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, severity: Severity) -> Diagnostic<usize> {
        let message = match self {
            LintError::HeadingMismatch { .. } | LintError::TrickyCase(_) => self.to_string(),
            LintError::TrailingWhitespace(_) => "trailing whitespace in line".to_string(),
            LintError::BadEnding(_) => "line does not end correctly".to_string(),
        };
        let mut notes = Vec::new();
        match self {
            LintError::HeadingMismatch { title, heading } => {
                notes.push(format!("title: {:?}", title));
                notes.push(format!("h1:    {:?}", heading));
            }
            LintError::TrailingWhitespace(line) | LintError::BadEnding(line) => {
                notes.push(line.clone());
            }
            LintError::TrickyCase(_) => {}
        }
        Diagnostic::new(severity)
            .with_message(message)
            .with_notes(notes)
    }
}

impl fmt::Display for LintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintError::HeadingMismatch { .. } => write!(f, "h1 tag does not match title!"),
            LintError::TrickyCase(pattern) => write!(f, "\"{}\" found in JavaScript!", pattern),
            LintError::TrailingWhitespace(line) => write!(f, "Trailing whitespace in line:\n{}", line),
            LintError::BadEnding(line) => write!(f, "Line does not end correctly:\n{}", line),
        }
    }
}

impl std::error::Error for LintError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            LintError::TrickyCase("self.".into()).to_string(),
            "\"self.\" found in JavaScript!"
        );
        assert_eq!(
            LintError::TrailingWhitespace("foo;".into()).to_string(),
            "Trailing whitespace in line:\nfoo;"
        );
        assert_eq!(
            LintError::BadEnding("foo".into()).to_string(),
            "Line does not end correctly:\nfoo"
        );
        assert_eq!(
            LintError::HeadingMismatch {
                title: "a".into(),
                heading: "b".into()
            }
            .to_string(),
            "h1 tag does not match title!"
        );
    }

    #[test]
    fn diagnostic_carries_the_line() {
        let d = LintError::BadEnding("let x = 1".into()).to_diagnostic(Severity::Warning);
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "line does not end correctly");
        assert_eq!(d.notes, vec!["let x = 1".to_string()]);
        assert!(d.labels.is_empty());
    }
}
