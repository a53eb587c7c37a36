use crate::error::LintError;

const BLOCK_OPEN: &str = "/*";
const BLOCK_CLOSE: &str = "*/";
const LINE_COMMENT: &str = "//";

/// Whether the scanner is inside a `/* ... */` comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentState {
    #[default]
    Normal,
    InBlockComment,
}

impl CommentState {
    /// State after seeing `line`. Both markers are looked for on the whole
    /// line, so a comment opened and closed on one line leaves it `Normal`.
    pub fn advance(self, line: &str) -> Self {
        let mut state = self;
        if line.contains(BLOCK_OPEN) {
            state = CommentState::InBlockComment;
        }
        if line.contains(BLOCK_CLOSE) {
            state = CommentState::Normal;
        }
        state
    }
}

/// Remove a `//` comment and the whitespace before it.
pub fn strip_line_comment(line: &str) -> &str {
    match line.find(LINE_COMMENT) {
        Some(i) => line[..i].trim_end(),
        None => line,
    }
}

/// Check one line outside block comments.
pub fn check_line<S: AsRef<str>>(line: &str, endings: &[S]) -> Vec<LintError> {
    let line = strip_line_comment(line);
    let cleaned = line.trim_end();
    let mut errors = Vec::new();

    if cleaned.len() != line.len() {
        errors.push(LintError::TrailingWhitespace(cleaned.to_string()));
    }
    if !cleaned.is_empty() && !endings.iter().any(|e| cleaned.ends_with(e.as_ref())) {
        errors.push(LintError::BadEnding(cleaned.to_string()));
    }
    errors
}

/// Characters that end a line, besides `\r\n` taken as a pair.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

/// Split `text` into lines on every kind of line break, lone `\r` included.
///
/// A break at the very end does not start an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(i) = rest.find(LINE_BREAKS) {
        lines.push(&rest[..i]);
        let skip = if rest[i..].starts_with("\r\n") {
            2
        } else {
            rest[i..].chars().next().map_or(1, char::len_utf8)
        };
        rest = &rest[i + skip..];
    }
    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

/// Check trailing whitespace and line endings of every line of `text`.
///
/// Lines inside block comments are skipped whole. Findings are in line
/// order; one line can produce both kinds.
pub fn validate_lines<S: AsRef<str>>(text: &str, endings: &[S]) -> Vec<LintError> {
    split_lines(text)
        .into_iter()
        .fold(
            (CommentState::Normal, Vec::new()),
            |(state, mut errors), line| {
                let state = state.advance(line);
                if state == CommentState::Normal {
                    errors.extend(check_line(line, endings));
                }
                (state, errors)
            },
        )
        .1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_LINE_ENDINGS;

    fn validate(text: &str) -> Vec<LintError> {
        validate_lines(text, DEFAULT_LINE_ENDINGS)
    }

    #[test]
    fn trailing_whitespace_reports_trimmed_line() {
        assert_eq!(
            validate("foo;   "),
            vec![LintError::TrailingWhitespace("foo;".into())]
        );
    }

    #[test]
    fn missing_terminator() {
        assert_eq!(validate("foo"), vec![LintError::BadEnding("foo".into())]);
        assert!(validate("foo;").is_empty());
    }

    #[test]
    fn both_findings_on_one_line() {
        assert_eq!(
            validate("  let x = 1  "),
            vec![
                LintError::TrailingWhitespace("  let x = 1".into()),
                LintError::BadEnding("  let x = 1".into()),
            ]
        );
    }

    #[test]
    fn accepted_endings() {
        for line in ["a {", "}", "[", "]", "a;", "a,", "a ||", "a &&", "/* x */"] {
            assert!(validate(line).is_empty(), "{line:?}");
        }
    }

    #[test]
    fn line_comment_is_stripped_first() {
        assert!(validate("self.x = 1; // self.").is_empty());
        assert!(validate("// whole line").is_empty());
        assert_eq!(
            validate("x = f() // comment"),
            vec![LintError::BadEnding("x = f()".into())]
        );
    }

    #[test]
    fn block_comment_lines_are_skipped() {
        let text = "/*\n * Summary\n * Actor: 1\n */\nlet a = 1;\n";
        assert!(validate(text).is_empty());
    }

    #[test]
    fn line_closing_a_comment_is_checked() {
        let text = "/* start\nignored\nstill ignored */ trailing\n";
        assert_eq!(
            validate(text),
            vec![LintError::BadEnding("still ignored */ trailing".into())]
        );
    }

    #[test]
    fn same_line_comment_does_not_hide_the_line() {
        assert_eq!(
            validate("/* note */ let a = 1"),
            vec![LintError::BadEnding("/* note */ let a = 1".into())]
        );
    }

    #[test]
    fn carriage_returns_end_lines() {
        assert_eq!(split_lines("a;\rb;\r\nc;\n"), vec!["a;", "b;", "c;"]);
        assert_eq!(split_lines("a;\r"), vec!["a;"]);
        assert_eq!(split_lines("\n\n"), vec!["", ""]);
        assert!(split_lines("").is_empty());

        assert!(validate("let a = 1;\rlet b = 2;\r").is_empty());
        assert_eq!(
            validate("foo\rbar;"),
            vec![LintError::BadEnding("foo".into())]
        );
    }

    #[test]
    fn state_machine_transitions() {
        let s = CommentState::default();
        assert_eq!(s.advance("code;"), CommentState::Normal);
        assert_eq!(s.advance("/* open"), CommentState::InBlockComment);
        assert_eq!(s.advance("/* both */"), CommentState::Normal);
        let inside = CommentState::InBlockComment;
        assert_eq!(inside.advance("text"), CommentState::InBlockComment);
        assert_eq!(inside.advance("end */"), CommentState::Normal);
    }
}
