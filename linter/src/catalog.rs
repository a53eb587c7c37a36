/// Source-language leftovers that should not survive in a port.
///
/// `.x` and `.y` are only wrong on actor objects but are flagged everywhere.
/// The comparison forms catch non-strict equality.
pub const DEFAULT_TRICKY_CASES: &[&str] = &["self.", ".image", ".x", ".y", " == ", " != "];

/// Accepted last tokens of a non-empty script line.
pub const DEFAULT_LINE_ENDINGS: &[&str] = &["*/", "{", "}", "[", "]", ";", ",", "||", "&&"];

/// Context in which a matching pattern is tolerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    /// Every occurrence is directly followed by `null` (`x == null`).
    FollowedByNull,
}

impl Exemption {
    fn applies(self, text: &str, pattern: &str) -> bool {
        match self {
            Exemption::FollowedByNull => text
                .match_indices(pattern)
                .all(|(i, _)| text[i + pattern.len()..].starts_with("null")),
        }
    }
}

/// A pattern the scanner reports, with its optional exemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickyCase {
    pub pattern: String,
    pub exemption: Option<Exemption>,
}

impl TrickyCase {
    /// Comparison operator patterns are exempt when compared against `null`.
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let exemption = if pattern.contains('=') {
            Some(Exemption::FollowedByNull)
        } else {
            None
        };
        TrickyCase { pattern, exemption }
    }

    /// Whether `text` should be reported for this pattern.
    pub fn matches(&self, text: &str) -> bool {
        if !text.contains(self.pattern.as_str()) {
            return false;
        }
        match self.exemption {
            Some(exemption) => !exemption.applies(text, &self.pattern),
            None => true,
        }
    }
}

impl From<&str> for TrickyCase {
    fn from(pattern: &str) -> Self {
        TrickyCase::new(pattern)
    }
}

impl From<String> for TrickyCase {
    fn from(pattern: String) -> Self {
        TrickyCase::new(pattern)
    }
}

pub fn default_catalog() -> Vec<TrickyCase> {
    DEFAULT_TRICKY_CASES.iter().copied().map(TrickyCase::new).collect()
}

pub fn default_line_endings() -> Vec<String> {
    DEFAULT_LINE_ENDINGS.iter().map(|s| s.to_string()).collect()
}
