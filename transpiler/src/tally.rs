use std::fmt;

/// Substrings worth a second look when porting a Pygame Zero script.
pub const DEFAULT_TALLY_PATTERNS: &[&str] = &[
    "Actor", "images", "sounds", "keyboard", "font", ".image", ".x", ".y",
];

/// How many source lines contain each pattern, in pattern order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub counts: Vec<(String, usize)>,
}

impl Tally {
    pub fn count(&self, pattern: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, n)| *n)
    }
}

/// Count the lines containing each pattern. A line counts once per pattern.
pub fn tally<S: AsRef<str>>(lines: &[S], patterns: &[String]) -> Tally {
    let counts = patterns
        .iter()
        .map(|pattern| {
            let n = lines
                .iter()
                .filter(|line| line.as_ref().contains(pattern.as_str()))
                .count();
            (pattern.clone(), n)
        })
        .collect();
    Tally { counts }
}

/// Rendered as the summary comment that heads the generated script.
impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/*")?;
        writeln!(f, " * Summary")?;
        writeln!(f, " * ---")?;
        for (pattern, n) in &self.counts {
            writeln!(f, " * {}: {}", pattern, n)?;
        }
        writeln!(f, " */")
    }
}
