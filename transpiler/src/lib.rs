pub mod emit;
pub mod indent;
pub mod page;
pub mod resources;
pub mod tally;

pub use emit::{Emitted, Rendered, Rendering, emit_blocks, render};
pub use indent::{Line, measure};
pub use resources::Resources;
pub use tally::{DEFAULT_TALLY_PATTERNS, Tally, tally};

/// The default tally patterns as owned strings.
pub fn default_tally_patterns() -> Vec<String> {
    DEFAULT_TALLY_PATTERNS.iter().map(|s| s.to_string()).collect()
}

/// Translate source lines into brace-delimited script text.
///
/// The output starts with a summary comment counting the lines that contain
/// each of `patterns`, followed by the restructured code.
pub fn transpile<S: AsRef<str>>(lines: &[S], rendering: &Rendering, patterns: &[String]) -> String {
    let summary = tally(lines, patterns);
    let measured = measure(lines.iter().map(|l| l.as_ref()));
    let emitted = emit_blocks(&measured, rendering);

    let mut out = summary.to_string();
    out.push_str(&render(&emitted, rendering));
    out
}

/// Split source text into lines with trailing whitespace removed.
pub fn source_lines(source: &str) -> Vec<String> {
    source.lines().map(|l| l.trim_end().to_string()).collect()
}
