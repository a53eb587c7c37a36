/// A single source line and its indentation level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The original text, trailing whitespace included.
    pub raw: String,
    /// Indentation level. Raw whitespace count until normalized.
    pub depth: usize,
}

impl Line {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let depth = leading_whitespace(&raw);
        Line { raw, depth }
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The text with its indentation removed.
    pub fn content(&self) -> &str {
        self.raw.trim_start()
    }
}

/// Count the whitespace characters before the first non-whitespace one.
pub fn leading_whitespace(raw: &str) -> usize {
    raw.chars().take_while(|c| c.is_whitespace()).count()
}

/// Rescale depths so one level is one unit.
///
/// All depths are halved together until at least one of them is odd, which
/// turns 4-space (or 8-space) indentation into single steps without knowing
/// the unit up front. A sequence with no indentation is left alone.
pub fn normalize_depths(depths: &mut [usize]) {
    if depths.iter().all(|&d| d == 0) {
        return;
    }
    while !depths.iter().any(|d| d % 2 == 1) {
        for d in depths.iter_mut() {
            *d /= 2;
        }
    }
}

/// Give every empty line the depth of the line after it.
///
/// Walks backwards so runs of empty lines all pick up the depth of the
/// first non-empty line below them. The last line is never changed.
pub fn propagate_blank_lines(lines: &mut [Line]) {
    for i in (0..lines.len().saturating_sub(1)).rev() {
        if lines[i].is_empty() {
            lines[i].depth = lines[i + 1].depth;
        }
    }
}

/// Build lines from raw text and resolve their final depths.
pub fn measure<I, S>(raw_lines: I) -> Vec<Line>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut lines: Vec<Line> = raw_lines.into_iter().map(Line::new).collect();

    let mut depths: Vec<usize> = lines.iter().map(|l| l.depth).collect();
    normalize_depths(&mut depths);
    for (line, depth) in lines.iter_mut().zip(depths) {
        line.depth = depth;
    }

    propagate_blank_lines(&mut lines);
    lines
}
