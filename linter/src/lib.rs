pub mod catalog;
pub mod error;
pub mod extract;
pub mod lines;
pub mod scan;

pub use catalog::{Exemption, TrickyCase};
pub use error::LintError;
pub use extract::{Page, extract};

/// Checks JavaScript ports for leftovers of the original Python.
#[derive(Debug, Clone)]
pub struct Linter {
    pub catalog: Vec<TrickyCase>,
    pub line_endings: Vec<String>,
}

impl Default for Linter {
    fn default() -> Self {
        Linter {
            catalog: catalog::default_catalog(),
            line_endings: catalog::default_line_endings(),
        }
    }
}

impl Linter {
    pub fn new(catalog: Vec<TrickyCase>, line_endings: Vec<String>) -> Self {
        Linter {
            catalog,
            line_endings,
        }
    }

    /// Pattern findings for the whole script, then per-line findings.
    pub fn lint_script(&self, script: &str) -> Vec<LintError> {
        let mut errors = scan::scan_patterns(script, &self.catalog);
        errors.extend(lines::validate_lines(script, &self.line_endings));
        errors
    }

    /// Check the heading against the title, then every script.
    pub fn lint_extracted(&self, page: &Page) -> Vec<LintError> {
        let mut errors = Vec::new();
        if !page.heading_matches_title() {
            errors.push(LintError::HeadingMismatch {
                title: page.title.clone().unwrap_or_default(),
                heading: page.heading.clone().unwrap_or_default(),
            });
        }
        for script in &page.scripts {
            errors.extend(self.lint_script(script));
        }
        errors
    }

    pub fn lint_page(&self, html: &str) -> Vec<LintError> {
        self.lint_extracted(&extract(html))
    }
}
