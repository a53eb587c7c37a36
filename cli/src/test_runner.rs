use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use codespan_reporting::term::termcolor::{
    Color, ColorChoice, ColorSpec, StandardStream, WriteColor,
};
use serde::Deserialize;

use linter::LintError;

use crate::config::Config;

/// Extension of fixture files.
pub const FIXTURE_SUFFIX: &str = ".port.test";

#[derive(Debug, Deserialize)]
pub struct ExpectedError {
    /// Substring that must appear in the error message.
    pub contains: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Input is Python source; output is the transpiled script.
    #[default]
    Transpile,
    /// Input is a raw script body.
    Lint,
    /// Input is a full HTML page.
    LintPage,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub mode: Mode,

    /// Expected exact transpiler output (trimmed comparison).
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Substrings the transpiler output must contain.
    #[serde(default)]
    pub expect_contains: Vec<String>,

    /// Expected lint errors, in order. If present (even empty), the count is checked too.
    #[serde(default)]
    pub expect_errors: Option<Vec<ExpectedError>>,
}

/// Split a fixture into its TOML config and input text.
fn parse_fixture(content: &str) -> Result<(FixtureConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let (toml_str, rest) = match after_open.strip_prefix("---") {
        Some(rest) => ("", rest),
        None => {
            let close_pos = after_open
                .find("\n---")
                .ok_or("missing closing --- frontmatter delimiter")?;
            (
                after_open[..close_pos].trim_end_matches('\r'),
                &after_open[close_pos + 4..], // skip \n---
            )
        }
    };
    let input = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: FixtureConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, input))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.trim_end_matches(FIXTURE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path, config: &Config) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (fixture, input) = match parse_fixture(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };

    let description = fixture.description.clone();
    let reason = match fixture.mode {
        Mode::Transpile => {
            let lines = transpiler::source_lines(input);
            let output = transpiler::transpile(&lines, &config.rendering(), &config.tally_patterns());
            check_output(&output, &fixture)
        }
        Mode::Lint => check_errors(&config.linter().lint_script(input), &fixture),
        Mode::LintPage => check_errors(&config.linter().lint_page(input), &fixture),
    };

    match reason {
        Some(reason) => fail(description, reason),
        None => TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        },
    }
}

/// Compare transpiler output with the expectations. Returns `Some(reason)` on mismatch.
fn check_output(output: &str, fixture: &FixtureConfig) -> Option<String> {
    if let Some(expected) = &fixture.expect_output {
        let actual = output.trim();
        let expected = expected.trim();
        if actual != expected {
            return Some(format!(
                "output mismatch\n  expected:\n{}\n  actual:\n{}",
                expected, actual
            ));
        }
    }
    for wanted in &fixture.expect_contains {
        if !output.contains(wanted.as_str()) {
            return Some(format!("output does not contain \"{}\"\n  actual:\n{}", wanted, output));
        }
    }
    None
}

/// Check that lint errors match expectations. Returns `Some(reason)` on mismatch.
fn check_errors(errors: &[LintError], fixture: &FixtureConfig) -> Option<String> {
    let Some(expected) = &fixture.expect_errors else {
        return None;
    };

    if errors.len() != expected.len() {
        let actual: Vec<String> = errors
            .iter()
            .map(|e| format!("  - {}", e.to_string().replace('\n', " ")))
            .collect();
        return Some(format!(
            "expected {} error(s), got {}\n  actual errors:\n{}",
            expected.len(),
            errors.len(),
            if actual.is_empty() {
                "    (none)".to_string()
            } else {
                actual.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in errors.iter().zip(expected).enumerate() {
        let msg = actual.to_string();
        if !msg.contains(&expected.contains) {
            return Some(format!(
                "error[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, msg
            ));
        }
    }

    None
}

/// Name shown for fixtures placed directly in the suite root.
const ROOT_CATEGORY: &str = "(root)";

/// Fixture files keyed by the folder they sit in, relative to the root.
#[derive(Debug, Default)]
pub struct Suite {
    categories: BTreeMap<String, Vec<PathBuf>>,
}

impl Suite {
    /// Walk `root` for fixture files. Unreadable folders are skipped.
    pub fn discover(root: &Path) -> Self {
        let mut suite = Suite::default();
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for path in entries.flatten().map(|e| e.path()) {
                if path.is_dir() {
                    pending.push(path);
                } else if is_fixture(&path) {
                    suite.categories.entry(category_of(&dir, root)).or_default().push(path);
                }
            }
        }
        for files in suite.categories.values_mut() {
            files.sort();
        }
        suite
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn names(&self) -> Vec<&str> {
        self.categories.keys().map(|k| display_category(k)).collect()
    }

    /// Keep the requested categories and everything nested below them.
    ///
    /// Returns the narrowed suite and the requests that matched nothing.
    pub fn select(self, requested: &[String]) -> (Suite, Vec<String>) {
        if requested.is_empty() {
            return (self, Vec::new());
        }
        let wanted: Vec<&str> = requested.iter().map(|r| r.trim_matches('/')).collect();
        let covers = |req: &str, cat: &str| {
            cat == req || cat.strip_prefix(req).is_some_and(|rest| rest.starts_with('/'))
        };
        let unknown = wanted
            .iter()
            .filter(|req| !self.categories.keys().any(|cat| covers(req, cat)))
            .map(|req| req.to_string())
            .collect();
        let categories = self
            .categories
            .into_iter()
            .filter(|(cat, _)| wanted.iter().any(|req| covers(req, cat)))
            .collect();
        (Suite { categories }, unknown)
    }
}

fn is_fixture(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(FIXTURE_SUFFIX))
}

fn category_of(dir: &Path, root: &Path) -> String {
    dir.strip_prefix(root)
        .map(|rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}

fn display_category(name: &str) -> &str {
    if name.is_empty() { ROOT_CATEGORY } else { name }
}

/// Print the categories found under `path`.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("{} is a single fixture", path.display());
        return;
    }
    let suite = Suite::discover(path);
    if suite.is_empty() {
        eprintln!("no {} files found in {}", FIXTURE_SUFFIX, path.display());
        return;
    }
    for (name, files) in &suite.categories {
        eprintln!("{}\t{}", display_category(name), files.len());
    }
}

/// Colored PASS/FAIL output on stderr.
struct Reporter {
    out: StandardStream,
}

impl Reporter {
    fn new(color_choice: ColorChoice) -> Self {
        Reporter {
            out: StandardStream::stderr(color_choice),
        }
    }

    fn painted(&mut self, text: &str, spec: &ColorSpec) -> io::Result<()> {
        self.out.set_color(spec)?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }

    fn heading(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out)?;
        self.painted(display_category(name), ColorSpec::new().set_bold(true))?;
        writeln!(self.out)
    }

    fn outcome(&mut self, result: &TestResult) -> io::Result<()> {
        let (word, color) = match result.outcome {
            TestOutcome::Pass => ("PASS", Color::Green),
            TestOutcome::Fail(_) => ("FAIL", Color::Red),
        };
        write!(self.out, "  ")?;
        self.painted(word, ColorSpec::new().set_fg(Some(color)))?;
        writeln!(self.out, "  {}", result.label())
    }

    fn failures(&mut self, failures: &[TestResult]) -> io::Result<()> {
        if failures.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "\nfailures:")?;
        for failure in failures {
            writeln!(self.out, "\n  {}:", failure.path.display())?;
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    writeln!(self.out, "    {}", line)?;
                }
            }
        }
        Ok(())
    }

    /// Final tally line; the exit code follows from it.
    fn summary(&mut self, passed: usize, failed: usize) -> io::Result<i32> {
        write!(self.out, "\ntest result: ")?;
        if failed == 0 {
            self.painted("ok", ColorSpec::new().set_fg(Some(Color::Green)))?;
            writeln!(self.out, ". {} passed, 0 failed", passed)?;
            Ok(0)
        } else {
            self.painted("FAILED", ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(self.out, ". {} passed, {} failed of {}", passed, failed, passed + failed)?;
            Ok(1)
        }
    }
}

/// Run one fixture file, or every fixture below a folder.
///
/// A non-empty `categories` narrows a folder run. Returns 1 if any fixture
/// fails or none were found, 0 otherwise.
pub fn run_tests(
    path: &Path,
    color_choice: ColorChoice,
    categories: &[String],
    config: &Config,
) -> i32 {
    let suite = if path.is_file() {
        let mut single = Suite::default();
        single.categories.insert(String::new(), vec![path.to_path_buf()]);
        single
    } else {
        let suite = Suite::discover(path);
        let available = suite.names().join(", ");
        let (suite, unknown) = suite.select(categories);
        for name in unknown {
            eprintln!("warning: no category '{}' (available: {})", name, available);
        }
        suite
    };

    if suite.is_empty() {
        eprintln!("no {} files to run in {}", FIXTURE_SUFFIX, path.display());
        return 1;
    }

    let mut reporter = Reporter::new(color_choice);
    run_suite(&suite, config, &mut reporter).unwrap_or_else(|e| {
        eprintln!("error: cannot write test report: {}", e);
        1
    })
}

fn run_suite(suite: &Suite, config: &Config, reporter: &mut Reporter) -> io::Result<i32> {
    let mut passed = 0usize;
    let mut failures = Vec::new();

    for (name, files) in &suite.categories {
        reporter.heading(name)?;
        for file in files {
            let result = run_single_test(file, config);
            reporter.outcome(&result)?;
            if matches!(result.outcome, TestOutcome::Pass) {
                passed += 1;
            } else {
                failures.push(result);
            }
        }
    }

    reporter.failures(&failures)?;
    reporter.summary(passed, failures.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_frontmatter_from_input() {
        let (config, input) =
            parse_fixture("---\ndescription = \"d\"\nmode = \"lint\"\n---\nfoo;\n").unwrap();
        assert_eq!(config.description.as_deref(), Some("d"));
        assert_eq!(config.mode, Mode::Lint);
        assert_eq!(input, "foo;\n");
    }

    #[test]
    fn mode_defaults_to_transpile() {
        let (config, input) = parse_fixture("---\n---\ndef f():\n").unwrap();
        assert_eq!(config.mode, Mode::Transpile);
        assert_eq!(input, "def f():\n");
    }

    #[test]
    fn lint_page_mode_name() {
        let (config, _) = parse_fixture("---\nmode = \"lint-page\"\n---\n").unwrap();
        assert_eq!(config.mode, Mode::LintPage);
    }

    #[test]
    fn rejects_missing_delimiters() {
        assert!(parse_fixture("mode = \"lint\"\n").is_err());
        assert!(parse_fixture("---\nmode = \"lint\"\n").is_err());
    }

    #[test]
    fn error_count_mismatch_is_reported() {
        let (fixture, _) =
            parse_fixture("---\nmode = \"lint\"\nexpect_errors = []\n---\n").unwrap();
        let reason = check_errors(&[LintError::BadEnding("foo".into())], &fixture).unwrap();
        assert!(reason.starts_with("expected 0 error(s), got 1"));
        assert!(reason.contains("Line does not end correctly: foo"));
    }

    #[test]
    fn suite_groups_fixtures_by_folder() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("lint/pages")).unwrap();
        std::fs::create_dir_all(root.join("transpile")).unwrap();
        for file in [
            "top.port.test",
            "lint/a.port.test",
            "lint/pages/b.port.test",
            "transpile/c.port.test",
            "transpile/notes.txt",
        ] {
            std::fs::write(root.join(file), "---\n---\n").unwrap();
        }

        let suite = Suite::discover(root);
        assert_eq!(suite.names(), vec![ROOT_CATEGORY, "lint", "lint/pages", "transpile"]);

        let (narrowed, unknown) = suite.select(&["lint/".to_string(), "missing".to_string()]);
        assert_eq!(narrowed.names(), vec!["lint", "lint/pages"]);
        assert_eq!(unknown, vec!["missing"]);
    }

    #[test]
    fn select_does_not_match_name_prefixes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("linter")).unwrap();
        std::fs::write(dir.path().join("linter/x.port.test"), "---\n---\n").unwrap();

        let (narrowed, unknown) = Suite::discover(dir.path()).select(&["lint".to_string()]);
        assert!(narrowed.is_empty());
        assert_eq!(unknown, vec!["lint"]);
    }

    #[test]
    fn output_expectations() {
        let (fixture, _) = parse_fixture(
            "---\nexpect_output = \"a\\n{\\n}\"\nexpect_contains = [\"{\"]\n---\n",
        )
        .unwrap();
        assert_eq!(check_output("a\n{\n}\n", &fixture), None);
        assert!(check_output("a\n", &fixture).is_some());
    }
}
