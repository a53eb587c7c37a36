use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use serde::Deserialize;

use linter::{Linter, TrickyCase};
use transpiler::Rendering;

/// File looked up next to the input when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "jsport.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub lint: LintConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Text used for one level of indentation.
    #[serde(default)]
    pub indent: Option<String>,

    /// Replacement for a top-level `def `.
    #[serde(default)]
    pub function_keyword: Option<String>,

    /// Patterns counted in the summary comment.
    #[serde(default)]
    pub tally: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Patterns reported when found in a script.
    #[serde(default)]
    pub tricky_cases: Option<Vec<String>>,

    /// Accepted endings of a script line.
    #[serde(default)]
    pub line_endings: Option<Vec<String>>,
}

impl Config {
    pub fn rendering(&self) -> Rendering {
        let mut rendering = Rendering::default();
        if let Some(indent) = &self.build.indent {
            rendering.indent = indent.clone();
        }
        if let Some(keyword) = &self.build.function_keyword {
            rendering.function_keyword = keyword.clone();
        }
        rendering
    }

    pub fn tally_patterns(&self) -> Vec<String> {
        self.build
            .tally
            .clone()
            .unwrap_or_else(transpiler::default_tally_patterns)
    }

    pub fn linter(&self) -> Linter {
        let mut linter = Linter::default();
        if let Some(cases) = &self.lint.tricky_cases {
            linter.catalog = cases.iter().map(|c| TrickyCase::new(c.as_str())).collect();
        }
        if let Some(endings) = &self.lint.line_endings {
            linter.line_endings = endings.clone();
        }
        linter
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Parse {
        path: PathBuf,
        source: String,
        message: String,
        span: Option<Range<usize>>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "cannot read '{}': {}", path.display(), message)
            }
            ConfigError::Parse { path, message, .. } => {
                write!(f, "invalid config '{}': {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl ConfigError {
    /// Register the config source and build a diagnostic pointing into it.
    pub fn to_diagnostic(&self, files: &mut SimpleFiles<String, String>) -> Diagnostic<usize> {
        match self {
            ConfigError::Parse {
                path,
                source,
                message,
                span: Some(span),
            } => {
                let file_id = files.add(path.display().to_string(), source.clone());
                Diagnostic::error()
                    .with_message("invalid config")
                    .with_labels(vec![
                        Label::primary(file_id, span.clone()).with_message(message.clone()),
                    ])
            }
            _ => Diagnostic::error().with_message(self.to_string()),
        }
    }
}

pub fn parse(path: &Path, source: &str) -> Result<Config, ConfigError> {
    toml::from_str(source).map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        source: source.to_string(),
        message: e.message().to_string(),
        span: e.span(),
    })
}

/// Load the config for an input file.
///
/// An explicit path must exist. Otherwise `jsport.toml` in the input's
/// directory is used when present, and the defaults when not.
pub fn load(explicit: Option<&Path>, input: &Path) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let dir = if input.is_dir() {
                input
            } else {
                input.parent().unwrap_or_else(|| Path::new("."))
            };
            let candidate = dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                return Ok(Config::default());
            }
            candidate
        }
    };

    let source = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
        path: path.clone(),
        message: e.to_string(),
    })?;
    parse(&path, &source)
}
