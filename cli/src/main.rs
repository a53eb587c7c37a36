mod config;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use config::Config;
use transpiler::{Resources, page};

const SUBCOMMANDS: &[&str] = &["build", "lint", "test", "help"];

#[derive(Parser)]
#[command(name = "jsport", version, about = "Port Pygame Zero scripts to JavaScript pages")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file (defaults to jsport.toml next to the input)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the HTML page for a game script
    Build(BuildArgs),

    /// Check a JavaScript port page, script, or directory of pages
    Lint(LintArgs),

    /// Run .port.test fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Python game script
    file: PathBuf,

    /// Only print the translated code
    #[arg(short, long)]
    code: bool,

    /// Only list the resources found for the script
    #[arg(short, long)]
    list: bool,
}

#[derive(clap::Args)]
struct LintArgs {
    /// HTML page, .js script, or directory of .html pages
    path: PathBuf,

    /// Report findings as errors and exit non-zero when there are any
    #[arg(long)]
    deny: bool,

    /// Print bare messages to stdout
    #[arg(long)]
    plain: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .port.test file or directory containing them
    path: PathBuf,

    /// Run only fixtures in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // If the first positional arg is not a known subcommand, inject "build"
    // so `jsport game.py` works like `jsport build game.py`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(pos) = first_positional(&args) {
        if !SUBCOMMANDS.contains(&args[pos].as_str()) {
            args.insert(pos, "build".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let code = match cli.command {
        Command::Build(build_args) => {
            let config = load_config(cli.config.as_deref(), &build_args.file, color_choice);
            do_build(build_args, &config)
        }
        Command::Lint(lint_args) => {
            let config = load_config(cli.config.as_deref(), &lint_args.path, color_choice);
            do_lint(lint_args, &config, color_choice)
        }
        Command::Test(test_args) => {
            if test_args.list_categories {
                test_runner::list_categories(&test_args.path);
                return;
            }
            let config = load_config(cli.config.as_deref(), &test_args.path, color_choice);
            test_runner::run_tests(&test_args.path, color_choice, &test_args.category, &config)
        }
    };
    process::exit(code);
}

/// Index of the first argument that is neither a flag nor a `--config` value.
fn first_positional(args: &[String]) -> Option<usize> {
    let mut i = 1;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--config" {
            i += 2;
            continue;
        }
        if !arg.starts_with('-') {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn load_config(explicit: Option<&Path>, input: &Path, color_choice: ColorChoice) -> Config {
    match config::load(explicit, input) {
        Ok(config) => config,
        Err(error) => {
            let mut files = SimpleFiles::new();
            let diagnostic = error.to_diagnostic(&mut files);
            emit(&diagnostic, &files, color_choice);
            process::exit(1);
        }
    }
}

fn emit(diagnostic: &Diagnostic<usize>, files: &SimpleFiles<String, String>, color_choice: ColorChoice) {
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, diagnostic);
}

fn read_source(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn do_build(args: BuildArgs, config: &Config) -> i32 {
    if !args.file.is_file() {
        eprintln!("error: '{}' is not a file", args.file.display());
        return 1;
    }

    let parent = args
        .file
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let resources = Resources::scan(&parent);

    if args.list {
        for (header, files) in resources.groups() {
            println!("{}", header);
            for f in files {
                println!("\t{}", f);
            }
        }
        return 0;
    }

    let source = read_source(&args.file);
    let lines = transpiler::source_lines(&source);
    let script = transpiler::transpile(&lines, &config.rendering(), &config.tally_patterns());

    if args.code {
        print!("{}", script);
        return 0;
    }

    let title = args
        .file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    print!("{}", page::render_page(&title, &lines, &resources, &script));
    0
}

/// The files a lint run covers: the file itself, or the `.html` pages of a
/// directory in name order.
fn lint_targets(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let Ok(entries) = std::fs::read_dir(path) else {
        return Vec::new();
    };
    let mut pages: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"))
        .collect();
    pages.sort();
    pages
}

fn do_lint(args: LintArgs, config: &Config, color_choice: ColorChoice) -> i32 {
    if !args.path.exists() {
        eprintln!("error: '{}' does not exist", args.path.display());
        return 1;
    }

    let targets = lint_targets(&args.path);
    if targets.is_empty() {
        eprintln!("no .html files found in {}", args.path.display());
        return 0;
    }

    let linter = config.linter();
    let severity = if args.deny {
        Severity::Error
    } else {
        Severity::Warning
    };
    let files = SimpleFiles::new();
    let mut total = 0usize;

    for target in &targets {
        let source = read_source(target);
        let errors = if target.extension().is_some_and(|ext| ext == "js") {
            linter.lint_script(&source)
        } else {
            linter.lint_page(&source)
        };
        total += errors.len();

        if args.plain {
            if !errors.is_empty() && targets.len() > 1 {
                println!("{}", target.display());
            }
            for error in &errors {
                println!("{}", error);
            }
            continue;
        }

        for error in &errors {
            let mut diagnostic = error.to_diagnostic(severity);
            diagnostic.notes.push(format!("in {}", target.display()));
            emit(&diagnostic, &files, color_choice);
        }
    }

    if !args.plain {
        if total == 0 {
            eprintln!("ok: {} file(s) checked, no problems", targets.len());
        } else {
            eprintln!("{} problem(s) in {} file(s) checked", total, targets.len());
        }
    }

    if args.deny && total > 0 { 1 } else { 0 }
}
