use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voidcheck::config::Config;
use voidcheck::diagnostics::{render_diagnostic, render_error, CompileError, Diagnostic};

const LOG_ENV: &str = "VOIDCHECK_LOG";

#[derive(Parser)]
#[command(name = "voidcheck", version, about = "Rejects no-value and multi-value calls used as values")]
struct Cli {
    /// Config file (defaults to ./voidcheck.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads for checking function bodies
    #[arg(long, short, global = true)]
    jobs: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check source files and report value-context diagnostics
    Check {
        /// Source file paths
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Run every fixture under a directory and summarize
    Corpus {
        /// Fixture root directory
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(serde::Serialize)]
struct FileReport<'a> {
    file: String,
    diagnostics: &'a [Diagnostic],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, CompileError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| CompileError::io(format!("could not read current directory: {e}"), PathBuf::from(".")))?;
            Config::discover(&cwd)?
        }
    };
    if let Some(jobs) = cli.jobs {
        config.check.jobs = jobs.max(1);
    }
    Ok(config)
}

/// Returns whether any file was rejected or failed to load.
fn run_check(files: &[PathBuf], format: Format, config: &Config) -> bool {
    let color = std::io::stderr().is_terminal();
    let mut failed = false;
    let mut reports = Vec::new();
    let mut all_diags: Vec<Vec<Diagnostic>> = Vec::new();

    for file in files {
        let filename = file.to_string_lossy().to_string();
        match voidcheck::check_file(file, config) {
            Ok((source, diags)) => {
                failed |= !diags.is_empty();
                if format == Format::Text {
                    for diag in &diags {
                        eprint!("{}", render_diagnostic(&source, &filename, diag, color));
                    }
                }
                all_diags.push(diags);
                reports.push((filename, None));
            }
            Err(err) => {
                failed = true;
                if format == Format::Text {
                    eprint!("{}", render_error(&read_or_empty(file), &filename, &err, color));
                }
                all_diags.push(Vec::new());
                reports.push((filename, Some(err.to_string())));
            }
        }
    }

    if format == Format::Json {
        let out: Vec<FileReport<'_>> = reports
            .into_iter()
            .zip(&all_diags)
            .map(|((file, error), diagnostics)| FileReport { file, diagnostics, error })
            .collect();
        match serde_json::to_string_pretty(&out) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: could not serialize diagnostics: {e}");
                failed = true;
            }
        }
    } else {
        let count: usize = all_diags.iter().map(Vec::len).sum();
        if count > 0 {
            eprintln!("{count} diagnostic(s)");
        }
    }
    failed
}

fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}

fn run_corpus(dir: &Path, config: &Config) -> bool {
    match voidcheck::corpus::run_corpus(dir, config) {
        Ok(report) => {
            for failure in &report.failures {
                eprintln!("FAIL {failure}");
            }
            eprintln!(
                "corpus: {} passed, {} failed ({} total)",
                report.passed,
                report.failures.len(),
                report.total()
            );
            !report.is_success()
        }
        Err(err) => {
            eprintln!("error: {err}");
            true
        }
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    let failed = match &cli.command {
        Commands::Check { files, format } => run_check(files, *format, &config),
        Commands::Corpus { dir } => run_corpus(dir, &config),
    };
    if failed {
        std::process::exit(1);
    }
}
