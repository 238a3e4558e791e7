//! Runs a directory of fixture programs against the checker.
//!
//! A fixture under a directory whose name starts with `invalid` must be
//! rejected, one under `valid` must be accepted. Lines carrying the
//! configured marker in a `//` comment must each receive a diagnostic.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Config;
use crate::diagnostics::CompileError;

pub const FIXTURE_EXTENSION: &str = "go";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expectation {
    Reject,
    Accept,
    /// Outside any `valid`/`invalid` directory: only markers are checked.
    Markers,
}

impl Expectation {
    /// Decided by the nearest `valid`/`invalid*` directory between `root`
    /// and the fixture.
    pub fn for_path(root: &Path, path: &Path) -> Self {
        let rel = path.strip_prefix(root).unwrap_or(path);
        let parent = rel.parent().unwrap_or(Path::new(""));
        for component in parent.components().rev() {
            let name = component.as_os_str().to_string_lossy();
            if name.starts_with("invalid") {
                return Expectation::Reject;
            }
            if name == "valid" {
                return Expectation::Accept;
            }
        }
        Expectation::Markers
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl fmt::Display for FixtureFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.reason)
    }
}

#[derive(Debug, Default)]
pub struct CorpusReport {
    pub passed: usize,
    pub failures: Vec<FixtureFailure>,
}

impl CorpusReport {
    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 1-based lines whose `//` comment contains `marker`.
pub fn expected_error_lines(source: &str, marker: &str) -> Vec<usize> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| line.find("//").is_some_and(|i| line[i + 2..].contains(marker)))
        .map(|(i, _)| i + 1)
        .collect()
}

/// Every fixture file under `dir`, in path order.
pub fn collect_fixtures(dir: &Path) -> Result<Vec<PathBuf>, CompileError> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), CompileError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CompileError::io(format!("could not read directory: {e}"), dir.to_path_buf()))?;
    for entry in entries {
        let entry = entry.map_err(|e| CompileError::io(e.to_string(), dir.to_path_buf()))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == FIXTURE_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

/// Checks one fixture. `Ok(())` when it behaves as its location and
/// markers demand, otherwise the reason it does not.
pub fn check_fixture(root: &Path, path: &Path, config: &Config) -> Result<(), String> {
    let source = std::fs::read_to_string(path).map_err(|e| format!("could not read file: {e}"))?;
    let expectation = Expectation::for_path(root, path);
    let marked = expected_error_lines(&source, &config.corpus.marker);

    let diagnostics = match crate::check_source_with(&source, config) {
        Ok(diags) => diags,
        // Rejected by the front end, not by a value-context check.
        Err(err) => return Err(format!("front end rejected the fixture: {err}")),
    };
    debug!(path = %path.display(), diagnostics = diagnostics.len(), "fixture checked");

    for line in &marked {
        if !diagnostics.iter().any(|d| d.line() == *line) {
            return Err(format!("expected a diagnostic on line {line}"));
        }
    }
    match expectation {
        Expectation::Reject if diagnostics.is_empty() => Err("expected at least one diagnostic, got none".to_string()),
        Expectation::Accept if !diagnostics.is_empty() => {
            Err(format!("expected no diagnostics, got {}: {}", diagnostics.len(), diagnostics[0]))
        }
        _ => Ok(()),
    }
}

pub fn run_corpus(dir: &Path, config: &Config) -> Result<CorpusReport, CompileError> {
    let fixtures = collect_fixtures(dir)?;
    info!(dir = %dir.display(), fixtures = fixtures.len(), "running corpus");
    let mut report = CorpusReport::default();
    for path in fixtures {
        match check_fixture(dir, &path, config) {
            Ok(()) => report.passed += 1,
            Err(reason) => report.failures.push(FixtureFailure { path, reason }),
        }
    }
    info!(passed = report.passed, failed = report.failures.len(), "corpus finished");
    Ok(report)
}
