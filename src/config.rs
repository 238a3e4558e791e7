use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::CompileError;

pub const CONFIG_FILE: &str = "voidcheck.toml";

/// Settings read from `voidcheck.toml`. Every field has a default, so an
/// empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub check: CheckConfig,
    pub corpus: CorpusConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Worker threads for function bodies. 1 checks sequentially.
    pub jobs: usize,
    /// Seed `print`, `println` and `len`.
    pub builtins: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { jobs: 1, builtins: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
    /// Comment text marking a line that must be rejected.
    pub marker: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self { marker: "Error:".to_string() }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, CompileError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CompileError::config(format!("{CONFIG_FILE}: could not read file: {e}"), path.to_path_buf())
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CompileError::config(format!("{CONFIG_FILE}: invalid syntax: {e}"), path.to_path_buf())
        })?;
        if config.check.jobs == 0 {
            return Err(CompileError::config("[check] jobs must be at least 1", path.to_path_buf()));
        }
        if config.corpus.marker.trim().is_empty() {
            return Err(CompileError::config("[corpus] marker must not be empty", path.to_path_buf()));
        }
        Ok(config)
    }

    /// Loads `<dir>/voidcheck.toml` if present, otherwise the defaults.
    pub fn discover(dir: &Path) -> Result<Self, CompileError> {
        match find_config(dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}
