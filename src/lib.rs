pub mod span;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod typeck;
pub mod config;
pub mod corpus;

use std::path::Path;

use config::Config;
use diagnostics::{CompileError, Diagnostic};
use span::LineIndex;

pub use typeck::classify::{classify, ExpressionKind};
pub use typeck::signature::ResultSignature;
pub use typeck::validate::{check_single_value_context, check_tuple_context, ContextKind, ValueContextSite};

/// Check a source string with the default configuration (lex → parse → typeck).
/// Value-context diagnostics are returned in `Ok`; lexing and parsing
/// failures are `Err`.
pub fn check_source(source: &str) -> Result<Vec<Diagnostic>, CompileError> {
    check_source_with(source, &Config::default())
}

pub fn check_source_with(source: &str, config: &Config) -> Result<Vec<Diagnostic>, CompileError> {
    let tokens = lexer::lex(source)?;
    let mut parser = parser::Parser::new(&tokens, source);
    let program = parser.parse_program()?;
    let lines = LineIndex::new(source);
    Ok(typeck::check_program(&program, &lines, &config.check))
}

/// Read and check a single file. Returns the source alongside the
/// diagnostics so callers can render them.
pub fn check_file(path: &Path, config: &Config) -> Result<(String, Vec<Diagnostic>), CompileError> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| CompileError::io(format!("could not read file: {e}"), path.to_path_buf()))?;
    let diagnostics = check_source_with(&source, config)?;
    Ok((source, diagnostics))
}
