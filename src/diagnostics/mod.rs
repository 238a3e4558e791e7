use crate::span::{LineIndex, Position, Span};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Hard failures that stop processing of a single file.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Syntax error: {msg}")]
    Syntax { msg: String, span: Span },

    #[error("I/O error: {msg} ({})", path.display())]
    Io { msg: String, path: PathBuf },

    #[error("Config error: {msg} ({})", path.display())]
    Config { msg: String, path: PathBuf },
}

impl CompileError {
    pub fn syntax(msg: impl Into<String>, span: Span) -> Self {
        Self::Syntax { msg: msg.into(), span }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Config { msg: msg.into(), path }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Syntax { span, .. } => Some(*span),
            CompileError::Io { .. } | CompileError::Config { .. } => None,
        }
    }
}

/// What a rejected value-context site did wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A zero-result call where exactly one value is required.
    VoidUsedAsValue,
    /// A call producing several results where exactly one value is required.
    MultiValueInSingleContext,
    /// The called (or named) entity does not resolve.
    UnresolvedReferenceError,
    /// A bare function name where a value is required.
    FunctionUsedAsValue,
    /// The number of produced values does not match the number the position takes.
    ResultCountMismatch,
    /// A call whose callee names a variable.
    NotAFunction,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiagnosticKind::VoidUsedAsValue => "VoidUsedAsValue",
            DiagnosticKind::MultiValueInSingleContext => "MultiValueInSingleContext",
            DiagnosticKind::UnresolvedReferenceError => "UnresolvedReferenceError",
            DiagnosticKind::FunctionUsedAsValue => "FunctionUsedAsValue",
            DiagnosticKind::ResultCountMismatch => "ResultCountMismatch",
            DiagnosticKind::NotAFunction => "NotAFunction",
        };
        f.write_str(s)
    }
}

/// A structured rejection of one site. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, span: Span, lines: &LineIndex, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            position: lines.position(span.start),
            message: message.into(),
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: [{}] {}", self.position, self.kind, self.message)
    }
}

/// Stable report order: by source position, then kind.
pub fn sort_diagnostics(diags: &mut [Diagnostic]) {
    diags.sort_by(|a, b| {
        a.span
            .cmp(&b.span)
            .then_with(|| a.kind.to_string().cmp(&b.kind.to_string()))
            .then_with(|| a.message.cmp(&b.message))
    });
}

fn report_config(color: bool) -> ariadne::Config {
    ariadne::Config::default().with_color(color)
}

/// Render a diagnostic with ariadne into a string.
pub fn render_diagnostic(source: &str, filename: &str, diag: &Diagnostic, color: bool) -> String {
    use ariadne::{Label, Report, ReportKind, Source};

    let mut buf = Vec::new();
    let written = Report::build(ReportKind::Error, (), diag.span.start)
        .with_config(report_config(color))
        .with_code(diag.kind.to_string())
        .with_message(format!("{filename}:{}", diag.position))
        .with_label(Label::new(diag.span.start..diag.span.end).with_message(&diag.message))
        .finish()
        .write(Source::from(source), &mut buf);
    match written {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("{filename}:{diag}\n"),
    }
}

/// Render a CompileError with ariadne into a string.
pub fn render_error(source: &str, filename: &str, err: &CompileError, color: bool) -> String {
    use ariadne::{Label, Report, ReportKind, Source};

    match err {
        CompileError::Syntax { msg, span } => {
            let mut buf = Vec::new();
            let written = Report::build(ReportKind::Error, (), span.start)
                .with_config(report_config(color))
                .with_message(format!("{filename}: syntax error"))
                .with_label(Label::new(span.start..span.end).with_message(msg))
                .finish()
                .write(Source::from(source), &mut buf);
            match written {
                Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
                Err(_) => format!("error [{filename}]: {err}\n"),
            }
        }
        CompileError::Io { .. } | CompileError::Config { .. } => format!("error: {err}\n"),
    }
}
