//! Common test utilities for typeck tests.
//! Re-exports the CLI helper from tests/integration/common and adds
//! library-level helpers that look at diagnostic kinds directly.

#[path = "../integration/common/mod.rs"]
mod integration_common;

#[allow(unused_imports)]
pub use integration_common::{check_should_fail_with, check_should_pass};

use voidcheck::diagnostics::{Diagnostic, DiagnosticKind};

pub fn diagnostics(source: &str) -> Vec<Diagnostic> {
    voidcheck::check_source(source).unwrap()
}

pub fn kinds(source: &str) -> Vec<DiagnosticKind> {
    diagnostics(source).into_iter().map(|d| d.kind).collect()
}

pub fn assert_kinds(source: &str, expected: &[DiagnosticKind]) {
    let diags = diagnostics(source);
    let got: Vec<_> = diags.iter().map(|d| d.kind).collect();
    assert_eq!(got, expected, "diagnostics: {diags:#?}");
}

#[allow(dead_code)]
pub fn assert_clean(source: &str) {
    assert_kinds(source, &[]);
}
