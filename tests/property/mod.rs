// Property-based tests for the value-context checker.
//
// Programs are generated from a void callee `v`, a single-result callee `s`
// and a two-result callee `m`, placed in statement and value positions.
//
// Run all property tests:
//   cargo test --test property_tests
//
// Run with more cases (default is 256):
//   PROPTEST_CASES=1000 cargo test --test property_tests

use proptest::prelude::*;
use voidcheck::config::CheckConfig;
use voidcheck::diagnostics::DiagnosticKind;
use voidcheck::lexer::lex;
use voidcheck::parser::Parser;
use voidcheck::span::LineIndex;
use voidcheck::typeck::{check_program, parallel::check_program_parallel};

const PRELUDE: &str = "package main\nfunc v() {}\nfunc s() int { return 1 }\nfunc m() (int, int) { return 1, 2 }\n";
const CALLEES: [&str; 3] = ["v", "s", "m"];

/// Statement shape: 0 = call statement, 1 = short var, 2 = second argument,
/// 3 = switch tag.
fn statement(shape: usize, callee: usize, n: usize) -> String {
    let c = CALLEES[callee];
    match shape {
        0 => format!("  {c}()\n"),
        1 => format!("  x{n} := {c}()\n"),
        2 => format!("  println(1, {c}())\n"),
        _ => format!("  switch {c}() {{\n  }}\n"),
    }
}

/// What one statement must produce.
fn expected(shape: usize, callee: usize) -> Option<DiagnosticKind> {
    match (shape, CALLEES[callee]) {
        (0, _) | (_, "s") => None,
        (_, "v") => Some(DiagnosticKind::VoidUsedAsValue),
        _ => Some(DiagnosticKind::MultiValueInSingleContext),
    }
}

fn program_strategy() -> impl Strategy<Value = Vec<Vec<(usize, usize)>>> {
    prop::collection::vec(prop::collection::vec((0..4usize, 0..3usize), 0..8), 0..6)
}

fn render(functions: &[Vec<(usize, usize)>]) -> String {
    let mut src = PRELUDE.to_string();
    let mut n = 0;
    for (i, body) in functions.iter().enumerate() {
        src.push_str(&format!("func g{i}() {{\n"));
        for &(shape, callee) in body {
            src.push_str(&statement(shape, callee, n));
            n += 1;
        }
        src.push_str("}\n");
    }
    src
}

#[test]
fn prop_check_source_never_panics() {
    proptest!(|(source in "\\PC{0,300}")| {
        let _ = voidcheck::check_source(&source);
    });
}

#[test]
fn prop_each_bad_site_reported_once() {
    proptest!(|(functions in program_strategy())| {
        let src = render(&functions);
        let diags = voidcheck::check_source(&src).unwrap();
        let want: Vec<DiagnosticKind> = functions
            .iter()
            .flatten()
            .filter_map(|&(shape, callee)| expected(shape, callee))
            .collect();
        let got: Vec<DiagnosticKind> = diags.iter().map(|d| d.kind).collect();
        prop_assert_eq!(got, want);
    });
}

#[test]
fn prop_checker_is_idempotent() {
    proptest!(|(functions in program_strategy())| {
        let src = render(&functions);
        prop_assert_eq!(voidcheck::check_source(&src).unwrap(), voidcheck::check_source(&src).unwrap());
    });
}

#[test]
fn prop_parallel_matches_sequential() {
    proptest!(|(functions in program_strategy(), jobs in 2..6usize)| {
        let src = render(&functions);
        let tokens = lex(&src).unwrap();
        let program = Parser::new(&tokens, &src).parse_program().unwrap();
        let lines = LineIndex::new(&src);
        let sequential = check_program(&program, &lines, &CheckConfig::default());
        let config = CheckConfig { jobs, ..CheckConfig::default() };
        prop_assert_eq!(check_program_parallel(&program, &lines, &config), sequential);
    });
}
