//! Snapshot tests for diagnostic message formatting.
//!
//! Uses insta to capture messages and detect regressions.
//! Run `cargo insta review` to review changes.

use insta::assert_snapshot;

/// All diagnostics of a source, one per line.
fn report(source: &str) -> String {
    voidcheck::check_source(source)
        .unwrap()
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn void_in_var_decl() {
    let source = "package main\nfunc f() {}\nfunc g() {\n  var x = f()\n}\n";
    assert_snapshot!(report(source), @"4:11: [VoidUsedAsValue] f() (no value) used as value in variable declaration at 4:11");
}

#[test]
fn multi_value_in_switch() {
    let source = "func h() (int, bool) { return 1, true }\nfunc g() {\n  switch h() {\n  }\n}\n";
    assert_snapshot!(report(source), @"3:10: [MultiValueInSingleContext] multiple-value h() (value of type (int, bool)) in single-value context: switch expression at 3:10");
}

#[test]
fn unresolved_argument() {
    let source = "func g() {\n  println(1, missing)\n}\n";
    assert_snapshot!(report(source), @"2:14: [UnresolvedReferenceError] undefined: missing in argument 2 to println() at 2:14");
}

#[test]
fn function_reference() {
    let source = "func f() {}\nfunc g() int {\n  return f\n}\n";
    assert_snapshot!(report(source), @"3:10: [FunctionUsedAsValue] f (function) is not a value; used in return statement at 3:10");
}

#[test]
fn tuple_count() {
    let source = "func h() (int, int) { return 1, 2 }\nfunc g() {\n  a, b, c := h()\n}\n";
    assert_snapshot!(report(source), @"3:14: [ResultCountMismatch] short variable declaration expects 3 values, but h() produces 2 at 3:14");
}

#[test]
fn several_in_source_order() {
    let source = "func f() {}\nfunc g() {\n  if f() {\n  }\n  x := unknown()\n}\n";
    assert_snapshot!(report(source), @r"
    3:6: [VoidUsedAsValue] f() (no value) used as value in condition at 3:6
    5:8: [UnresolvedReferenceError] undefined: unknown in short variable declaration at 5:8
    ");
}

#[test]
fn syntax_error() {
    let err = voidcheck::check_source("func g() {\n  var = 1\n}\n").unwrap_err();
    assert_snapshot!(err.to_string(), @"Syntax error: expected identifier, found '='");
}

#[test]
fn integer_literal_out_of_range() {
    let err = voidcheck::check_source("func g() {\n  x := 99999999999999999999\n}\n").unwrap_err();
    assert_snapshot!(err.to_string(), @"Syntax error: integer literal out of range: 99999999999999999999");
}

#[test]
fn call_of_variable() {
    let source = "func f() {}\nfunc g() {\n  f := 1\n  println(f())\n}\n";
    assert_snapshot!(report(source), @"4:11: [NotAFunction] cannot call non-function f (variable of type int) in argument 1 to println() at 4:11");
}
