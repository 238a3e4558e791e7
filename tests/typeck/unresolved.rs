//! Names that resolve to nothing.
#[path = "common.rs"]
mod common;
use common::{assert_clean, assert_kinds, check_should_fail_with, diagnostics};
use voidcheck::diagnostics::DiagnosticKind::*;

#[test]
fn unknown_call_in_value_context() {
    let diags = diagnostics("func g() {\n  var x = unknown()\n}\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, UnresolvedReferenceError);
    assert!(diags[0].message.starts_with("undefined: unknown in variable declaration"), "{}", diags[0].message);
}

#[test]
fn unknown_call_points_at_name() {
    let src = "func g() {\n  var x = unknown(1)\n}\n";
    let diags = diagnostics(src);
    assert_eq!(diags.len(), 1);
    assert_eq!(&src[diags[0].span.start..diags[0].span.end], "unknown");
}

#[test]
fn unknown_call_statement() {
    let diags = diagnostics("func g() {\n  unknown()\n}\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, UnresolvedReferenceError);
    assert_eq!(diags[0].message, "undefined: unknown at 2:3");
}

#[test]
fn unknown_variable() {
    assert_kinds("func g() {\n  var x = y\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn unknown_assignment_target() {
    assert_kinds("func g() {\n  y = 1\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn unknown_increment_target() {
    assert_kinds("func g() {\n  n++\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn no_cascade_through_operands() {
    assert_kinds("func g() {\n  x := unknown() + 1\n  println(x * 2)\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn out_of_scope_after_block() {
    assert_kinds("func g() {\n  {\n    x := 1\n  }\n  println(x)\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn for_init_scoped_to_loop() {
    assert_kinds("func g() {\n  for i := 0; i < 3; i++ {\n  }\n  println(i)\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn later_function_is_visible() {
    assert_clean("func g() {\n  var x = later()\n  println(x)\n}\nfunc later() int { return 1 }\n");
}

#[test]
fn global_forward_reference_is_unresolved() {
    assert_kinds("var a = b\nvar b = 1\n", &[UnresolvedReferenceError]);
}

#[test]
fn params_resolve() {
    assert_clean("func g(a, b int, s string) int {\n  println(s)\n  return a + b\n}\n");
}

#[test]
fn unknown_via_cli() {
    check_should_fail_with("package main\nfunc g() {\n  var x = unknown()\n}\n", "undefined: unknown");
}

#[test]
fn unknown_name_statement() {
    let diags = diagnostics("func g() {\n  nope\n}\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, UnresolvedReferenceError);
    assert_eq!(diags[0].message, "undefined: nope at 2:3");
}

#[test]
fn unknown_operand_in_statement_expression() {
    assert_kinds("func g() {\n  x := 1\n  x + nope\n}\n", &[UnresolvedReferenceError]);
}

#[test]
fn known_names_as_statements() {
    assert_clean("func f() {}\nfunc g() {\n  x := 1\n  x\n  f\n  println(x)\n}\n");
}
