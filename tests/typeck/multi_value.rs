//! Multi-result calls and value-count agreement.
#[path = "common.rs"]
mod common;
use common::{assert_clean, assert_kinds, diagnostics, kinds};
use voidcheck::diagnostics::DiagnosticKind::*;

const H: &str = "func h() (int, string) { return 1, \"a\" }\n";

fn with_h(body: &str) -> String {
    format!("{H}func g() {{\n{body}}}\n")
}

#[test]
fn multi_value_in_var_decl() {
    let diags = diagnostics(&with_h("  var x = h()\n"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, MultiValueInSingleContext);
    assert!(diags[0].message.contains("(int, string)"), "{}", diags[0].message);
}

#[test]
fn multi_value_is_never_void() {
    for body in ["  var x = h()\n", "  switch h() {\n  }\n", "  if h() == 1 {\n  }\n", "  var y = 1 + h()\n"] {
        let got = kinds(&with_h(body));
        assert!(!got.contains(&VoidUsedAsValue), "{body}: {got:?}");
        assert!(got.contains(&MultiValueInSingleContext), "{body}: {got:?}");
    }
}

#[test]
fn destructuring_var() {
    assert_clean(&with_h("  var a, b = h()\n  println(a, b)\n"));
}

#[test]
fn destructuring_short_var() {
    assert_clean(&with_h("  a, b := h()\n  println(a, b)\n"));
}

#[test]
fn destructuring_assignment() {
    assert_clean(&with_h("  var a int\n  var b string\n  a, b = h()\n"));
}

#[test]
fn blank_identifier_targets() {
    assert_clean(&with_h("  _, b := h()\n  _, b = h()\n  println(b)\n"));
}

#[test]
fn too_many_names() {
    let diags = diagnostics(&with_h("  a, b, c := h()\n"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, ResultCountMismatch);
    assert!(diags[0].message.contains("expects 3 values, but h() produces 2"), "{}", diags[0].message);
}

#[test]
fn single_value_into_two_names() {
    assert_kinds("func one() int { return 1 }\nfunc g() {\n  var a, b = one()\n}\n", &[ResultCountMismatch]);
}

#[test]
fn void_call_into_two_names() {
    assert_kinds("func f() {}\nfunc g() {\n  a, b := f()\n}\n", &[VoidUsedAsValue]);
}

#[test]
fn value_list_length_mismatch() {
    let diags = diagnostics("func g() {\n  var a, b = 1, 2, 3\n}\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, ResultCountMismatch);
    assert!(diags[0].message.starts_with("assignment mismatch: 2 variables but 3 values"), "{}", diags[0].message);
}

#[test]
fn rejected_value_suppresses_length_mismatch() {
    assert_kinds("func f() {}\nfunc g() {\n  var a, b = f(), 1, 2\n}\n", &[VoidUsedAsValue]);
}

#[test]
fn multi_value_as_multiple_names_in_list() {
    assert_kinds(&with_h("  a, b := h(), 1\n"), &[MultiValueInSingleContext]);
}

#[test]
fn returning_multi_value_call() {
    assert_clean(&format!("{H}func g() (int, string) {{\n  return h()\n}}\n"));
}

#[test]
fn returning_multi_value_from_single_result_function() {
    assert_kinds(&format!("{H}func g() int {{\n  return h()\n}}\n"), &[MultiValueInSingleContext]);
}

#[test]
fn return_count_mismatch() {
    let diags = diagnostics("func g() (int, int) {\n  return 1\n}\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, ResultCountMismatch);

    let diags = diagnostics("func g() {\n  return 1, 2\n}\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.starts_with("too many return values"), "{}", diags[0].message);

    let diags = diagnostics("func g() int {\n  return\n}\n");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.starts_with("not enough return values: have 0, want (int)"), "{}", diags[0].message);
}

#[test]
fn forwarded_as_sole_argument() {
    assert_clean(&format!("{H}func take(a int, b string) {{}}\nfunc g() {{\n  take(h())\n}}\n"));
}

#[test]
fn multi_value_among_other_arguments() {
    let diags = diagnostics(&with_h("  println(1, h())\n"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, MultiValueInSingleContext);
    assert!(diags[0].message.contains("argument 2 to println()"), "{}", diags[0].message);
}

#[test]
fn multi_value_statement() {
    assert_clean(&with_h("  h()\n"));
}

#[test]
fn named_results_bare_return() {
    assert_clean("func d() (x int, ok bool) {\n  x = 1\n  ok = true\n  return\n}\n");
}

#[test]
fn named_results_are_values_in_the_body() {
    assert_clean("func d() (n, m int) {\n  n = m + 1\n  println(n)\n  return n, m\n}\n");
    assert_kinds("func f() {}\nfunc d() (x int) {\n  x = f()\n  return\n}\n", &[VoidUsedAsValue]);
}

#[test]
fn named_results_explicit_count_still_checked() {
    let diags = diagnostics("func d() (x int, ok bool) {\n  return 1\n}\n");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, ResultCountMismatch);
}
