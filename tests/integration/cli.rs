//! End-to-end runs of the `voidcheck` binary.
mod common;

use common::{run_check, voidcheck};

const VOID_FIXTURE: &str = "package main\nfunc f() {}\nfunc g() {\n  var x = f()\n}\n";

#[test]
fn text_output_names_kind_and_callee() {
    let output = run_check(VOID_FIXTURE, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("VoidUsedAsValue"), "{stderr}");
    assert!(stderr.contains("f() (no value) used as value"), "{stderr}");
    assert!(stderr.contains("1 diagnostic(s)"), "{stderr}");
}

#[test]
fn clean_file_exits_zero() {
    let output = run_check("package main\nfunc f() {}\nfunc g() {\n  f()\n}\n", &[]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(output.stderr.is_empty());
}

#[test]
fn json_output() {
    let output = run_check(VOID_FIXTURE, &["--format", "json"]);
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let diags = json[0]["diagnostics"].as_array().unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0]["kind"], "VoidUsedAsValue");
    assert_eq!(diags[0]["position"]["line"], 4);
    assert!(json[0].get("error").is_none());
}

#[test]
fn syntax_error_exits_nonzero() {
    let output = run_check("package main\nfunc g( {\n}\n", &["--format", "json"]);
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json[0]["error"].as_str().unwrap().starts_with("Syntax error"));
}

#[test]
fn selector_is_a_syntax_error() {
    let output = run_check("package main\nfunc g() {\n  fmt.Println(1)\n}\n", &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("selector expressions are not supported"), "{stderr}");
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = voidcheck().arg("check").arg(dir.path().join("nope.go")).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not read file"));
}

#[test]
fn jobs_flag_gives_same_json() {
    let src = "package main\nfunc f() {}\nfunc a() {\n  var x = f()\n}\nfunc b() {\n  switch f() {\n  }\n}\nfunc c() {\n  y := nope()\n}\n";
    let seq = run_check(src, &["--format", "json"]);
    let par = run_check(src, &["--format", "json", "--jobs", "3"]);
    // Paths differ between temp dirs; compare diagnostics only.
    let seq: serde_json::Value = serde_json::from_slice(&seq.stdout).unwrap();
    let par: serde_json::Value = serde_json::from_slice(&par.stdout).unwrap();
    assert_eq!(seq[0]["diagnostics"], par[0]["diagnostics"]);
    assert_eq!(seq[0]["diagnostics"].as_array().unwrap().len(), 3);
}

#[test]
fn config_disables_builtins() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("voidcheck.toml"), "[check]\nbuiltins = false\n").unwrap();
    let src_path = dir.path().join("a.go");
    std::fs::write(&src_path, "package main\nfunc g() {\n  println(1)\n}\n").unwrap();

    let output = voidcheck().current_dir(dir.path()).arg("check").arg(&src_path).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("undefined: println"));

    let output = voidcheck()
        .current_dir(dir.path())
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("check")
        .arg(&src_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config error"));
}

#[test]
fn invalid_config_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("voidcheck.toml"), "[check]\njobs = \"many\"\n").unwrap();
    let src_path = dir.path().join("a.go");
    std::fs::write(&src_path, "package main\n").unwrap();

    let output = voidcheck().current_dir(dir.path()).arg("check").arg(&src_path).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid syntax"));
}
