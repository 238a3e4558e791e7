//! Runs the fixture corpus under tests/fixtures.
mod common;

use std::path::{Path, PathBuf};

use common::voidcheck;
use voidcheck::config::Config;
use voidcheck::corpus::{check_fixture, collect_fixtures, run_corpus};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

#[test]
fn whole_corpus_passes() {
    let report = run_corpus(&fixtures_dir(), &Config::default()).unwrap();
    assert!(report.is_success(), "failures: {:#?}", report.failures);
    assert_eq!(report.total(), collect_fixtures(&fixtures_dir()).unwrap().len());
    assert!(report.total() >= 6);
}

#[test]
fn void_fixture_is_rejected_on_marked_line() {
    let dir = fixtures_dir();
    let path = dir.join("invalid-type").join("goto_4_2.go");
    check_fixture(&dir, &path, &Config::default()).unwrap();

    let source = std::fs::read_to_string(&path).unwrap();
    let diags = voidcheck::check_source(&source).unwrap();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].line(), 9);
}

#[test]
fn corpus_in_parallel() {
    let mut config = Config::default();
    config.check.jobs = 4;
    let report = run_corpus(&fixtures_dir(), &config).unwrap();
    assert!(report.is_success(), "failures: {:#?}", report.failures);
}

#[test]
fn corpus_command() {
    let output = voidcheck().arg("corpus").arg(fixtures_dir()).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "{stderr}");
    assert!(stderr.contains("0 failed"), "{stderr}");
}

#[test]
fn corpus_command_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let valid = dir.path().join("valid");
    std::fs::create_dir_all(&valid).unwrap();
    std::fs::write(valid.join("bad.go"), "package main\nfunc f() {}\nvar x = f()\n").unwrap();

    let output = voidcheck().arg("corpus").arg(dir.path()).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("FAIL"), "{stderr}");
    assert!(stderr.contains("1 failed"), "{stderr}");
}

#[test]
fn custom_marker_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let invalid = dir.path().join("invalid-type");
    std::fs::create_dir_all(&invalid).unwrap();
    std::fs::write(
        invalid.join("a.go"),
        "package main\nfunc f() {}\nfunc g() {\n  var x = f() // want: void\n  f() // want: nothing here\n}\n",
    )
    .unwrap();

    let report = run_corpus(dir.path(), &Config::default()).unwrap();
    assert!(report.is_success());

    let mut config = Config::default();
    config.corpus.marker = "want:".to_string();
    let report = run_corpus(dir.path(), &config).unwrap();
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].reason.contains("line 5"), "{}", report.failures[0]);
}
