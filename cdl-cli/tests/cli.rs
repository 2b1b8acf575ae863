//! CLI smoke tests exercising the built binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn lex_reads_stdin_and_prints_tokens() {
    Command::cargo_bin("cdl")
        .unwrap()
        .args(["lex", "-"])
        .write_stdin("config hub")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"identifier\""))
        .stdout(predicate::str::contains("\"config\""));
}

#[test]
fn parse_reports_diagnostics_inside_payload() {
    Command::cargo_bin("cdl")
        .unwrap()
        .args(["parse", "-"])
        .write_stdin("config hub {\n    logo: \"unterminated")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"diagnostics\""))
        .stdout(predicate::str::contains("unterminated string literal"));
}

#[test]
fn compile_runs_full_pipeline_by_default() {
    Command::cargo_bin("cdl")
        .unwrap()
        .args(["compile", "-"])
        .write_stdin("custom properties #cr {\n    foo: 1\n}\nvalue: @cr.foo\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve-references"))
        .stdout(predicate::str::contains("\"resolved\": \"cr.foo\""));
}

#[test]
fn missing_file_fails_with_error() {
    Command::cargo_bin("cdl")
        .unwrap()
        .args(["lex", "/no/such/file.cdl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error reading"));
}

#[test]
fn list_stages_names_the_builtins() {
    Command::cargo_bin("cdl")
        .unwrap()
        .arg("--list-stages")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve-references"))
        .stdout(predicate::str::contains("validate-properties"));
}
