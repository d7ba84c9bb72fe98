// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! End-to-end tests for the `lam` binary.
//! Each test writes a source file to a temp dir, runs one command on it and
//! checks exit status and output.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

fn lam() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lam"));
    cmd.env("NO_COLOR", "1").env_remove("LAM_GATE").env_remove("FORCE_COLOR");
    cmd
}

fn fixture(source: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("main.lam");
    std::fs::write(&path, source).expect("failed to write fixture");
    (dir, path)
}

fn run(args: &[&str], source: &str) -> Output {
    let (_dir, path) = fixture(source);
    lam().args(args).arg(&path).output().expect("failed to run lam")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).to_string()
}

#[test]
fn lex_lists_tokens() {
    let out = run(&["lex"], "var answer = 42;\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("answer"), "{}", text);
    assert!(text.contains("Lex: 6 tokens OK"), "{}", text);
}

#[test]
fn parse_error_is_rendered_with_code() {
    let out = run(&["parse"], "print (1;\n");
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("error[E0100]"), "{}", err);
    assert!(err.contains("--> "), "{}", err);
    assert!(err.contains("Parse FAILED: 1 error"), "{}", err);
}

#[test]
fn resolve_prints_distances() {
    let out = run(&["resolve"], "var a = \"global\";\n{\n  var a = \"outer\";\n  { print a; }\n}\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Resolutions (1)"), "{}", text);
    assert!(text.contains("line 4"), "{}", text);
    assert!(text.trim_end().lines().any(|l| l.contains(" a ") && l.ends_with("-> 1")), "{}", text);
    assert!(text.contains("Resolve OK: 1 warning"), "{}", text);
    // The outer `a` is only read from the nested block.
    assert!(stderr(&out).contains("warning[E0202]"), "{}", stderr(&out));
}

#[test]
fn resolve_reports_self_reference() {
    let out = run(&["resolve"], "{ var a = a; }\n");
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("error[E0201]: cannot read local variable `a` in its own initializer"), "{}", err);
    assert!(err.contains("main.lam:1:11"), "{}", err);
}

#[test]
fn shadowing_self_reference_points_at_outer_declaration() {
    let out = run(&["resolve"], "{\n  var a = 1;\n  { var a = a; }\n  print a;\n}\n");
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("outer `a` declared here"), "{}", err);
    assert!(err.contains("= note: the outer `a` is shadowed by this declaration"), "{}", err);
}

#[test]
fn warnings_pass_default_gate() {
    let out = run(&["check"], "{ var unused = 1; }\nprint 2;\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("warning[E0202]"));
    assert!(stdout(&out).contains("Check OK: 1 warning"));
}

#[test]
fn strict_gate_blocks_on_warnings() {
    let source = "{ var unused = 1; }\nprint 2;\n";

    let out = run(&["check", "--gate", "any"], source);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Check BLOCKED"), "{}", stderr(&out));

    let (_dir, path) = fixture(source);
    let out = lam().env("LAM_GATE", "any").arg("check").arg(&path).output().unwrap();
    assert!(!out.status.success(), "LAM_GATE should apply");

    // The flag wins over the environment.
    let out = lam().env("LAM_GATE", "any").args(["check", "--gate=errors"]).arg(&path).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
}

#[test]
fn always_gate_lets_errors_through() {
    let out = run(&["check", "--gate", "always"], "return 1;\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("error[E0203]"));
}

#[test]
fn json_report_for_resolution_errors() {
    let out = run(&["resolve", "--format", "json"], "return 1;\n{ var y; }\n");
    assert!(!out.status.success());

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("stdout is JSON");
    assert_eq!(report["phase"], "resolve");
    assert_eq!(report["success"], false);
    assert_eq!(report["error_count"], 1);
    assert_eq!(report["warning_count"], 1);
    assert_eq!(report["diagnostics"][0]["code"], "E0203");
    assert_eq!(report["diagnostics"][0]["location"]["line"], 1);
    assert_eq!(report["diagnostics"][1]["code"], "E0202");
    assert_eq!(report["diagnostics"][1]["category"], "Resolution");
}

#[test]
fn max_depth_aborts_resolution() {
    let source = format!("print {}1{};\n", "(".repeat(30), ")".repeat(30));
    let out = run(&["resolve", "--max-depth", "8"], &source);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("error[E0204]"), "{}", err);
    assert!(err.contains("limit of 8 levels"), "{}", err);
}

#[test]
fn explain_known_and_unknown_codes() {
    let out = lam().args(["explain", "e0201"]).output().unwrap();
    assert!(out.status.success());
    assert!(stdout(&out).contains("E0201: variable read in its own initializer"), "{}", stdout(&out));

    let out = lam().args(["explain", "E0220"]).output().unwrap();
    assert!(!out.status.success());
    assert!(stderr(&out).contains("did you mean `E0200`?"), "{}", stderr(&out));

    let out = lam().arg("explain").output().unwrap();
    assert!(out.status.success());
    assert_eq!(stdout(&out).lines().count(), 11);
}

#[test]
fn unknown_command_suggests_closest() {
    let out = lam().arg("resolv").output().unwrap();
    assert!(!out.status.success());
    assert!(stderr(&out).contains("did you mean `resolve`?"), "{}", stderr(&out));
}

#[test]
fn bad_flags_are_rejected() {
    let out = run(&["check", "--gate", "sometimes"], "print 1;\n");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unknown execution gate `sometimes`"), "{}", stderr(&out));

    let out = run(&["check", "--max-depth", "0"], "print 1;\n");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("--max-depth expects a positive number"), "{}", stderr(&out));
}

#[test]
fn missing_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let out = lam().arg("check").arg(dir.path().join("absent.lam")).output().unwrap();
    assert!(!out.status.success());
    assert!(stderr(&out).contains("reading "), "{}", stderr(&out));
}
