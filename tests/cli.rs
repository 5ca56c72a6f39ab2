//! Integration tests for the command line

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo_bin;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

const HTML: &str = concat!(
    "<script>\n",
    "el.className = `card ${theme.border}`;\n",
    "const p = 'C:\\\\tmp';\n",
    "</script>\n",
);

fn litescape() -> Command {
    Command::new(cargo_bin!("litescape"))
}

fn generate(dir: &Path) -> std::path::PathBuf {
    let input = dir.join("tv.html");
    let output = dir.join("tv.ts");
    fs::write(&input, HTML).unwrap();
    litescape()
        .arg("generate")
        .arg(&input)
        .arg(&output)
        .assert()
        .success();
    output
}

#[test]
fn generate_writes_escaped_const() {
    let dir = tempfile::tempdir().unwrap();
    let output = generate(dir.path());
    let ts = fs::read_to_string(&output).unwrap();
    assert!(ts.starts_with("export const tvHTML = `<script>\n"));
    assert!(ts.contains("el.className = \\`card \\${theme.border}\\`;"));
    assert!(ts.contains("'C:\\\\\\\\tmp'"));
    assert!(ts.ends_with("</script>\n`;\n"));
}

#[test]
fn generated_file_checks_clean_and_extracts() {
    let dir = tempfile::tempdir().unwrap();
    let output = generate(dir.path());
    litescape()
        .arg("check")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    litescape()
        .arg("extract")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::eq(HTML));
}

#[test]
fn check_reports_unescaped_occurrences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tv.ts");
    let ts = "export const tvHTML = `<p>\nx ${theme.glow} `y`\n</p>`;\n";
    fs::write(&path, ts).unwrap();
    litescape()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Found unescaped ${ at Line 2, Col 3: x ${theme.glow} `y`",
        ))
        .stdout(predicate::str::contains(
            "Found unescaped backtick at Line 2, Col 17: x ${theme.glow} `y`",
        ))
        .stdout(predicate::str::contains(
            "Found unescaped backtick at Line 2, Col 19: x ${theme.glow} `y`",
        ));
}

#[test]
fn fix_then_check_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tv.ts");
    let ts = "export const tvHTML = `<p>\nx ${theme.glow}\n\\`;\n";
    fs::write(&path, ts).unwrap();
    litescape().arg("fix").arg(&path).assert().success();
    let fixed = fs::read_to_string(&path).unwrap();
    assert_eq!(fixed, "export const tvHTML = `<p>\nx \\${theme.glow}\n`;\n");
    litescape()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn fix_without_literal_leaves_file_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tv.ts");
    fs::write(&path, "export const tvHTML = 1;\n").unwrap();
    litescape()
        .arg("fix")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no opening delimiter"));
    let ts = fs::read_to_string(&path).unwrap();
    assert_eq!(ts, "export const tvHTML = 1;\n");
}

#[test]
fn patch_applies_and_skips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tv.ts");
    fs::write(&path, "a\nglow ${theme.glow}\n").unwrap();
    litescape()
        .arg("patch")
        .arg(&path)
        .args(["--patch", "2:${theme.glow}=>\\${theme.glow}"])
        .args(["--patch", "1:zzz=>y"])
        .assert()
        .success();
    let ts = fs::read_to_string(&path).unwrap();
    assert_eq!(ts, "a\nglow \\${theme.glow}\n");
}

#[test]
fn patch_out_of_range_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tv.ts");
    fs::write(&path, "a ${x}\n").unwrap();
    litescape()
        .arg("patch")
        .arg(&path)
        .args(["--patch", "1:${x}=>\\${x}"])
        .args(["--patch", "1065:\\``;=>\\`;"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("past the end"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "a ${x}\n");
}

#[test]
fn padded_terminator_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tv.html");
    let output = dir.path().join("tv.ts");
    fs::write(&input, HTML).unwrap();
    litescape()
        .arg("generate")
        .arg(&input)
        .arg(&output)
        .args(["--terminator", "; "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("whitespace"));
    assert!(!output.exists());
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    litescape()
        .arg("generate")
        .arg(dir.path().join("nope.html"))
        .arg(dir.path().join("out.ts"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.html"));
    assert!(!dir.path().join("out.ts").exists());
}
