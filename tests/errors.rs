mod common;

use std::io::Write;

use assert_cmd::Command;
use common::write_script;

#[test]
fn parse_error_exits_65_and_reports_line() {
    let script = write_script("print 1 +;");

    Command::cargo_bin("wisp")
        .unwrap()
        .arg(script.path())
        .assert()
        .code(65)
        .stderr(predicates::str::contains("[line 1] Error"));
}

#[test]
fn resolve_error_exits_65() {
    let script = write_script("return 1;");

    Command::cargo_bin("wisp")
        .unwrap()
        .arg(script.path())
        .assert()
        .code(65)
        .stderr(predicates::str::contains("Cannot return from top-level code."));
}

#[test]
fn runtime_type_error_exits_70() {
    let script = write_script("print \"a\" + 1;");

    Command::cargo_bin("wisp")
        .unwrap()
        .arg(script.path())
        .assert()
        .code(70)
        .stderr(predicates::str::contains("must be"));
}

#[test]
fn undefined_variable_is_a_runtime_error() {
    let script = write_script("print undeclared;");

    Command::cargo_bin("wisp")
        .unwrap()
        .arg(script.path())
        .assert()
        .code(70)
        .stderr(predicates::str::contains("Undefined variable"));
}

#[test]
fn well_formed_script_exits_zero_and_prints_nothing_to_stderr() {
    let mut script = tempfile::Builder::new().suffix(".wisp").tempfile().unwrap();
    script.write_all(b"print \"ok\";").unwrap();

    Command::cargo_bin("wisp")
        .unwrap()
        .arg(script.path())
        .assert()
        .code(0)
        .stdout("ok\n")
        .stderr("");
}
