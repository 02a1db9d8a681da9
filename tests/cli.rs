use assert_cmd::Command;

#[test]
fn too_many_arguments_exits_64_with_usage_message() {
    Command::cargo_bin("wisp")
        .unwrap()
        .arg("one.wisp")
        .arg("two.wisp")
        .assert()
        .code(64)
        .stderr(predicates::str::contains("Usage: wisp"));
}

#[test]
fn missing_script_file_exits_2() {
    Command::cargo_bin("wisp")
        .unwrap()
        .arg("/no/such/path/does-not-exist.wisp")
        .assert()
        .code(2)
        .stderr(predicates::str::contains("Failed to read"));
}
