use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn prints_version() {
    Command::cargo_bin("feedline")
        .expect("feedline binary")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn prints_help() {
    Command::cargo_bin("feedline")
        .expect("feedline binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Feedline").and(predicate::str::contains("--version")));
}

#[test]
fn rejects_unknown_arguments() {
    Command::cargo_bin("feedline")
        .expect("feedline binary")
        .arg("--frobnicate")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown argument"));
}
