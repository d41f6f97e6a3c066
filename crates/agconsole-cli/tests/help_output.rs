use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn agconsole() -> Command {
    Command::cargo_bin("agconsole").unwrap()
}

#[test]
fn test_main_help_lists_commands() {
    agconsole()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bots"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn test_language_flag_accepts_aliases() {
    agconsole()
        .args(["--lang", "chinese", "replay", "--help"])
        .assert()
        .success();

    agconsole()
        .args(["--lang", "fr", "replay", "missing.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'fr'"));
}

#[test]
fn test_command_is_required() {
    agconsole().assert().failure();
}
