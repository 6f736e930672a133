#![allow(clippy::unwrap_used)]
// CLI surface smoke tests. Anything that needs a live panel is covered by
// the wiremock suites in nodepulse-api and nodepulse-core; these only pin
// the argument surface and offline behaviors.

use assert_cmd::Command;
use predicates::prelude::*;

fn nodepulse() -> Command {
    Command::cargo_bin("nodepulse").unwrap()
}

#[test]
fn help_lists_the_command_tree() {
    nodepulse()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes"))
        .stdout(predicate::str::contains("speedtest"))
        .stdout(predicate::str::contains("settings"))
        .stdout(predicate::str::contains("dashboard"));
}

#[test]
fn version_prints() {
    nodepulse()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("nodepulse"));
}

#[test]
fn no_args_shows_usage() {
    nodepulse()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn missing_panel_url_is_a_usage_error() {
    nodepulse()
        .env_remove("NODEPULSE_PANEL")
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .args(["nodes", "list"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("panel"));
}

#[test]
fn config_path_prints_a_path() {
    nodepulse()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn settings_set_requires_key_value_pairs() {
    nodepulse()
        .args(["settings", "set"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage").or(predicate::str::contains("required")));
}

#[test]
fn completions_generate_for_bash() {
    nodepulse()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nodepulse"));
}
