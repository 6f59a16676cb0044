use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn cli_prints_help() {
    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("metronome"))
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("songs"));
}

#[test]
fn cli_play_help_lists_tempo_flags() {
    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.args(["play", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--bpm"))
        .stdout(predicate::str::contains("--debounce-ms"));
}
