use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn cli_play_reads_line_commands() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.current_dir(dir.path())
        .args(["play", "--silent", "--bpm", "80"])
        .write_stdin("bpm 90\n+\nstatus\nwhat\nquit\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("91 BPM"))
        .stdout(predicate::str::contains("unknown command"))
        .stdout(predicate::str::contains("Session ended after 0 tick(s)"));
}

#[test]
fn cli_play_ticks_for_a_fixed_duration() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.current_dir(dir.path())
        .args(["play", "--silent", "--bpm", "600", "--max", "600", "--for-secs", "0.55"])
        .write_stdin("");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Ticking at 600 BPM"))
        .stdout(predicate::str::contains("BEAT"))
        .stdout(predicate::str::contains("Session ended after"));
}

#[test]
fn cli_play_rejects_bad_volume() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.current_dir(dir.path())
        .args(["play", "--silent", "--volume", "2"])
        .write_stdin("");
    cmd.assert().failure();
}

#[test]
fn cli_play_rejects_inverted_bounds() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.current_dir(dir.path())
        .args(["play", "--silent", "--min", "150", "--max", "100"])
        .write_stdin("");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid tempo settings"));
}

#[test]
fn cli_play_rejects_unrepresentable_duration() {
    let dir = tempdir().expect("create tempdir");

    for secs in ["1e30", "-1", "inf"] {
        let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
        cmd.current_dir(dir.path())
            .args(["play", "--silent", &format!("--for-secs={secs}")])
            .write_stdin("");
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Invalid duration"));
    }
}
