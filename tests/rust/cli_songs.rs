use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn songs(dir: &std::path::Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.current_dir(dir)
        .args(["songs", "--library", "songs.json"])
        .args(args);
    cmd
}

#[test]
fn cli_songs_add_list_move_remove() {
    let dir = tempdir().expect("create tempdir");

    songs(dir.path(), &["add", "Intro", "--bpm", "96"]).assert().success();
    songs(dir.path(), &["add", "Outro", "--bpm", "120"]).assert().success();
    assert!(dir.path().join("songs.json").is_file());

    songs(dir.path(), &["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Intro [96 BPM]"))
        .stdout(predicate::str::contains("2. Outro [120 BPM]"));

    songs(dir.path(), &["move", "2", "--to", "1"]).assert().success();
    songs(dir.path(), &["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Outro"))
        .stdout(predicate::str::contains("2. Intro"));

    songs(dir.path(), &["remove", "1"]).assert().success();
    songs(dir.path(), &["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Intro"))
        .stdout(predicate::str::contains("Outro").not());
}

#[test]
fn cli_songs_edit_rejects_long_tempo() {
    let dir = tempdir().expect("create tempdir");

    songs(dir.path(), &["add", "Ballad"]).assert().success();
    songs(dir.path(), &["edit", "1", "--bpm", "1000"]).assert().failure();
    songs(dir.path(), &["edit", "1", "--bpm", "72", "--title", "Slow ballad"])
        .assert()
        .success();
    songs(dir.path(), &["edit", "3", "--bpm", "80"]).assert().failure();

    songs(dir.path(), &["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Slow ballad [72 BPM]"));
}
