use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn cli_init_writes_config_and_click() {
    let dir = tempdir().expect("create tempdir");

    let mut cmd = Command::cargo_bin("metronome").expect("binary not found");
    cmd.current_dir(dir.path()).arg("init");
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Next steps:"))
        .stdout(predicates::str::contains("metronome play --autostart"));

    assert!(dir.path().join("metronome.json").is_file());
    let click = std::fs::metadata(dir.path().join("click.wav")).expect("click.wav written");
    assert!(click.len() > 44);

    // A second run refuses to overwrite without --force.
    let mut again = Command::cargo_bin("metronome").expect("binary not found");
    again.current_dir(dir.path()).arg("init");
    again.assert().failure();

    let mut forced = Command::cargo_bin("metronome").expect("binary not found");
    forced.current_dir(dir.path()).args(["init", "--force"]);
    forced.assert().success();
}
