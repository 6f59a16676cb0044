use super::*;
use tempfile::tempdir;

#[test]
fn test_missing_config_writes_defaults() {
    let dir = tempdir().expect("create tempdir");
    let config = AppConfig::load(dir.path()).expect("load defaults");

    assert_eq!(config.tempo.bpm, 70.0);
    assert_eq!(config.tempo.min_bpm, 20.0);
    assert_eq!(config.tempo.max_bpm, 140.0);
    assert_eq!(config.debounce(), Duration::from_millis(400));
    assert!(dir.path().join(JSON_CONFIG).is_file());

    let reloaded = AppConfig::load(dir.path()).expect("reload");
    assert_eq!(reloaded.tempo.bpm, config.tempo.bpm);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let dir = tempdir().expect("create tempdir");
    fs::write(
        dir.path().join(TOML_CONFIG),
        "[tempo]\nbpm = 96.0\nautostart = true\n\n[audio]\nvolume = 3.0\n",
    )
    .unwrap();

    let config = AppConfig::load(dir.path()).expect("load toml");
    assert_eq!(config.tempo.bpm, 96.0);
    assert!(config.tempo.autostart);
    assert_eq!(config.tempo.max_bpm, 140.0);
    assert_eq!(config.volume(), 1.0);
    assert!(!dir.path().join(JSON_CONFIG).exists());
}

#[test]
fn test_dot_config_sniffs_format() {
    let dir = tempdir().expect("create tempdir");
    fs::write(dir.path().join(DOT_CONFIG), r#"{ "tempo": { "min_bpm": 30.0 } }"#).unwrap();
    let config = AppConfig::load(dir.path()).expect("load json dot config");
    assert_eq!(config.tempo.min_bpm, 30.0);

    fs::write(dir.path().join(DOT_CONFIG), "[tempo]\nmin_bpm = 40.0\n").unwrap();
    let config = AppConfig::load(dir.path()).expect("load toml dot config");
    assert_eq!(config.tempo.min_bpm, 40.0);
}

#[test]
fn test_priority_prefers_toml() {
    let candidates = vec![
        PathBuf::from("x/metronome.json"),
        PathBuf::from("x/.metronome"),
        PathBuf::from("x/metronome.toml"),
    ];
    assert_eq!(pick_config_priority(&candidates), PathBuf::from("x/metronome.toml"));
}

#[test]
fn test_session_settings_resolve_paths() {
    let mut config = AppConfig::default();
    config.library.path = Some(PathBuf::from("songs.json"));
    config.tempo.debounce_ms = 250;

    let settings = config.session_settings("/tmp/project");
    assert_eq!(settings.click, PathBuf::from("/tmp/project/click.wav"));
    assert_eq!(settings.debounce, Duration::from_millis(250));
    assert_eq!(
        config.library_path("/tmp/project"),
        PathBuf::from("/tmp/project/songs.json")
    );
}

#[test]
fn test_invalid_json_is_reported() {
    let dir = tempdir().expect("create tempdir");
    fs::write(dir.path().join(JSON_CONFIG), "{ nope").unwrap();
    let err = AppConfig::load(dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("invalid JSON config"));
}
