use super::*;

#[test]
fn test_button_commands() {
    assert_eq!(parse_line(""), Ok(LineCommand::Toggle));
    assert_eq!(parse_line("  toggle "), Ok(LineCommand::Toggle));
    assert_eq!(parse_line("START"), Ok(LineCommand::Start));
    assert_eq!(parse_line("stop"), Ok(LineCommand::Stop));
    assert_eq!(parse_line("q"), Ok(LineCommand::Quit));
}

#[test]
fn test_tempo_steps() {
    assert_eq!(parse_line("+"), Ok(LineCommand::Adjust(1.0)));
    assert_eq!(parse_line("-"), Ok(LineCommand::Adjust(-1.0)));
    assert_eq!(parse_line("++"), Ok(LineCommand::Adjust(5.0)));
    assert_eq!(parse_line("--"), Ok(LineCommand::Adjust(-5.0)));
    assert_eq!(parse_line("bpm 92.5"), Ok(LineCommand::SetBpm(92.5)));
}

#[test]
fn test_song_positions_start_at_one() {
    assert_eq!(parse_line("song 2"), Ok(LineCommand::Song(2)));
    assert!(parse_line("song 0").is_err());
    assert!(parse_line("song").is_err());
}

#[test]
fn test_rejects_garbage() {
    let err = parse_line("bpm fast").unwrap_err();
    assert_eq!(err.to_string(), "bpm expects a number ('bpm fast')");
    assert!(parse_line("bpm NaN").is_err());
    assert!(parse_line("bpm 1 2").is_err());
    assert!(parse_line("louder").is_err());
}
