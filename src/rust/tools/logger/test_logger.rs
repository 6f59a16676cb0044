use super::*;

#[test]
fn test_debug_lines_need_verbose() {
    let quiet = Logger::new();
    assert!(!quiet.enabled(LogLevel::Debug));
    assert!(quiet.enabled(LogLevel::Beat));
    assert!(quiet.enabled(LogLevel::Error));

    let verbose = Logger::verbose();
    assert!(verbose.is_verbose());
    assert!(verbose.enabled(LogLevel::Debug));
}

#[cfg(feature = "cli")]
#[test]
fn test_colored_line_carries_label_and_message() {
    let line = Logger::new().render_colored_line(LogLevel::Beat, "1");
    assert!(line.contains("Metronome"));
    assert!(line.contains("[BEAT]"));
    assert!(line.ends_with(" 1"));
}
