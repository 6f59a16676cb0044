use thiserror::Error;

/// Coarse and fine steps used by the `+`/`-` and `++`/`--` line commands.
pub const FINE_STEP: f64 = 1.0;
pub const COARSE_STEP: f64 = 5.0;

/// A command typed on stdin while a session is running.
#[derive(Debug, Clone, PartialEq)]
pub enum LineCommand {
    Start,
    Stop,
    Toggle,
    Adjust(f64),
    SetBpm(f64),
    /// 1-based position in the song list.
    Song(usize),
    Status,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} ('{line}')")]
pub struct LineError {
    line: String,
    reason: &'static str,
}

pub fn parse_line(line: &str) -> Result<LineCommand, LineError> {
    let trimmed = line.trim();
    let err = |reason| LineError {
        line: trimmed.to_string(),
        reason,
    };

    let mut parts = trimmed.split_whitespace();
    let head = parts.next().unwrap_or("");
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(err("too many arguments"));
    }

    let command = match (head.to_ascii_lowercase().as_str(), arg) {
        ("", None) | ("toggle", None) | ("t", None) => LineCommand::Toggle,
        ("start", None) => LineCommand::Start,
        ("stop", None) => LineCommand::Stop,
        ("+", None) => LineCommand::Adjust(FINE_STEP),
        ("-", None) => LineCommand::Adjust(-FINE_STEP),
        ("++", None) => LineCommand::Adjust(COARSE_STEP),
        ("--", None) => LineCommand::Adjust(-COARSE_STEP),
        ("bpm", Some(value)) => match value.parse::<f64>() {
            Ok(bpm) if bpm.is_finite() => LineCommand::SetBpm(bpm),
            _ => return Err(err("bpm expects a number")),
        },
        ("song", Some(value)) => match value.parse::<usize>() {
            Ok(n) if n > 0 => LineCommand::Song(n),
            _ => return Err(err("song expects a position starting at 1")),
        },
        ("status", None) | ("s", None) => LineCommand::Status,
        ("quit", None) | ("q", None) | ("exit", None) => LineCommand::Quit,
        ("bpm", None) | ("song", None) => return Err(err("missing argument")),
        _ => return Err(err("unknown command")),
    };
    Ok(command)
}

#[cfg(test)]
#[path = "test_input.rs"]
mod tests;
