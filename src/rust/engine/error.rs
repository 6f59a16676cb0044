use thiserror::Error;

use crate::engine::audio::sink::SinkUnavailable;
use crate::engine::tempo::TempoConfigError;

/// Everything an intent on the metronome can report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetronomeError {
    #[error("invalid tempo configuration: {0}")]
    Config(#[from] TempoConfigError),
    #[error(transparent)]
    SinkUnavailable(#[from] SinkUnavailable),
}
