use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::engine::audio::sink::{AudioSink, ResourceLocator};
use crate::engine::error::MetronomeError;
use crate::engine::scheduler::{DEFAULT_DEBOUNCE, SchedulerPhase, TickEvent, TickScheduler, TimerStats};
use crate::engine::tempo::{BpmState, DEFAULT_BPM, DEFAULT_MAX_BPM, DEFAULT_MIN_BPM, TickSignal};
use crate::services::library::Song;
use crate::tools::logger::Logger;

pub const DEFAULT_CLICK_FILE: &str = "click.wav";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub debounce: Duration,
    pub click: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            min_bpm: DEFAULT_MIN_BPM,
            max_bpm: DEFAULT_MAX_BPM,
            debounce: DEFAULT_DEBOUNCE,
            click: PathBuf::from(DEFAULT_CLICK_FILE),
        }
    }
}

/// One metronome session: the tempo state plus the scheduler that follows it.
///
/// `start_ticking`, `stop_ticking`, `set_bpm` and `adjust_bpm` are the only
/// ways in; each updates the tempo first and then forwards the resulting
/// signal to the scheduler.
pub struct MetronomeSession {
    tempo: BpmState,
    scheduler: TickScheduler,
    logger: Arc<Logger>,
}

impl MetronomeSession {
    pub fn new(
        settings: SessionSettings,
        sink: Arc<dyn AudioSink>,
        logger: Arc<Logger>,
    ) -> Result<Self, MetronomeError> {
        let tempo = BpmState::new(settings.bpm, settings.min_bpm, settings.max_bpm, false)?;
        let scheduler = TickScheduler::new(sink, ResourceLocator::new(settings.click), logger.clone())
            .with_debounce(settings.debounce);

        Ok(Self {
            tempo,
            scheduler,
            logger,
        })
    }

    pub fn bpm(&self) -> f64 {
        self.tempo.bpm()
    }

    pub fn min_bpm(&self) -> f64 {
        self.tempo.min_bpm()
    }

    pub fn max_bpm(&self) -> f64 {
        self.tempo.max_bpm()
    }

    pub fn is_ticking(&self) -> bool {
        self.tempo.is_ticking()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tempo.tick_interval()
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.scheduler.phase()
    }

    pub fn stats(&self) -> TimerStats {
        self.scheduler.stats()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickEvent> {
        self.scheduler.subscribe()
    }

    /// Starts (or restarts) ticking at the current tempo. When the sink cannot
    /// be prepared nothing ticks and the session stays stopped.
    pub fn start_ticking(&mut self) -> Result<(), MetronomeError> {
        let signal = self.tempo.start_ticking();
        if let Err(err) = self.scheduler.apply(signal) {
            self.tempo.stop_ticking();
            return Err(err.into());
        }
        self.logger
            .action(format!("Ticking at {} BPM", format_bpm(self.tempo.bpm())));
        Ok(())
    }

    pub fn stop_ticking(&mut self) {
        let signal = self.tempo.stop_ticking();
        self.follow(signal);
        self.logger.info("Stopped.");
    }

    /// Start/stop button behaviour. Returns whether the metronome now ticks.
    pub fn toggle_ticking(&mut self) -> Result<bool, MetronomeError> {
        if self.tempo.is_ticking() {
            self.stop_ticking();
        } else {
            self.start_ticking()?;
        }
        Ok(self.tempo.is_ticking())
    }

    pub fn set_bpm(&mut self, value: f64) {
        let signal = self.tempo.set_bpm(value);
        self.follow(signal);
    }

    pub fn adjust_bpm(&mut self, delta: f64) {
        let signal = self.tempo.adjust_bpm(delta);
        self.follow(signal);
    }

    /// Uses the song's tempo, if it has one.
    pub fn apply_song(&mut self, song: &Song) -> bool {
        match song.tempo() {
            Some(bpm) => {
                self.set_bpm(bpm);
                self.logger.info(format!(
                    "Song '{}' -> {} BPM",
                    song.title,
                    format_bpm(self.tempo.bpm())
                ));
                true
            }
            None => false,
        }
    }

    /// Tempo changes and stops never need the sink, so they cannot fail.
    fn follow(&mut self, signal: TickSignal) {
        if let Err(err) = self.scheduler.apply(signal) {
            self.logger.error(format!("Unexpected scheduler failure: {err}"));
        }
    }
}

pub fn format_bpm(bpm: f64) -> String {
    if bpm.fract() == 0.0 {
        format!("{bpm:.0}")
    } else {
        format!("{bpm:.1}")
    }
}

#[cfg(test)]
#[path = "test_session.rs"]
mod tests;
