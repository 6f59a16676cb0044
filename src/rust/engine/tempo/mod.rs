/// Tempo state: the current BPM, its bounds and whether the metronome is ticking.
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BPM: f64 = 70.0;
pub const DEFAULT_MIN_BPM: f64 = 20.0;
pub const DEFAULT_MAX_BPM: f64 = 140.0;

/// Longest tick interval the bounds may produce.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TempoConfigError {
    #[error("minimum BPM must be greater than zero (got {min})")]
    NonPositiveMinimum { min: f64 },
    #[error("minimum BPM {min} is greater than maximum BPM {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("minimum BPM {min} gives a tick interval longer than a day")]
    MinimumTooSlow { min: f64 },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
}

/// Inclusive BPM range. Always satisfies `0 < min <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmBounds {
    min: f64,
    max: f64,
}

impl BpmBounds {
    pub fn new(min: f64, max: f64) -> Result<Self, TempoConfigError> {
        if !min.is_finite() {
            return Err(TempoConfigError::NotFinite { field: "min_bpm" });
        }
        if !max.is_finite() {
            return Err(TempoConfigError::NotFinite { field: "max_bpm" });
        }
        if min <= 0.0 {
            return Err(TempoConfigError::NonPositiveMinimum { min });
        }
        if min > max {
            return Err(TempoConfigError::InvertedBounds { min, max });
        }
        match Duration::try_from_secs_f64(60.0 / min) {
            Ok(interval) if interval <= MAX_TICK_INTERVAL => {}
            _ => return Err(TempoConfigError::MinimumTooSlow { min }),
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for BpmBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_BPM,
            max: DEFAULT_MAX_BPM,
        }
    }
}

/// What the scheduler has to do after a tempo intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSignal {
    /// Nothing observable changed.
    None,
    /// Arm a timer right away with this period.
    Arm(Duration),
    /// The period changed while ticking; restart once the debounce window is quiet.
    Retune(Duration),
    /// Cancel the running timer immediately.
    Cancel,
}

impl TickSignal {
    pub fn is_none(&self) -> bool {
        matches!(self, TickSignal::None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BpmState {
    bpm: f64,
    bounds: BpmBounds,
    is_ticking: bool,
}

impl BpmState {
    /// Builds a state from raw configuration. The initial BPM is clamped into the bounds.
    pub fn new(bpm: f64, min_bpm: f64, max_bpm: f64, is_ticking: bool) -> Result<Self, TempoConfigError> {
        let bounds = BpmBounds::new(min_bpm, max_bpm)?;
        Self::with_bounds(bpm, bounds, is_ticking)
    }

    pub fn with_bounds(bpm: f64, bounds: BpmBounds, is_ticking: bool) -> Result<Self, TempoConfigError> {
        if !bpm.is_finite() {
            return Err(TempoConfigError::NotFinite { field: "bpm" });
        }
        Ok(Self {
            bpm: bounds.clamp(bpm),
            bounds,
            is_ticking,
        })
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn min_bpm(&self) -> f64 {
        self.bounds.min()
    }

    pub fn max_bpm(&self) -> f64 {
        self.bounds.max()
    }

    pub fn bounds(&self) -> BpmBounds {
        self.bounds
    }

    pub fn is_ticking(&self) -> bool {
        self.is_ticking
    }

    /// Seconds between two ticks, `60 / bpm`.
    pub fn tick_interval(&self) -> Duration {
        interval_for(self.bpm)
    }

    pub fn set_bpm(&mut self, value: f64) -> TickSignal {
        if value.is_nan() {
            return TickSignal::None;
        }

        let clamped = self.bounds.clamp(value);
        if clamped == self.bpm {
            return TickSignal::None;
        }

        self.bpm = clamped;
        if self.is_ticking {
            TickSignal::Retune(self.tick_interval())
        } else {
            TickSignal::None
        }
    }

    pub fn adjust_bpm(&mut self, delta: f64) -> TickSignal {
        self.set_bpm(self.bpm + delta)
    }

    pub fn start_ticking(&mut self) -> TickSignal {
        self.is_ticking = true;
        TickSignal::Arm(self.tick_interval())
    }

    pub fn stop_ticking(&mut self) -> TickSignal {
        self.is_ticking = false;
        TickSignal::Cancel
    }
}

impl Default for BpmState {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            bounds: BpmBounds::default(),
            is_ticking: false,
        }
    }
}

pub fn interval_for(bpm: f64) -> Duration {
    Duration::from_secs_f64(60.0 / bpm)
}

#[cfg(test)]
#[path = "test_tempo.rs"]
mod tests;
