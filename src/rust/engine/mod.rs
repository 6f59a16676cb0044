pub mod audio;
pub mod error;
pub mod scheduler;
pub mod tempo;

pub use error::MetronomeError;
pub use scheduler::{SchedulerPhase, TickEvent, TickScheduler, TimerStats};
pub use tempo::{BpmBounds, BpmState, TempoConfigError, TickSignal};
