/// Tick scheduler - owns the single periodic timer and the debounced restart buffer
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::engine::audio::sink::{AudioSink, ResourceLocator, SinkUnavailable};
use crate::engine::tempo::TickSignal;
use crate::tools::logger::Logger;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

/// Shortest period a timer is armed with; tokio intervals reject a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);
const TICK_CHANNEL_CAPACITY: usize = 64;

/// Emitted once per period while a timer is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Armed(Duration),
    /// A restart with this interval is waiting out the debounce window; the
    /// previous timer keeps ticking meanwhile.
    PendingRestart(Duration),
}

/// Counters kept for every scheduler. `armed - cancelled` is the number of
/// live timers and never exceeds one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerStats {
    pub armed: u64,
    pub cancelled: u64,
    pub ticks: u64,
    pub retunes_requested: u64,
    pub retunes_applied: u64,
}

impl TimerStats {
    pub fn live_timers(&self) -> u64 {
        self.armed - self.cancelled
    }
}

struct ActiveTimer {
    interval: Duration,
    generation: u64,
    task: JoinHandle<()>,
}

struct PendingRestart {
    interval: Duration,
    token: u64,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct SchedulerState {
    next_generation: u64,
    next_token: u64,
    timer: Option<ActiveTimer>,
    pending: Option<PendingRestart>,
    stats: TimerStats,
}

impl SchedulerState {
    fn is_current(&self, generation: u64) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| timer.generation == generation)
    }
}

struct SchedulerCore {
    state: Mutex<SchedulerState>,
    sink: Arc<dyn AudioSink>,
    ticks: broadcast::Sender<TickEvent>,
    logger: Arc<Logger>,
}

impl SchedulerCore {
    fn lock(&self) -> MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn arm(self: &Arc<Self>, state: &mut SchedulerState, interval: Duration) {
        state.next_generation += 1;
        let generation = state.next_generation;
        let period = interval.max(MIN_PERIOD);
        let core = Arc::clone(self);
        let task = tokio::spawn(async move { core.run_timer(generation, period).await });

        state.timer = Some(ActiveTimer {
            interval,
            generation,
            task,
        });
        state.stats.armed += 1;
        self.logger.debug(format!(
            "Armed timer #{generation} every {:.1}ms",
            interval.as_secs_f64() * 1000.0
        ));
    }

    fn cancel_timer(&self, state: &mut SchedulerState) {
        if let Some(timer) = state.timer.take() {
            timer.task.abort();
            state.stats.cancelled += 1;
            self.logger
                .debug(format!("Cancelled timer #{}", timer.generation));
        }
    }

    fn drop_pending(&self, state: &mut SchedulerState) {
        if let Some(pending) = state.pending.take() {
            pending.task.abort();
            self.logger.debug(format!(
                "Dropped pending retune to {:.1}ms",
                pending.interval.as_secs_f64() * 1000.0
            ));
        }
    }

    /// Runs when a debounce deadline expires. Only the latest request may fire.
    fn apply_pending(self: &Arc<Self>, token: u64) {
        let mut state = self.lock();
        let pending = match state.pending.take() {
            Some(pending) if pending.token == token => pending,
            other => {
                state.pending = other;
                return;
            }
        };

        self.cancel_timer(&mut state);
        self.arm(&mut state, pending.interval);
        state.stats.retunes_applied += 1;
    }

    async fn run_timer(self: Arc<Self>, generation: u64, period: Duration) {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.emit(generation) {
                break;
            }
        }
    }

    /// Triggers the sink unless this timer has been superseded. The check and
    /// the trigger happen under the state lock, the same lock cancellation takes.
    fn emit(&self, generation: u64) -> bool {
        let mut state = self.lock();
        if !state.is_current(generation) {
            return false;
        }

        state.stats.ticks += 1;
        self.sink.trigger();
        let _ = self.ticks.send(TickEvent);
        true
    }
}

/// Owns at most one periodic timer and applies tempo signals to it.
///
/// All methods are synchronous and must be called from inside a tokio
/// runtime: timers and debounce deadlines are spawned tasks.
pub struct TickScheduler {
    core: Arc<SchedulerCore>,
    resource: ResourceLocator,
    debounce: Duration,
    prepared: bool,
}

impl TickScheduler {
    pub fn new(sink: Arc<dyn AudioSink>, resource: ResourceLocator, logger: Arc<Logger>) -> Self {
        let (ticks, _) = broadcast::channel(TICK_CHANNEL_CAPACITY);
        Self {
            core: Arc::new(SchedulerCore {
                state: Mutex::new(SchedulerState::default()),
                sink,
                ticks,
                logger,
            }),
            resource,
            debounce: DEFAULT_DEBOUNCE,
            prepared: false,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickEvent> {
        self.core.ticks.subscribe()
    }

    pub fn phase(&self) -> SchedulerPhase {
        let state = self.core.lock();
        match (&state.timer, &state.pending) {
            (_, Some(pending)) => SchedulerPhase::PendingRestart(pending.interval),
            (Some(timer), None) => SchedulerPhase::Armed(timer.interval),
            (None, None) => SchedulerPhase::Idle,
        }
    }

    pub fn stats(&self) -> TimerStats {
        self.core.lock().stats
    }

    pub fn apply(&mut self, signal: TickSignal) -> Result<(), SinkUnavailable> {
        match signal {
            TickSignal::None => Ok(()),
            TickSignal::Arm(interval) => self.start(interval),
            TickSignal::Retune(interval) => {
                self.retune(interval);
                Ok(())
            }
            TickSignal::Cancel => {
                self.stop();
                Ok(())
            }
        }
    }

    /// Arms a timer right away, replacing any running timer or pending restart.
    /// The sink is prepared on the first successful start of the session.
    pub fn start(&mut self, interval: Duration) -> Result<(), SinkUnavailable> {
        if !self.prepared {
            if let Err(err) = self.core.sink.prepare(&self.resource) {
                self.core.logger.error(format!("Cannot start ticking: {err}"));
                return Err(err);
            }
            self.prepared = true;
        }

        let mut state = self.core.lock();
        self.core.drop_pending(&mut state);
        self.core.cancel_timer(&mut state);
        self.core.arm(&mut state, interval);
        Ok(())
    }

    /// Cancels everything immediately. No tick is emitted once this returns.
    pub fn stop(&mut self) {
        let mut state = self.core.lock();
        self.core.drop_pending(&mut state);
        self.core.cancel_timer(&mut state);
    }

    /// Buffers a restart with a new interval (trailing-edge debounce). Ignored
    /// while idle.
    pub fn retune(&mut self, interval: Duration) {
        let mut state = self.core.lock();
        if state.timer.is_none() {
            self.core.logger.debug("Retune ignored: no timer armed");
            return;
        }

        state.stats.retunes_requested += 1;
        if let Some(previous) = state.pending.take() {
            previous.task.abort();
            self.core.logger.debug(format!(
                "Retune to {:.1}ms superseded",
                previous.interval.as_secs_f64() * 1000.0
            ));
        }

        state.next_token += 1;
        let token = state.next_token;
        let core = Arc::clone(&self.core);
        let debounce = self.debounce;
        let task = tokio::spawn(async move {
            time::sleep(debounce).await;
            core.apply_pending(token);
        });

        state.pending = Some(PendingRestart {
            interval,
            token,
            task,
        });
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        let mut state = self.core.lock();
        if let Some(pending) = state.pending.take() {
            pending.task.abort();
        }
        if let Some(timer) = state.timer.take() {
            timer.task.abort();
        }
    }
}

#[cfg(test)]
#[path = "test_scheduler.rs"]
mod tests;
