use super::*;
use crate::engine::audio::sink::{CountingSink, Ready};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::sleep;

struct UnpluggedSink {
    attempts: AtomicUsize,
}

impl AudioSink for UnpluggedSink {
    fn prepare(&self, resource: &ResourceLocator) -> Result<Ready, SinkUnavailable> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkUnavailable::new(resource, "no device"))
    }

    fn trigger(&self) {
        panic!("an unprepared sink must never be triggered");
    }
}

fn scheduler(sink: Arc<CountingSink>) -> TickScheduler {
    TickScheduler::new(
        sink,
        ResourceLocator::new("click.wav"),
        Arc::new(Logger::new()),
    )
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[tokio::test(start_paused = true)]
async fn test_start_ticks_every_period() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.start(ms(1000)).unwrap();
    assert_eq!(ticks.phase(), SchedulerPhase::Armed(ms(1000)));
    assert_eq!(sink.prepare_count(), 1);

    sleep(ms(500)).await;
    assert_eq!(sink.trigger_count(), 0);
    sleep(ms(550)).await;
    assert_eq!(sink.trigger_count(), 1);
    sleep(ms(1000)).await;
    assert_eq!(sink.trigger_count(), 2);
    assert_eq!(ticks.stats().ticks, 2);
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_immediate() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.start(ms(1000)).unwrap();
    sleep(ms(2500)).await;
    assert_eq!(sink.trigger_count(), 2);

    ticks.stop();
    assert_eq!(ticks.phase(), SchedulerPhase::Idle);
    sleep(ms(5000)).await;
    assert_eq!(sink.trigger_count(), 2);

    let stats = ticks.stats();
    assert_eq!((stats.armed, stats.cancelled), (1, 1));

    ticks.stop();
    assert_eq!(ticks.stats().cancelled, 1);
}

#[tokio::test(start_paused = true)]
async fn test_retune_waits_for_debounce_window() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.start(ms(1000)).unwrap();
    ticks.retune(ms(500));
    assert_eq!(ticks.phase(), SchedulerPhase::PendingRestart(ms(500)));
    assert_eq!(ticks.stats().armed, 1);

    sleep(ms(300)).await;
    assert_eq!(ticks.stats().armed, 1);

    sleep(ms(150)).await;
    assert_eq!(ticks.phase(), SchedulerPhase::Armed(ms(500)));
    let stats = ticks.stats();
    assert_eq!((stats.armed, stats.cancelled), (2, 1));
    assert_eq!(stats.retunes_applied, 1);

    // rearmed at 400ms, so ticks land at 900ms and 1400ms
    sleep(ms(1000)).await;
    assert_eq!(sink.trigger_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_retunes_coalesce_to_the_last_one() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.start(ms(1000)).unwrap();
    for interval in [900, 800, 700, 600, 550] {
        ticks.retune(ms(interval));
        sleep(ms(100)).await;
        assert_eq!(ticks.stats().armed, 1);
    }

    sleep(ms(350)).await;
    assert_eq!(ticks.phase(), SchedulerPhase::Armed(ms(550)));

    let stats = ticks.stats();
    assert_eq!(stats.armed, 2);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.retunes_requested, 5);
    assert_eq!(stats.retunes_applied, 1);
    assert_eq!(sink.trigger_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stop_drops_pending_retune() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.start(ms(1000)).unwrap();
    ticks.retune(ms(250));
    ticks.stop();

    sleep(ms(3000)).await;
    assert_eq!(ticks.phase(), SchedulerPhase::Idle);
    let stats = ticks.stats();
    assert_eq!((stats.armed, stats.cancelled), (1, 1));
    assert_eq!(stats.retunes_applied, 0);
    assert_eq!(sink.trigger_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_retune_while_idle_is_ignored() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.retune(ms(500));
    assert_eq!(ticks.phase(), SchedulerPhase::Idle);
    sleep(ms(1000)).await;
    assert_eq!(ticks.stats(), TimerStats::default());
}

#[tokio::test(start_paused = true)]
async fn test_start_replaces_running_timer() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());

    ticks.start(ms(1000)).unwrap();
    ticks.retune(ms(300));
    ticks.start(ms(500)).unwrap();
    assert_eq!(ticks.phase(), SchedulerPhase::Armed(ms(500)));
    assert_eq!(ticks.stats().live_timers(), 1);

    sleep(ms(1050)).await;
    assert_eq!(sink.trigger_count(), 2);
    assert_eq!(ticks.stats().retunes_applied, 0);
    assert_eq!(sink.prepare_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_sink_keeps_scheduler_idle() {
    let sink = Arc::new(UnpluggedSink {
        attempts: AtomicUsize::new(0),
    });
    let mut ticks = TickScheduler::new(
        sink.clone(),
        ResourceLocator::new("missing.wav"),
        Arc::new(Logger::new()),
    );

    let err = ticks.start(ms(1000)).unwrap_err();
    assert!(err.to_string().contains("missing.wav"));
    assert_eq!(ticks.phase(), SchedulerPhase::Idle);
    assert_eq!(ticks.stats().armed, 0);

    sleep(ms(5000)).await;
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);

    assert!(ticks.start(ms(1000)).is_err());
    assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_single_timer_invariant() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone()).with_debounce(ms(200));

    let script: [(u8, u64); 12] = [
        (0, 700),
        (1, 300),
        (1, 350),
        (0, 400),
        (2, 0),
        (1, 250),
        (0, 600),
        (1, 500),
        (1, 450),
        (0, 900),
        (1, 800),
        (2, 0),
    ];

    for (op, value) in script {
        match op {
            0 => ticks.start(ms(value)).unwrap(),
            1 => ticks.retune(ms(value)),
            _ => ticks.stop(),
        }
        assert!(ticks.stats().live_timers() <= 1);
        sleep(ms(130)).await;
        assert!(ticks.stats().live_timers() <= 1);
    }

    assert_eq!(ticks.stats().live_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_receive_ticks() {
    let sink = Arc::new(CountingSink::new());
    let mut ticks = scheduler(sink.clone());
    let mut events = ticks.subscribe();

    ticks.apply(TickSignal::Arm(ms(200))).unwrap();
    sleep(ms(450)).await;
    assert_eq!(events.try_recv(), Ok(TickEvent));
    assert_eq!(events.try_recv(), Ok(TickEvent));
    assert!(events.try_recv().is_err());

    ticks.apply(TickSignal::Cancel).unwrap();
    ticks.apply(TickSignal::None).unwrap();
    assert_eq!(ticks.phase(), SchedulerPhase::Idle);
}
