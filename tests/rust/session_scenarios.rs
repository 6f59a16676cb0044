use std::sync::Arc;
use std::time::Duration;

use metronome::engine::audio::CountingSink;
use metronome::engine::SchedulerPhase;
use metronome::engine::tempo::interval_for;
use metronome::services::{MetronomeSession, SessionSettings};
use metronome::tools::logger::Logger;
use tokio::time::sleep;

fn session(bpm: f64, min_bpm: f64, max_bpm: f64, sink: Arc<CountingSink>) -> MetronomeSession {
    let settings = SessionSettings {
        bpm,
        min_bpm,
        max_bpm,
        ..SessionSettings::default()
    };
    MetronomeSession::new(settings, sink, Arc::new(Logger::new())).expect("valid settings")
}

#[tokio::test(start_paused = true)]
async fn start_then_stop_at_sixty_bpm() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(60.0, 20.0, 140.0, sink.clone());

    session.start_ticking().expect("sink ready");
    sleep(Duration::from_millis(1050)).await;
    assert_eq!(sink.trigger_count(), 1);

    session.stop_ticking();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(sink.trigger_count(), 1);
    assert_eq!(session.stats().live_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn stepping_down_keeps_a_single_timer() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(50.0, 10.0, 100.0, sink.clone());
    session.start_ticking().expect("sink ready");

    for step in 1..=5u64 {
        let before = sink.trigger_count();
        session.adjust_bpm(-1.0);
        sleep(Duration::from_millis(450)).await;

        let interval = interval_for(session.bpm());
        assert_eq!(session.phase(), SchedulerPhase::Armed(interval), "step {step}");
        sleep(interval * 2 + Duration::from_millis(100)).await;

        assert_eq!(sink.trigger_count() - before, 2, "step {step}");
        let stats = session.stats();
        assert_eq!(stats.armed, step + 1);
        assert_eq!(stats.cancelled, step);
        assert_eq!(stats.live_timers(), 1);
    }

    assert_eq!(session.bpm(), 45.0);
}
