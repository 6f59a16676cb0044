use super::*;
use crate::engine::audio::sink::{CountingSink, Ready, SinkUnavailable};
use crate::engine::tempo::{TempoConfigError, interval_for};
use tokio::time::sleep;
use uuid::Uuid;

struct NoDevice;

impl AudioSink for NoDevice {
    fn prepare(&self, resource: &ResourceLocator) -> Result<Ready, SinkUnavailable> {
        Err(SinkUnavailable::new(resource, "no output device"))
    }

    fn trigger(&self) {}
}

fn settings(bpm: f64, min_bpm: f64, max_bpm: f64) -> SessionSettings {
    SessionSettings {
        bpm,
        min_bpm,
        max_bpm,
        ..SessionSettings::default()
    }
}

fn session(settings: SessionSettings, sink: Arc<CountingSink>) -> MetronomeSession {
    MetronomeSession::new(settings, sink, Arc::new(Logger::new())).expect("valid settings")
}

#[test]
fn test_invalid_bounds_fail_construction() {
    let result = MetronomeSession::new(
        settings(60.0, 150.0, 100.0),
        Arc::new(CountingSink::new()),
        Arc::new(Logger::new()),
    );
    assert!(matches!(
        result,
        Err(MetronomeError::Config(TempoConfigError::InvertedBounds { .. }))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_failed_start_leaves_session_stopped() {
    let mut session = MetronomeSession::new(
        SessionSettings::default(),
        Arc::new(NoDevice),
        Arc::new(Logger::new()),
    )
    .unwrap();

    let err = session.start_ticking().unwrap_err();
    assert!(matches!(err, MetronomeError::SinkUnavailable(_)));
    assert!(!session.is_ticking());
    assert_eq!(session.phase(), SchedulerPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_no_restart_when_clamped_at_max() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(settings(100.0, 10.0, 100.0), sink);

    session.start_ticking().unwrap();
    session.adjust_bpm(1.0);
    session.adjust_bpm(5.0);
    session.set_bpm(250.0);

    assert_eq!(session.bpm(), 100.0);
    assert_eq!(session.phase(), SchedulerPhase::Armed(interval_for(100.0)));
    sleep(Duration::from_millis(450)).await;
    let stats = session.stats();
    assert_eq!(stats.armed, 1);
    assert_eq!(stats.retunes_requested, 0);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_adjustments_rearm_once() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(settings(60.0, 20.0, 140.0), sink);

    session.start_ticking().unwrap();
    for _ in 0..5 {
        session.adjust_bpm(1.0);
    }
    assert_eq!(session.phase(), SchedulerPhase::PendingRestart(interval_for(65.0)));

    sleep(Duration::from_millis(450)).await;
    let stats = session.stats();
    assert_eq!(stats.armed, 2);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.retunes_applied, 1);
    assert_eq!(session.phase(), SchedulerPhase::Armed(interval_for(65.0)));
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_debounce_discards_retune() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(settings(60.0, 20.0, 140.0), sink.clone());

    session.start_ticking().unwrap();
    session.adjust_bpm(10.0);
    session.stop_ticking();

    sleep(Duration::from_secs(3)).await;
    assert_eq!(sink.trigger_count(), 0);
    assert_eq!(session.phase(), SchedulerPhase::Idle);
    let stats = session.stats();
    assert_eq!((stats.armed, stats.cancelled), (1, 1));
    assert_eq!(stats.retunes_applied, 0);
}

#[tokio::test(start_paused = true)]
async fn test_tempo_changes_while_stopped_touch_nothing() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(SessionSettings::default(), sink.clone());

    session.set_bpm(90.0);
    session.adjust_bpm(-5.0);
    assert_eq!(session.bpm(), 85.0);
    assert_eq!(session.stats(), TimerStats::default());
    assert_eq!(sink.prepare_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_and_lazy_prepare() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(SessionSettings::default(), sink.clone());

    assert!(session.toggle_ticking().unwrap());
    assert!(!session.toggle_ticking().unwrap());
    assert!(session.toggle_ticking().unwrap());
    assert_eq!(sink.prepare_count(), 1);
    assert_eq!(session.stats().armed, 2);
}

#[tokio::test(start_paused = true)]
async fn test_apply_song_sets_clamped_tempo() {
    let sink = Arc::new(CountingSink::new());
    let mut session = session(settings(70.0, 20.0, 140.0), sink);

    let mut song = Song::new(Uuid::nil());
    assert!(!session.apply_song(&song));

    song.bpm = "110".into();
    assert!(session.apply_song(&song));
    assert_eq!(session.bpm(), 110.0);

    song.bpm = "999".into();
    assert!(session.apply_song(&song));
    assert_eq!(session.bpm(), 140.0);
}

#[test]
fn test_format_bpm() {
    assert_eq!(format_bpm(120.0), "120");
    assert_eq!(format_bpm(92.5), "92.5");
}
