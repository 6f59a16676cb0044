use super::*;

fn state(bpm: f64, min: f64, max: f64) -> BpmState {
    BpmState::new(bpm, min, max, false).expect("valid bounds")
}

#[test]
fn test_rejects_invalid_bounds() {
    assert_eq!(
        BpmState::new(60.0, 0.0, 100.0, false),
        Err(TempoConfigError::NonPositiveMinimum { min: 0.0 })
    );
    assert_eq!(
        BpmState::new(60.0, 120.0, 100.0, false),
        Err(TempoConfigError::InvertedBounds {
            min: 120.0,
            max: 100.0
        })
    );
    assert!(matches!(
        BpmState::new(f64::NAN, 10.0, 100.0, false),
        Err(TempoConfigError::NotFinite { field: "bpm" })
    ));
    assert!(matches!(
        BpmState::new(60.0, 10.0, f64::INFINITY, false),
        Err(TempoConfigError::NotFinite { field: "max_bpm" })
    ));
}

#[test]
fn test_rejects_minimum_too_slow_to_tick() {
    assert_eq!(
        BpmState::new(1e-18, 1e-18, 100.0, false),
        Err(TempoConfigError::MinimumTooSlow { min: 1e-18 })
    );
    assert_eq!(
        BpmBounds::new(0.0001, 100.0),
        Err(TempoConfigError::MinimumTooSlow { min: 0.0001 })
    );

    let slowest = state(0.001, 0.001, 100.0);
    assert!(slowest.tick_interval() > Duration::from_secs(59_999));
    assert!(slowest.tick_interval() <= MAX_TICK_INTERVAL);
}

#[test]
fn test_initial_bpm_is_clamped() {
    assert_eq!(state(500.0, 20.0, 140.0).bpm(), 140.0);
    assert_eq!(state(1.0, 20.0, 140.0).bpm(), 20.0);
}

#[test]
fn test_tick_interval() {
    assert_eq!(state(60.0, 20.0, 140.0).tick_interval(), Duration::from_secs(1));
    assert_eq!(state(120.0, 20.0, 140.0).tick_interval(), Duration::from_millis(500));
}

#[test]
fn test_controls_match_buttons() {
    let mut s = state(50.0, 10.0, 100.0);
    s.adjust_bpm(-1.0);
    assert_eq!(s.bpm(), 49.0);
    s.adjust_bpm(1.0);
    assert_eq!(s.bpm(), 50.0);
    s.set_bpm(30.0);
    assert_eq!(s.bpm(), 30.0);
    s.adjust_bpm(-5.0);
    assert_eq!(s.bpm(), 25.0);
    s.adjust_bpm(5.0);
    assert_eq!(s.bpm(), 30.0);
}

#[test]
fn test_clamping_is_idempotent() {
    for value in [-50.0, 0.0, 9.99, 10.0, 42.5, 100.0, 100.01, 1e9, f64::INFINITY] {
        let mut once = state(50.0, 10.0, 100.0);
        once.set_bpm(value);
        let mut twice = once.clone();
        twice.set_bpm(once.bpm());
        assert_eq!(once.bpm(), twice.bpm(), "value {value}");
    }
}

#[test]
fn test_bounds_hold_for_any_sequence() {
    let mut s = state(70.0, 20.0, 140.0);
    let deltas = [5.0, -200.0, 1.0, 1000.0, -1.0, -5.0, 0.5, f64::NEG_INFINITY, 3.0];
    for (i, delta) in deltas.iter().enumerate() {
        if i % 2 == 0 {
            s.adjust_bpm(*delta);
        } else {
            s.set_bpm(*delta);
        }
        assert!(s.bpm() >= s.min_bpm() && s.bpm() <= s.max_bpm());
    }
}

#[test]
fn test_no_signal_at_bound() {
    let mut s = BpmState::new(100.0, 10.0, 100.0, true).unwrap();
    assert_eq!(s.adjust_bpm(1.0), TickSignal::None);
    assert_eq!(s.bpm(), 100.0);

    let mut s = BpmState::new(10.0, 10.0, 100.0, true).unwrap();
    assert_eq!(s.adjust_bpm(-1.0), TickSignal::None);
}

#[test]
fn test_retune_only_while_ticking() {
    let mut s = state(60.0, 20.0, 140.0);
    assert_eq!(s.set_bpm(120.0), TickSignal::None);
    assert_eq!(s.bpm(), 120.0);

    assert_eq!(s.start_ticking(), TickSignal::Arm(Duration::from_millis(500)));
    assert_eq!(s.set_bpm(60.0), TickSignal::Retune(Duration::from_secs(1)));
    assert_eq!(s.set_bpm(60.0), TickSignal::None);

    assert_eq!(s.stop_ticking(), TickSignal::Cancel);
    assert!(!s.is_ticking());
    assert_eq!(s.adjust_bpm(1.0), TickSignal::None);
}

#[test]
fn test_nan_is_ignored() {
    let mut s = BpmState::new(60.0, 20.0, 140.0, true).unwrap();
    assert_eq!(s.set_bpm(f64::NAN), TickSignal::None);
    assert_eq!(s.bpm(), 60.0);
}
