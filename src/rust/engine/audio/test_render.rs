use super::*;
use tempfile::tempdir;

#[test]
fn test_click_decays() {
    let samples = click_samples(CLICK_SAMPLE_RATE);
    assert_eq!(samples.len(), 1764);
    let head = samples[..100].iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let tail = samples[samples.len() - 100..]
        .iter()
        .fold(0.0f32, |m, s| m.max(s.abs()));
    assert!(head > tail * 10.0);
}

#[test]
fn test_render_click_wav() {
    let dir = tempdir().expect("create tempdir");
    let path = dir.path().join("click.wav");
    render_click_wav(&path).expect("render click");

    let reader = hound::WavReader::open(&path).expect("open rendered wav");
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, CLICK_SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len(), 1764);
}
