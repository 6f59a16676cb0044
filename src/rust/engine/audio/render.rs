use std::f32::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};

pub const CLICK_SAMPLE_RATE: u32 = 44_100;
const CLICK_FREQUENCY: f32 = 1_000.0;
const CLICK_LENGTH_MS: u32 = 40;
const CLICK_DECAY: f32 = 120.0;

/// Samples of a short decaying sine burst in `[-1, 1]`.
pub fn click_samples(sample_rate: u32) -> Vec<f32> {
    let len = (sample_rate * CLICK_LENGTH_MS / 1000) as usize;
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * PI * CLICK_FREQUENCY * t).sin() * (-CLICK_DECAY * t).exp()
        })
        .collect()
}

/// Writes the default click as a 16-bit mono WAV file.
pub fn render_click_wav(path: &Path) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: CLICK_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to open WAV writer for {}", path.display()))?;

    for sample in click_samples(CLICK_SAMPLE_RATE) {
        let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
        writer
            .write_sample(scaled)
            .with_context(|| format!("unable to write audio sample to {}", path.display()))?;
    }

    writer
        .finalize()
        .with_context(|| format!("failed to finalize WAV file writer for {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "test_render.rs"]
mod tests;
