//! Default session: three steady tones and one looping blip.

use color_eyre::eyre::{Result, WrapErr};

use blocksynth::{
    graph::oscillator::Oscillator,
    runtime::{Track, TrackWindow},
    EngineConfig,
};

/// Loop length used when the timeline has none.
const FALLBACK_LOOP: u64 = 192_000;

const DRONE_FREQUENCIES: [f32; 3] = [220.0, 365.0, 880.0];
const BLIP_FREQUENCY: f32 = 1760.0;

/// Tracks every session starts with. `d` prunes back to these.
pub fn initial_tracks(config: &EngineConfig) -> Result<Vec<Track>> {
    let sample_rate = config.sample_rate as f32;
    let mut tracks: Vec<Track> = DRONE_FREQUENCIES
        .iter()
        .map(|&freq| Track::new(Oscillator::sine(freq, sample_rate)))
        .collect();

    // second half of the loop only
    let length = config.timeline_length.unwrap_or(FALLBACK_LOOP);
    let window = TrackWindow::new(length / 2, 0, length, true)
        .wrap_err("failed to place the blip track")?;
    tracks.push(Track::windowed(
        Oscillator::sine(BLIP_FREQUENCY, sample_rate),
        window,
    )?);

    Ok(tracks)
}
