// src/testgen/mod.rs
//
// Synthetic recordings for testing and demonstrating the sweep engine.
// Each recording is an envelope with a bump at every reference interval,
// optional artifact bursts outside them, and a low noise floor, all drawn
// from a seeded generator so runs are reproducible.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::{Envelope, Interval};
use crate::error::EvalResult;
use crate::storage::{ArtifactStore, IntervalCsvStore, JsonStore};

/// Parameters of a synthetic recording
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// Sampling frequency in Hz
    pub fs: f64,
    pub duration_secs: f64,
    /// Number of reference events
    pub num_events: usize,
    /// Event durations are drawn uniformly from this range (seconds)
    pub event_duration: (f64, f64),
    /// Peak amplitudes of event bumps are drawn uniformly from this range
    pub event_amplitude: (f32, f32),
    /// Bursts outside any reference interval
    pub num_artifacts: usize,
    pub artifact_amplitude: f32,
    /// Uniform noise floor in [0, noise_amplitude)
    pub noise_amplitude: f32,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            fs: 1250.0,
            duration_secs: 60.0,
            num_events: 40,
            event_duration: (0.03, 0.1),
            event_amplitude: (2.0, 6.0),
            num_artifacts: 10,
            artifact_amplitude: 3.0,
            noise_amplitude: 1.0,
            seed: 0x5eed,
        }
    }
}

/// Envelope plus the reference intervals it was built around
#[derive(Debug, Clone)]
pub struct SyntheticRecording {
    pub envelope: Envelope,
    pub reference: Vec<Interval>,
}

impl SyntheticRecording {
    /// Write `<stem>.envelope.json` and `<stem>.reference.csv` into `dir`
    pub fn save(&self, dir: &Path, stem: &str) -> Result<(PathBuf, PathBuf)> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let envelope_path = dir.join(format!("{}.envelope.json", stem));
        let reference_path = dir.join(format!("{}.reference.csv", stem));
        JsonStore.write(&envelope_path, &self.envelope)?;
        IntervalCsvStore.write(&reference_path, &self.reference)?;
        Ok((envelope_path, reference_path))
    }
}

/// Generate a recording.
///
/// Events sit in equal slots across the recording so they never overlap;
/// artifacts are placed in the gaps between events.
pub fn generate(config: &SyntheticConfig) -> EvalResult<SyntheticRecording> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let n = (config.duration_secs * config.fs).round() as usize;

    let mut samples: Vec<f32> = (0..n)
        .map(|_| {
            if config.noise_amplitude > 0.0 {
                rng.gen_range(0.0..config.noise_amplitude)
            } else {
                0.0
            }
        })
        .collect();

    let mut reference = Vec::with_capacity(config.num_events);
    if config.num_events > 0 {
        let slot = config.duration_secs / config.num_events as f64;
        let (dmin, dmax) = config.event_duration;
        for k in 0..config.num_events {
            let duration = if dmax > dmin { rng.gen_range(dmin..dmax) } else { dmin };
            let margin = 0.1 * slot;
            let latest = (slot - duration - margin).max(margin);
            let offset = if latest > margin { rng.gen_range(margin..latest) } else { margin };
            let start = k as f64 * slot + offset;
            let interval = Interval::new(start, start + duration)?;

            let (amin, amax) = config.event_amplitude;
            let amplitude = if amax > amin { rng.gen_range(amin..amax) } else { amin };
            add_bump(&mut samples, config.fs, &interval, amplitude);
            reference.push(interval);
        }

        for _ in 0..config.num_artifacts {
            // gap between the end of slot k's event and the start of slot k+1
            let k = rng.gen_range(0..config.num_events);
            let gap_start = reference[k].stop + 0.02;
            let gap_stop = reference
                .get(k + 1)
                .map_or(config.duration_secs, |next| next.start)
                - 0.02;
            if gap_stop - gap_start > 0.02 {
                let start = rng.gen_range(gap_start..gap_stop - 0.01);
                let burst = Interval::new(start, start + 0.01)?;
                add_bump(&mut samples, config.fs, &burst, config.artifact_amplitude);
            }
        }
    }

    Ok(SyntheticRecording {
        envelope: Envelope::new(samples, config.fs)?,
        reference,
    })
}

/// Add a raised-cosine bump spanning `interval`
fn add_bump(samples: &mut [f32], fs: f64, interval: &Interval, amplitude: f32) {
    let first = (interval.start * fs).ceil() as usize;
    let last = ((interval.stop * fs).ceil() as usize).min(samples.len());
    let width = (last.saturating_sub(first)).max(1) as f64;
    for i in first..last {
        let phase = (i - first) as f64 / width;
        let shape = 0.5 * (1.0 - (2.0 * PI * phase).cos());
        samples[i] += amplitude * shape as f32;
    }
}
