// tests/test_utils/mod.rs
//
// Shared helpers for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sharpeval::testgen::{self, SyntheticConfig, SyntheticRecording};
use sharpeval::{Envelope, Interval};

/// Path of the compiled CLI binary
pub fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sharpeval"))
}

pub fn run_sharpeval<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(get_binary_path())
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute sharpeval")
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("test paths are UTF-8")
}

/// The eight-sample recording used throughout the scenario tests
pub fn toy_envelope() -> Envelope {
    Envelope::new(vec![1.0, 1.0, 5.0, 5.0, 1.0, 1.0, 5.0, 1.0], 1.0).unwrap()
}

pub fn toy_reference() -> Vec<Interval> {
    vec![Interval::from((1.0, 3.0)), Interval::from((5.0, 7.0))]
}

/// Small synthetic recording with a fixed seed
pub fn small_recording(seed: u64) -> SyntheticRecording {
    testgen::generate(&SyntheticConfig {
        fs: 500.0,
        duration_secs: 20.0,
        num_events: 12,
        num_artifacts: 4,
        seed,
        ..Default::default()
    })
    .unwrap()
}

/// Uniform random envelope
pub fn random_envelope(seed: u64, len: usize, fs: f64) -> Envelope {
    let mut rng = StdRng::seed_from_u64(seed);
    let samples = (0..len).map(|_| rng.gen_range(0.0f32..10.0)).collect();
    Envelope::new(samples, fs).unwrap()
}

pub fn write_recording(dir: &Path, stem: &str, seed: u64) -> (PathBuf, PathBuf) {
    small_recording(seed).save(dir, stem).unwrap()
}
