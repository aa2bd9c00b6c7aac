// src/core/detector.rs
//
// Threshold crossing detection with a refractory lockout window.

use super::signal::Envelope;
use crate::error::{EvalError, EvalResult};

/// Convert a lockout duration in seconds to a whole number of samples
pub fn lockout_samples(lockout_duration: f64, fs: f64) -> EvalResult<usize> {
    if !(lockout_duration.is_finite() && lockout_duration >= 0.0) {
        return Err(EvalError::InvalidLockout(lockout_duration));
    }
    Ok((lockout_duration * fs).round() as usize)
}

/// Sample indices where the envelope reaches `threshold`.
///
/// After each detection the scan skips `lockout + 1` samples (the triggering
/// sample plus the lockout window) before comparing again, so consecutive
/// detections are at least `lockout + 1` samples apart. A lockout longer than
/// the envelope allows a single detection.
pub fn detect_indices(samples: &[f32], threshold: f64, lockout: usize) -> Vec<usize> {
    // clamped so the skip never overflows; skipping past the end is equivalent
    let step = lockout.min(samples.len()) + 1;
    let mut indices = Vec::with_capacity(samples.len().div_ceil(step));

    let mut i = 0;
    while i < samples.len() {
        if samples[i] as f64 >= threshold {
            indices.push(i);
            i += step;
        } else {
            i += 1;
        }
    }

    indices
}

/// Detection timestamps in seconds, ascending
pub fn detect(envelope: &Envelope, threshold: f64, lockout_duration: f64) -> EvalResult<Vec<f64>> {
    if !threshold.is_finite() {
        return Err(EvalError::NonFiniteThreshold(threshold));
    }
    let lockout = lockout_samples(lockout_duration, envelope.fs())?;
    let fs = envelope.fs();

    Ok(detect_indices(envelope.samples(), threshold, lockout)
        .into_iter()
        .map(|i| i as f64 / fs)
        .collect())
}
