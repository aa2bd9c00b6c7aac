// src/core/signal.rs
//
// Envelope and reference-interval types consumed by the evaluation engine.

use serde::{Deserialize, Serialize};

use super::stats;
use crate::error::{EvalError, EvalResult};

/// Detection statistic sampled at `fs` Hz.
///
/// Samples are validated as finite at construction; the envelope is immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvelopeRecord")]
pub struct Envelope {
    fs: f64,
    samples: Vec<f32>,
}

#[derive(Deserialize)]
struct EnvelopeRecord {
    fs: f64,
    samples: Vec<f32>,
}

impl TryFrom<EnvelopeRecord> for Envelope {
    type Error = EvalError;

    fn try_from(record: EnvelopeRecord) -> EvalResult<Self> {
        Envelope::new(record.samples, record.fs)
    }
}

impl Envelope {
    pub fn new(samples: Vec<f32>, fs: f64) -> EvalResult<Self> {
        if !(fs.is_finite() && fs > 0.0) {
            return Err(EvalError::InvalidSamplingRate(fs));
        }
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, s)| !s.is_finite()) {
            return Err(EvalError::NonFiniteSample { index, value });
        }
        Ok(Self { fs, samples })
    }

    pub fn fs(&self) -> f64 {
        self.fs
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn sample_period(&self) -> f64 {
        1.0 / self.fs
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.fs
    }

    /// Observed (min, max); `None` for an empty envelope
    pub fn extent(&self) -> Option<(f64, f64)> {
        let first = *self.samples.first()? as f64;
        Some(self.samples.iter().fold((first, first), |(lo, hi), &s| {
            let s = s as f64;
            (lo.min(s), hi.max(s))
        }))
    }

    /// Percentile of the sample values
    pub fn percentile(&self, p: f64) -> EvalResult<f64> {
        if !(0.0..=100.0).contains(&p) {
            return Err(EvalError::InvalidPercentile(p));
        }
        if self.samples.is_empty() {
            return Err(EvalError::EmptyEnvelope);
        }
        let values: Vec<f64> = self.samples.iter().map(|&s| s as f64).collect();
        Ok(stats::percentile(&values, p))
    }
}

/// Reference segment `[start, stop)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub stop: f64,
}

impl Interval {
    pub fn new(start: f64, stop: f64) -> EvalResult<Self> {
        let interval = Self { start, stop };
        interval.check(0)?;
        Ok(interval)
    }

    pub fn duration(&self) -> f64 {
        self.stop - self.start
    }

    /// Half-open containment: `start <= t < stop`
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t < self.stop
    }

    pub(crate) fn check(&self, index: usize) -> EvalResult<()> {
        if !(self.start.is_finite() && self.stop.is_finite()) || self.start > self.stop {
            return Err(EvalError::MalformedInterval {
                index,
                start: self.start,
                stop: self.stop,
            });
        }
        Ok(())
    }
}

impl From<(f64, f64)> for Interval {
    fn from((start, stop): (f64, f64)) -> Self {
        Self { start, stop }
    }
}

/// Check interval shape and ascending start order.
///
/// Overlap between neighbours is not checked.
pub fn validate_intervals(intervals: &[Interval]) -> EvalResult<()> {
    for (index, interval) in intervals.iter().enumerate() {
        interval.check(index)?;
        if index > 0 && intervals[index - 1].start > interval.start {
            return Err(EvalError::UnsortedIntervals { index });
        }
    }
    Ok(())
}

/// Durations of the reference intervals in seconds
pub fn durations(intervals: &[Interval]) -> Vec<f64> {
    intervals.iter().map(Interval::duration).collect()
}
