// src/core/evaluation.rs
//
// Scored snapshot of a detector at a single threshold.

use serde::{Deserialize, Serialize};

use super::classify::classify;
use super::detector::detect;
use super::signal::{Envelope, Interval};
use super::stats::Quartiles;
use crate::error::{EvalError, EvalResult};

/// Classification outcome of one threshold probe.
///
/// Only the raw partitions are stored. Every metric is recomputed from them,
/// so a reloaded evaluation scores identically. Deserialization runs
/// [`ThresholdEvaluation::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EvaluationRecord")]
pub struct ThresholdEvaluation {
    pub threshold: f64,
    /// Detections inside some reference interval
    pub correct_detections: Vec<f64>,
    /// Detections outside every reference interval
    pub incorrect_detections: Vec<f64>,
    pub detected_intervals: Vec<Interval>,
    pub undetected_intervals: Vec<Interval>,
    /// First detection inside each detected interval, aligned with `detected_intervals`
    pub first_detections: Vec<f64>,
}

#[derive(Deserialize)]
struct EvaluationRecord {
    threshold: f64,
    correct_detections: Vec<f64>,
    incorrect_detections: Vec<f64>,
    detected_intervals: Vec<Interval>,
    undetected_intervals: Vec<Interval>,
    first_detections: Vec<f64>,
}

impl TryFrom<EvaluationRecord> for ThresholdEvaluation {
    type Error = EvalError;

    fn try_from(record: EvaluationRecord) -> EvalResult<Self> {
        let eval = Self {
            threshold: record.threshold,
            correct_detections: record.correct_detections,
            incorrect_detections: record.incorrect_detections,
            detected_intervals: record.detected_intervals,
            undetected_intervals: record.undetected_intervals,
            first_detections: record.first_detections,
        };
        eval.validate()?;
        Ok(eval)
    }
}

impl ThresholdEvaluation {
    /// Detect, classify and partition at `threshold`
    pub fn evaluate(
        envelope: &Envelope,
        threshold: f64,
        lockout_duration: f64,
        reference: &[Interval],
    ) -> EvalResult<Self> {
        let detections = detect(envelope, threshold, lockout_duration)?;
        let classification = classify(reference, &detections)?;

        let (correct, incorrect): (Vec<_>, Vec<_>) = detections
            .iter()
            .zip(&classification.event_in_interval)
            .partition(|(_, inside)| **inside);

        let mut detected_intervals = Vec::with_capacity(reference.len());
        let mut undetected_intervals = Vec::new();
        let mut first_detections = Vec::with_capacity(reference.len());
        for (interval, first) in reference.iter().zip(&classification.first_event_index) {
            match first {
                Some(j) => {
                    detected_intervals.push(*interval);
                    first_detections.push(detections[*j]);
                }
                None => undetected_intervals.push(*interval),
            }
        }

        Ok(Self {
            threshold,
            correct_detections: correct.into_iter().map(|(t, _)| *t).collect(),
            incorrect_detections: incorrect.into_iter().map(|(t, _)| *t).collect(),
            detected_intervals,
            undetected_intervals,
            first_detections,
        })
    }

    /// Check that the partitions could have come from [`evaluate`](Self::evaluate).
    ///
    /// Every interval must be well formed, each detected interval needs
    /// positive duration and exactly one first detection inside it.
    pub fn validate(&self) -> EvalResult<()> {
        if !self.threshold.is_finite() {
            return Err(EvalError::NonFiniteThreshold(self.threshold));
        }
        let inconsistent = |reason: String| EvalError::InconsistentEvaluation {
            threshold: self.threshold,
            reason,
        };
        if self.first_detections.len() != self.detected_intervals.len() {
            return Err(inconsistent(format!(
                "{} first detections for {} detected intervals",
                self.first_detections.len(),
                self.detected_intervals.len()
            )));
        }
        for (index, interval) in self.undetected_intervals.iter().enumerate() {
            interval.check(index)?;
        }
        for (index, (interval, &first)) in self
            .detected_intervals
            .iter()
            .zip(&self.first_detections)
            .enumerate()
        {
            interval.check(index)?;
            if interval.duration() <= 0.0 {
                return Err(inconsistent(format!(
                    "detected interval {} has zero duration",
                    index
                )));
            }
            if !interval.contains(first) {
                return Err(inconsistent(format!(
                    "first detection {} lies outside detected interval {}",
                    first, index
                )));
            }
        }
        Ok(())
    }

    pub fn num_correct(&self) -> usize {
        self.correct_detections.len()
    }

    pub fn num_incorrect(&self) -> usize {
        self.incorrect_detections.len()
    }

    pub fn num_detections(&self) -> usize {
        self.num_correct() + self.num_incorrect()
    }

    pub fn num_detected(&self) -> usize {
        self.detected_intervals.len()
    }

    pub fn num_undetected(&self) -> usize {
        self.undetected_intervals.len()
    }

    pub fn num_reference(&self) -> usize {
        self.num_detected() + self.num_undetected()
    }

    /// Fraction of reference intervals detected; 0 without reference intervals
    pub fn recall(&self) -> f64 {
        ratio(self.num_detected(), self.num_reference())
    }

    /// Fraction of detections that are correct; 0 without detections
    pub fn precision(&self) -> f64 {
        ratio(self.num_correct(), self.num_detections())
    }

    /// False discovery rate, `1 - precision`
    pub fn fdr(&self) -> f64 {
        1.0 - self.precision()
    }

    /// F-beta score; 0 when precision and recall are both 0
    pub fn f_score(&self, beta: f64) -> f64 {
        let p = self.precision();
        let r = self.recall();
        let b2 = beta * beta;
        let denom = b2 * p + r;
        if denom == 0.0 {
            0.0
        } else {
            (1.0 + b2) * p * r / denom
        }
    }

    pub fn f1(&self) -> f64 {
        self.f_score(1.0)
    }

    pub fn f2(&self) -> f64 {
        self.f_score(2.0)
    }

    /// Seconds from each detected interval's start to its first detection
    pub fn abs_delays(&self) -> Vec<f64> {
        self.first_detections
            .iter()
            .zip(&self.detected_intervals)
            .map(|(t, iv)| t - iv.start)
            .collect()
    }

    /// Absolute delays as a fraction of interval duration
    pub fn rel_delays(&self) -> Vec<f64> {
        // detected intervals have positive duration, enforced by validate()
        self.abs_delays()
            .into_iter()
            .zip(&self.detected_intervals)
            .map(|(d, iv)| d / iv.duration())
            .collect()
    }

    pub fn abs_delay_quartiles(&self) -> Option<Quartiles> {
        Quartiles::of(&self.abs_delays())
    }

    pub fn rel_delay_quartiles(&self) -> Option<Quartiles> {
        Quartiles::of(&self.rel_delays())
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
