// src/core/sweep.rs
//
// Ordered collection of threshold evaluations with adaptive probe selection.

use serde::{Deserialize, Serialize};

use super::evaluation::ThresholdEvaluation;
use crate::error::{EvalError, EvalResult};

/// One point of the precision-recall curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrPoint {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Evaluations kept in strictly decreasing threshold order.
///
/// The sweep only grows; evaluations are never removed or reordered once
/// inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SweepRecord")]
pub struct ThresholdSweep {
    evaluations: Vec<ThresholdEvaluation>,
}

#[derive(Deserialize)]
struct SweepRecord {
    evaluations: Vec<ThresholdEvaluation>,
}

impl TryFrom<SweepRecord> for ThresholdSweep {
    type Error = EvalError;

    fn try_from(record: SweepRecord) -> EvalResult<Self> {
        Self::from_evaluations(record.evaluations)
    }
}

impl ThresholdSweep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from evaluations that must already be strictly descending
    pub fn from_evaluations(evaluations: Vec<ThresholdEvaluation>) -> EvalResult<Self> {
        for eval in &evaluations {
            if !eval.threshold.is_finite() {
                return Err(EvalError::NonFiniteThreshold(eval.threshold));
            }
        }
        if let Some(pair) = evaluations
            .windows(2)
            .find(|w| w[0].threshold <= w[1].threshold)
        {
            return Err(EvalError::DuplicateThreshold(pair[1].threshold));
        }
        Ok(Self { evaluations })
    }

    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ThresholdEvaluation> {
        self.evaluations.iter()
    }

    pub fn evaluations(&self) -> &[ThresholdEvaluation] {
        &self.evaluations
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.evaluations.iter().map(|e| e.threshold).collect()
    }

    pub fn contains_threshold(&self, threshold: f64) -> bool {
        self.evaluations.iter().any(|e| e.threshold == threshold)
    }

    /// Insert keeping strict descending order; submissions may arrive in any order
    pub fn add_evaluation(&mut self, new: ThresholdEvaluation) -> EvalResult<()> {
        if !new.threshold.is_finite() {
            return Err(EvalError::NonFiniteThreshold(new.threshold));
        }
        if self.contains_threshold(new.threshold) {
            return Err(EvalError::DuplicateThreshold(new.threshold));
        }

        let index = match self.evaluations.last() {
            None => 0,
            Some(min) if new.threshold < min.threshold => self.evaluations.len(),
            Some(_) => self
                .evaluations
                .iter()
                .position(|e| e.threshold < new.threshold)
                .unwrap_or(self.evaluations.len()),
        };
        self.evaluations.insert(index, new);
        Ok(())
    }

    /// Next threshold to probe within `range` (bounds in either order).
    ///
    /// The first probe takes the top of the range and the second the bottom.
    /// Afterwards the probe bisects the adjacent pair with the largest jump
    /// in either correct detections or detected intervals. Ties go to the
    /// correct-detection signal, then to the higher-threshold pair.
    pub fn next_threshold(&self, range: (f64, f64)) -> EvalResult<f64> {
        let (a, b) = range;
        if !(a.is_finite() && b.is_finite()) {
            return Err(EvalError::InvalidRange { low: a, high: b });
        }
        let (low, high) = (a.min(b), a.max(b));

        match self.evaluations.len() {
            0 => return Ok(high),
            1 => return Ok(low),
            _ => {}
        }

        let signals: [fn(&ThresholdEvaluation) -> usize; 2] = [
            ThresholdEvaluation::num_correct,
            ThresholdEvaluation::num_detected,
        ];

        let mut largest: Option<(usize, usize)> = None;
        for signal in signals {
            for (k, pair) in self.evaluations.windows(2).enumerate() {
                let jump = signal(&pair[0]).abs_diff(signal(&pair[1]));
                if largest.map_or(true, |(best, _)| jump > best) {
                    largest = Some((jump, k));
                }
            }
        }

        // len >= 2 guarantees at least one pair
        let k = largest.map_or(0, |(_, k)| k);
        let upper = &self.evaluations[k];
        let lower = &self.evaluations[k + 1];
        Ok((upper.threshold + lower.threshold) / 2.0)
    }

    /// Highest-threshold evaluation whose recall strictly exceeds `target`
    pub fn at_recall(&self, target: f64) -> Option<&ThresholdEvaluation> {
        self.evaluations.iter().find(|e| e.recall() > target)
    }

    /// Evaluation with the largest F-beta; the first one wins ties
    pub fn at_max_f_score(&self, beta: f64) -> Option<&ThresholdEvaluation> {
        self.evaluations.iter().fold(None, |best, e| match best {
            Some(b) if b.f_score(beta) >= e.f_score(beta) => Some(b),
            _ => Some(e),
        })
    }

    pub fn at_max_f1(&self) -> Option<&ThresholdEvaluation> {
        self.at_max_f_score(1.0)
    }

    pub fn at_max_f2(&self) -> Option<&ThresholdEvaluation> {
        self.at_max_f_score(2.0)
    }

    /// Precision-recall points in stored (descending threshold) order
    pub fn pr_curve(&self) -> Vec<PrPoint> {
        self.evaluations
            .iter()
            .map(|e| PrPoint {
                threshold: e.threshold,
                precision: e.precision(),
                recall: e.recall(),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ThresholdSweep {
    type Item = &'a ThresholdEvaluation;
    type IntoIter = std::slice::Iter<'a, ThresholdEvaluation>;

    fn into_iter(self) -> Self::IntoIter {
        self.evaluations.iter()
    }
}
