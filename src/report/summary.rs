//! Summary of a completed sweep at its reporting operating points

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Quartiles, ThresholdEvaluation, ThresholdSweep};

/// Coarse grade of a detector from its best F-score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Nothing useful detected
    Poor,
    Fair,
    Good,
    Excellent,
}

impl Grade {
    pub fn from_f_score(f: f64) -> Self {
        match f {
            f if f >= 0.85 => Grade::Excellent,
            f if f >= 0.65 => Grade::Good,
            f if f >= 0.40 => Grade::Fair,
            _ => Grade::Poor,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Grade::Excellent => "✓",
            Grade::Good => "✓",
            Grade::Fair => "⚠",
            Grade::Poor => "✗",
        }
    }

    pub fn color_code(&self) -> &'static str {
        match self {
            Grade::Excellent => "\x1b[32m", // green
            Grade::Good => "\x1b[36m",      // cyan
            Grade::Fair => "\x1b[33m",      // yellow
            Grade::Poor => "\x1b[31m",      // red
        }
    }
}

/// Scalar snapshot of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub threshold: f64,
    pub num_detections: usize,
    pub num_correct: usize,
    pub num_detected: usize,
    pub num_reference: usize,
    pub precision: f64,
    pub recall: f64,
    pub fdr: f64,
    pub f_score: f64,
    pub f1: f64,
    pub f2: f64,
    pub abs_delay: Option<Quartiles>,
    pub rel_delay: Option<Quartiles>,
}

impl OperatingPoint {
    pub fn from_evaluation(eval: &ThresholdEvaluation, beta: f64) -> Self {
        Self {
            threshold: eval.threshold,
            num_detections: eval.num_detections(),
            num_correct: eval.num_correct(),
            num_detected: eval.num_detected(),
            num_reference: eval.num_reference(),
            precision: eval.precision(),
            recall: eval.recall(),
            fdr: eval.fdr(),
            f_score: eval.f_score(beta),
            f1: eval.f1(),
            f2: eval.f2(),
            abs_delay: eval.abs_delay_quartiles(),
            rel_delay: eval.rel_delay_quartiles(),
        }
    }
}

/// Report for one recording's sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub num_probes: usize,
    /// (lowest, highest) probed threshold
    pub probed_range: Option<(f64, f64)>,
    pub target_recall: f64,
    pub beta: f64,
    /// Highest threshold whose recall exceeds `target_recall`
    pub at_recall: Option<OperatingPoint>,
    /// Best F-beta over the sweep
    pub best: Option<OperatingPoint>,
    pub grade: Grade,
}

impl SweepSummary {
    pub fn from_sweep(
        name: impl Into<String>,
        sweep: &ThresholdSweep,
        target_recall: f64,
        beta: f64,
    ) -> Self {
        let thresholds = sweep.thresholds();
        let probed_range = match (thresholds.last(), thresholds.first()) {
            (Some(&low), Some(&high)) => Some((low, high)),
            _ => None,
        };
        let best = sweep
            .at_max_f_score(beta)
            .map(|e| OperatingPoint::from_evaluation(e, beta));
        let grade = Grade::from_f_score(best.as_ref().map_or(0.0, |b| b.f_score));

        Self {
            name: name.into(),
            created_at: Utc::now(),
            num_probes: sweep.len(),
            probed_range,
            target_recall,
            beta,
            at_recall: sweep
                .at_recall(target_recall)
                .map(|e| OperatingPoint::from_evaluation(e, beta)),
            best,
            grade,
        }
    }
}
