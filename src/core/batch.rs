// src/core/batch.rs
//
// Independent sweeps over many recordings, run in parallel.

use rayon::prelude::*;

use super::runner::run_sweep;
use super::signal::{Envelope, Interval};
use super::sweep::ThresholdSweep;
use crate::config::SweepConfig;
use crate::error::EvalResult;

/// One recording to sweep
#[derive(Debug, Clone)]
pub struct SweepJob {
    pub name: String,
    pub envelope: Envelope,
    pub reference: Vec<Interval>,
}

/// Outcome of one job; failures stay local to their job
#[derive(Debug)]
pub struct SweepOutcome {
    pub name: String,
    pub result: EvalResult<ThresholdSweep>,
}

impl SweepOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl SweepJob {
    pub fn new(name: impl Into<String>, envelope: Envelope, reference: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            envelope,
            reference,
        }
    }

    pub fn run(&self, config: &SweepConfig) -> SweepOutcome {
        SweepOutcome {
            name: self.name.clone(),
            result: run_sweep(&self.envelope, &self.reference, config),
        }
    }
}

/// Sweep every job in parallel; output order matches `jobs`.
///
/// Sweeps share no state, so each runs on its own rayon worker while the
/// probes inside a sweep stay sequential.
pub fn run_batch(jobs: &[SweepJob], config: &SweepConfig) -> Vec<SweepOutcome> {
    jobs.par_iter().map(|job| job.run(config)).collect()
}
