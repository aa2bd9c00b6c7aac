// src/core/runner.rs
//
// Sequential probe loop driving one adaptive threshold sweep.

use log::{debug, info, warn};

use super::evaluation::ThresholdEvaluation;
use super::signal::{validate_intervals, Envelope, Interval};
use super::sweep::ThresholdSweep;
use crate::config::SweepConfig;
use crate::error::{EvalError, EvalResult};

/// Run `config.num_thresholds` probes over one recording.
///
/// Each probe depends on every previous one, so the loop is strictly
/// sequential. Any failure aborts the sweep; a probe that would repeat an
/// already-evaluated threshold is reported as [`EvalError::Stalled`].
pub fn run_sweep(
    envelope: &Envelope,
    reference: &[Interval],
    config: &SweepConfig,
) -> EvalResult<ThresholdSweep> {
    config.validate()?;
    validate_intervals(reference)?;

    let range = config.range.resolve(envelope)?;
    let lockout = config.lockout.resolve(reference)?;

    if reference.is_empty() {
        warn!("No reference intervals: recall will be 0 at every threshold");
    }
    debug!(
        "Sweep over {:.1}s at {} Hz: range [{:.4}, {:.4}], lockout {:.4}s, {} probes",
        envelope.duration(),
        envelope.fs(),
        range.0,
        range.1,
        lockout,
        config.num_thresholds
    );

    let mut sweep = ThresholdSweep::new();
    for probe in 0..config.num_thresholds {
        let threshold = sweep.next_threshold(range)?;
        if sweep.contains_threshold(threshold) {
            return Err(EvalError::Stalled { probe, threshold });
        }

        let evaluation = ThresholdEvaluation::evaluate(envelope, threshold, lockout, reference)?;
        debug!(
            "probe {:>3}: threshold {:.6} -> {} detections, {} correct, {}/{} intervals",
            probe,
            threshold,
            evaluation.num_detections(),
            evaluation.num_correct(),
            evaluation.num_detected(),
            evaluation.num_reference()
        );
        sweep.add_evaluation(evaluation)?;
    }

    if let Some(lowest) = sweep.evaluations().last() {
        if lowest.num_detections() == 0 {
            warn!(
                "No detections even at the lowest threshold {:.6}; check the probe range",
                lowest.threshold
            );
        }
    }
    info!(
        "Sweep finished: {} thresholds, best F{} = {:.3}",
        sweep.len(),
        config.beta,
        sweep
            .at_max_f_score(config.beta)
            .map_or(0.0, |e| e.f_score(config.beta))
    );

    Ok(sweep)
}
