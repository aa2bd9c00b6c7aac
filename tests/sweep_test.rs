// tests/sweep_test.rs
//
// End-to-end properties of detection, scoring and the adaptive sweep.

mod test_utils;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sharpeval::core::detector::lockout_samples;
use sharpeval::{
    detect, run_batch, run_sweep, EvalError, SweepConfigBuilder, SweepJob, ThresholdEvaluation,
    ThresholdRange, ThresholdSweep,
};
use test_utils::*;

#[test]
fn test_detection_scenario() {
    let detections = detect(&toy_envelope(), 3.0, 1.0).unwrap();
    assert_eq!(detections, vec![2.0, 6.0]);
}

#[test]
fn test_scoring_scenario() {
    let eval = ThresholdEvaluation::evaluate(&toy_envelope(), 3.0, 1.0, &toy_reference()).unwrap();
    assert_eq!(eval.num_correct(), 2);
    assert_eq!(eval.num_detected(), 2);
    assert_eq!(eval.recall(), 1.0);
    assert_eq!(eval.precision(), 1.0);
    assert_eq!(eval.f1(), 1.0);
    assert_eq!(eval.f2(), 1.0);
}

#[test]
fn test_adaptive_search_scenario() {
    let mut sweep = ThresholdSweep::new();
    let first = sweep.next_threshold((0.0, 10.0)).unwrap();
    assert_eq!(first, 10.0);
    sweep
        .add_evaluation(
            ThresholdEvaluation::evaluate(&toy_envelope(), first, 1.0, &toy_reference()).unwrap(),
        )
        .unwrap();
    assert_eq!(sweep.next_threshold((0.0, 10.0)).unwrap(), 0.0);
}

#[test]
fn test_lockout_invariant_on_random_envelopes() {
    for seed in 0..20u64 {
        let fs = [100.0, 250.0, 1000.0][seed as usize % 3];
        let env = random_envelope(seed, 5_000, fs);
        for lockout in [0.0, 0.004, 0.01, 0.05, 0.2] {
            for threshold in [2.0, 5.0, 9.0] {
                let detections = detect(&env, threshold, lockout).unwrap();
                let min_gap = (lockout_samples(lockout, fs).unwrap() + 1) as f64 / fs;
                for pair in detections.windows(2) {
                    let gap = pair[1] - pair[0];
                    assert!(gap >= lockout - 1.0 / fs, "gap {} < lockout {}", gap, lockout);
                    assert!(gap + 1e-9 >= min_gap);
                }
            }
        }
    }
}

#[test]
fn test_sweep_order_after_shuffled_inserts() {
    let env = random_envelope(99, 2_000, 100.0);
    let reference = small_recording(3).reference;
    let mut thresholds: Vec<f64> = (0..40).map(|i| i as f64 * 0.25).collect();

    for seed in 0..5 {
        thresholds.shuffle(&mut StdRng::seed_from_u64(seed));
        let mut sweep = ThresholdSweep::new();
        for &t in &thresholds {
            let eval = ThresholdEvaluation::evaluate(&env, t, 0.01, &reference).unwrap();
            sweep.add_evaluation(eval).unwrap();
        }
        assert_eq!(sweep.len(), thresholds.len());
        assert!(sweep.thresholds().windows(2).all(|w| w[0] > w[1]));
    }
}

#[test]
fn test_degenerate_inputs_score_zero() {
    let env = toy_envelope();

    let none_detected = ThresholdEvaluation::evaluate(&env, 50.0, 0.0, &toy_reference()).unwrap();
    assert_eq!(none_detected.precision(), 0.0);

    let no_reference = ThresholdEvaluation::evaluate(&env, 3.0, 0.0, &[]).unwrap();
    assert_eq!(no_reference.recall(), 0.0);

    let nothing = ThresholdEvaluation::evaluate(&env, 50.0, 0.0, &[]).unwrap();
    assert_eq!(nothing.precision(), 0.0);
    assert_eq!(nothing.recall(), 0.0);
    assert_eq!(nothing.f1(), 0.0);
    assert!(!nothing.f_score(3.0).is_nan());
}

#[test]
fn test_full_sweep_on_synthetic_recording() {
    let rec = small_recording(11);
    let config = SweepConfigBuilder::new()
        .num_thresholds(24)
        .lockout_seconds(0.0)
        .build()
        .unwrap();

    let sweep = run_sweep(&rec.envelope, &rec.reference, &config).unwrap();
    assert_eq!(sweep.len(), 24);
    assert!(sweep.thresholds().windows(2).all(|w| w[0] > w[1]));

    // the lowest probe sits at the envelope minimum: every sample is a detection
    let lowest = sweep.evaluations().last().unwrap();
    assert_eq!(lowest.recall(), 1.0);

    // bumps are well above the noise floor, so some threshold separates them
    let best = sweep.at_max_f1().unwrap();
    assert!(best.f1() > 0.7, "best F1 {}", best.f1());

    let at_recall = sweep.at_recall(0.8).unwrap();
    assert!(at_recall.recall() > 0.8);
    assert!(sweep
        .iter()
        .take_while(|e| e.threshold > at_recall.threshold)
        .all(|e| e.recall() <= 0.8));
}

#[test]
fn test_sweep_is_deterministic() {
    let rec = small_recording(5);
    let config = SweepConfigBuilder::new().num_thresholds(10).build().unwrap();
    let a = run_sweep(&rec.envelope, &rec.reference, &config).unwrap();
    let b = run_sweep(&rec.envelope, &rec.reference, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_collapsed_range_reports_stall() {
    let config = SweepConfigBuilder::new()
        .num_thresholds(5)
        .range(ThresholdRange::Explicit { low: 4.0, high: 4.0 })
        .build()
        .unwrap();
    match run_sweep(&toy_envelope(), &toy_reference(), &config) {
        Err(EvalError::Stalled { probe, threshold }) => {
            assert_eq!(probe, 1);
            assert_eq!(threshold, 4.0);
        }
        other => panic!("expected stall, got {:?}", other),
    }
}

#[test]
fn test_batch_matches_sequential() {
    let config = SweepConfigBuilder::new().num_thresholds(8).build().unwrap();
    let jobs: Vec<SweepJob> = (0..4)
        .map(|seed| {
            let rec = small_recording(seed);
            SweepJob::new(format!("rec{}", seed), rec.envelope, rec.reference)
        })
        .collect();

    let outcomes = run_batch(&jobs, &config);
    for (job, outcome) in jobs.iter().zip(&outcomes) {
        assert_eq!(job.name, outcome.name);
        let sequential = run_sweep(&job.envelope, &job.reference, &config).unwrap();
        assert_eq!(outcome.result.as_ref().unwrap(), &sequential);
    }
}
