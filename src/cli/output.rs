//! Output formatting for CLI results

use crate::core::{Quartiles, ThresholdSweep};
use crate::report::{Grade, OperatingPoint, SweepSummary};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Format a sweep summary for terminal output
pub fn format_summary(summary: &SweepSummary, verbose: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{}{} {}{}{} {}[{} probes]{}\n",
        summary.grade.color_code(),
        summary.grade.symbol(),
        BOLD,
        summary.name,
        RESET,
        DIM,
        summary.num_probes,
        RESET,
    ));

    if let Some((low, high)) = summary.probed_range {
        output.push_str(&format!("  Thresholds probed: {:.4} .. {:.4}\n", low, high));
    }

    match &summary.best {
        Some(point) => {
            output.push_str(&format!("\n  Best F{}:\n", summary.beta));
            output.push_str(&format_point(point, verbose));
        }
        None => output.push_str("\n  No evaluations\n"),
    }

    output.push_str(&format!("\n  Recall > {:.2}:\n", summary.target_recall));
    match &summary.at_recall {
        Some(point) => output.push_str(&format_point(point, verbose)),
        None => output.push_str(&format!("    {}not reached by any threshold{}\n", DIM, RESET)),
    }

    output
}

fn format_point(point: &OperatingPoint, verbose: bool) -> String {
    let mut output = format!(
        "    threshold {:.4}  precision {:.3}  recall {:.3}  F {:.3}\n",
        point.threshold, point.precision, point.recall, point.f_score
    );
    output.push_str(&format!(
        "    {}{} detections, {} correct, {}/{} intervals detected{}\n",
        DIM, point.num_detections, point.num_correct, point.num_detected, point.num_reference, RESET
    ));

    if verbose {
        output.push_str(&format!(
            "      {}F1 {:.3} | F2 {:.3} | FDR {:.3}{}\n",
            DIM, point.f1, point.f2, point.fdr, RESET
        ));
        output.push_str(&format!(
            "      {}Delay (ms): {}{}\n",
            DIM,
            format_quartiles(point.abs_delay.map(|q| scale(q, 1000.0))),
            RESET
        ));
        output.push_str(&format!(
            "      {}Delay (rel): {}{}\n",
            DIM,
            format_quartiles(point.rel_delay),
            RESET
        ));
    }

    output
}

fn scale(q: Quartiles, factor: f64) -> Quartiles {
    Quartiles {
        q25: q.q25 * factor,
        median: q.median * factor,
        q75: q.q75 * factor,
    }
}

fn format_quartiles(q: Option<Quartiles>) -> String {
    match q {
        Some(q) => format!("median {:.3} [{:.3}, {:.3}]", q.median, q.q25, q.q75),
        None => "n/a".to_string(),
    }
}

/// Per-probe table of a sweep (verbose mode)
pub fn format_sweep_table(sweep: &ThresholdSweep, beta: f64) -> String {
    let mut output = format!(
        "  {}{:>12} {:>8} {:>8} {:>8} {:>7} {:>7}{}\n",
        DIM, "threshold", "dets", "correct", "detected", "prec", "recall", RESET
    );
    for eval in sweep {
        output.push_str(&format!(
            "  {:>12.5} {:>8} {:>8} {:>8} {:>7.3} {:>7.3}  F {:.3}\n",
            eval.threshold,
            eval.num_detections(),
            eval.num_correct(),
            eval.num_detected(),
            eval.precision(),
            eval.recall(),
            eval.f_score(beta),
        ));
    }
    output
}

/// Format a summary as JSON
pub fn format_json(summary: &SweepSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// Format a summary for multiple recordings
pub fn format_batch_summary(summaries: &[SweepSummary], failures: usize) -> String {
    let mut output = String::new();

    let count = |grade: Grade| summaries.iter().filter(|s| s.grade == grade).count();
    let mean_f = if summaries.is_empty() {
        0.0
    } else {
        summaries
            .iter()
            .map(|s| s.best.as_ref().map_or(0.0, |b| b.f_score))
            .sum::<f64>()
            / summaries.len() as f64
    };

    output.push_str(&format!("\n{}Summary:{}\n", BOLD, RESET));
    output.push_str(&format!("  {} recordings swept\n", summaries.len()));
    output.push_str(&format!("  mean best F: {:.3}\n", mean_f));

    for grade in [Grade::Excellent, Grade::Good, Grade::Fair, Grade::Poor] {
        let n = count(grade);
        if n > 0 {
            output.push_str(&format!(
                "  {}{} {} {:?}{}\n",
                grade.color_code(),
                grade.symbol(),
                n,
                grade,
                RESET
            ));
        }
    }
    if failures > 0 {
        output.push_str(&format!("  \x1b[31m✗ {} failed{}\n", failures, RESET));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Envelope, Interval, ThresholdEvaluation};

    fn summary() -> SweepSummary {
        let env = Envelope::new(vec![1.0, 1.0, 5.0, 5.0, 1.0, 1.0, 5.0, 1.0], 1.0).unwrap();
        let reference = vec![Interval::from((1.0, 3.0)), Interval::from((5.0, 7.0))];
        let mut sweep = ThresholdSweep::new();
        sweep
            .add_evaluation(ThresholdEvaluation::evaluate(&env, 3.0, 1.0, &reference).unwrap())
            .unwrap();
        SweepSummary::from_sweep("rec.envelope.json", &sweep, 0.8, 1.0)
    }

    #[test]
    fn test_format_summary() {
        let output = format_summary(&summary(), true);
        assert!(output.contains("rec.envelope.json"));
        assert!(output.contains("precision 1.000"));
        assert!(output.contains("Delay (ms): median 1000.000"));
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&summary()).unwrap();
        assert!(json.contains("\"name\": \"rec.envelope.json\""));
        assert!(json.contains("\"grade\": \"excellent\""));
    }

    #[test]
    fn test_format_batch_summary() {
        let output = format_batch_summary(&[summary()], 2);
        assert!(output.contains("1 recordings swept"));
        assert!(output.contains("2 failed"));
    }
}
