// tests/cli_test.rs
//
// Runs the sharpeval binary against synthetic recordings on disk.

mod test_utils;

use sharpeval::{ArtifactStore, JsonStore, SweepSummary, ThresholdSweep};
use test_utils::*;

#[test]
fn test_sweep_writes_sweep_and_curve() {
    let dir = tempfile::tempdir().unwrap();
    let (envelope, reference) = write_recording(dir.path(), "rec", 21);
    let sweep_path = dir.path().join("rec.sweep.json");
    let curve_path = dir.path().join("rec.curve.csv");

    let output = run_sharpeval([
        "sweep",
        "--envelope",
        path_str(&envelope),
        "--reference",
        path_str(&reference),
        "-n",
        "12",
        "--output",
        path_str(&sweep_path),
        "--curve",
        path_str(&curve_path),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let sweep: ThresholdSweep = JsonStore.read(&sweep_path).unwrap();
    assert_eq!(sweep.len(), 12);

    let curve = std::fs::read_to_string(&curve_path).unwrap();
    assert_eq!(curve.lines().count(), 13);
    assert!(curve.starts_with("threshold,precision,recall"));
}

#[test]
fn test_summarize_recomputes_saved_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let rec = small_recording(8);
    let config = sharpeval::SweepConfigBuilder::new().num_thresholds(9).build().unwrap();
    let sweep = sharpeval::run_sweep(&rec.envelope, &rec.reference, &config).unwrap();
    let path = dir.path().join("saved.sweep.json");
    JsonStore.write(&path, &sweep).unwrap();

    let output = run_sharpeval(["--json", "summarize", "--sweep", path_str(&path)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let summary: SweepSummary = serde_json::from_slice(&output.stdout).unwrap();
    let expected = SweepSummary::from_sweep("saved.sweep.json", &sweep, 0.8, 1.0);
    assert_eq!(summary.num_probes, 9);
    assert_eq!(summary.best, expected.best);
    assert_eq!(summary.at_recall, expected.at_recall);
}

#[test]
fn test_batch_over_directory() {
    let dir = tempfile::tempdir().unwrap();
    for (i, stem) in ["a", "b", "c"].iter().enumerate() {
        write_recording(dir.path(), stem, i as u64);
    }
    // unsorted reference file fails only its own recording
    std::fs::write(dir.path().join("d.reference.csv"), "5,6\n1,2\n").unwrap();
    JsonStore
        .write(&dir.path().join("d.envelope.json"), &toy_envelope())
        .unwrap();

    let output = run_sharpeval(["batch", "--input", path_str(dir.path()), "-n", "6"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Found 4 recording(s)"));
    assert!(stdout.contains("3 recordings swept"));
    assert!(stdout.contains("1 failed"));
    for stem in ["a", "b", "c"] {
        assert!(dir.path().join(format!("{}.sweep.json", stem)).is_file());
    }
    assert!(!dir.path().join("d.sweep.json").exists());
}

#[test]
fn test_missing_envelope_fails_cleanly() {
    let output = run_sharpeval(["sweep", "-e", "/nonexistent/x.envelope.json", "-r", "/nonexistent/x.csv"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load envelope"));
}

#[test]
fn test_presets_listed() {
    let output = run_sharpeval(["presets"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["quick", "standard", "fine"] {
        assert!(stdout.contains(name));
    }
}
