// src/cli/mod.rs
//
// Command-line interface module

mod args;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use log::{info, warn};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{SweepConfig, SweepPreset};
use crate::core::{run_sweep, Envelope, Interval, SweepJob, ThresholdSweep};
use crate::report::SweepSummary;
use crate::storage::{save_pr_curve, save_sweep, ArtifactStore, IntervalCsvStore, JsonStore};
use crate::testgen::{self, SyntheticConfig};

pub use args::{Args, Command, SweepArgs};
pub use output::{format_batch_summary, format_json, format_summary, format_sweep_table};

const ENVELOPE_SUFFIX: &str = ".envelope.json";
const REFERENCE_SUFFIX: &str = ".reference.csv";
const SWEEP_SUFFIX: &str = ".sweep.json";

/// Run the CLI
pub fn run(args: Args) -> Result<()> {
    match &args.command {
        Command::Sweep {
            envelope,
            reference,
            sweep,
            output,
            curve,
        } => {
            let config = load_config(sweep)?;
            let envelope_data: Envelope = JsonStore
                .read(envelope)
                .with_context(|| format!("Failed to load envelope {}", envelope.display()))?;
            let reference_data = IntervalCsvStore
                .read(reference)
                .with_context(|| format!("Failed to load reference {}", reference.display()))?;

            let result = run_sweep(&envelope_data, &reference_data, &config)
                .with_context(|| format!("Sweep failed for {}", envelope.display()))?;

            if let Some(path) = output {
                save_sweep(&JsonStore, path, &result)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            if let Some(path) = curve {
                save_pr_curve(path, &result)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }

            report(&display_name(envelope), &result, &config, &args)
        }

        Command::Batch { input, sweep } => run_batch_dir(input, sweep, &args),

        Command::Summarize {
            sweep,
            target_recall,
            beta,
        } => {
            let result: ThresholdSweep = JsonStore
                .read(sweep)
                .with_context(|| format!("Failed to load sweep {}", sweep.display()))?;
            let config = SweepConfig {
                target_recall: *target_recall,
                beta: *beta,
                ..SweepConfig::default()
            };
            config.validate()?;
            report(&display_name(sweep), &result, &config, &args)
        }

        Command::Demo { seed, sweep } => {
            let config = load_config(sweep)?;
            let recording = testgen::generate(&SyntheticConfig {
                seed: *seed,
                ..SyntheticConfig::default()
            })?;
            info!(
                "Synthetic recording: {:.0}s, {} reference events",
                recording.envelope.duration(),
                recording.reference.len()
            );
            let result = run_sweep(&recording.envelope, &recording.reference, &config)?;
            report(&format!("synthetic (seed {})", seed), &result, &config, &args)
        }

        Command::Presets => {
            println!("Available sweep presets:\n");
            for preset in SweepPreset::all() {
                println!("  {:<10} {}", preset.name(), preset.description());
            }
            Ok(())
        }
    }
}

fn load_config(sweep: &SweepArgs) -> Result<SweepConfig> {
    let base = match &sweep.config {
        Some(path) => Some(
            ArtifactStore::<SweepConfig>::read(&JsonStore, path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
        ),
        None => None,
    };
    Ok(sweep.to_config(base)?)
}

fn report(name: &str, sweep: &ThresholdSweep, config: &SweepConfig, args: &Args) -> Result<()> {
    let summary = SweepSummary::from_sweep(name, sweep, config.target_recall, config.beta);
    if args.json {
        println!("{}", format_json(&summary)?);
    } else {
        print!("{}", format_summary(&summary, args.verbose));
        if args.verbose {
            println!();
            print!("{}", format_sweep_table(sweep, config.beta));
        }
    }
    Ok(())
}

fn run_batch_dir(input: &Path, sweep: &SweepArgs, args: &Args) -> Result<()> {
    let config = load_config(sweep)?;
    let pairs = collect_recordings(input)?;

    if pairs.is_empty() {
        println!("{}", "No envelope files found!".red());
        return Ok(());
    }
    println!("Found {} recording(s)\n", pairs.len());

    let mut jobs = Vec::with_capacity(pairs.len());
    let mut failures = 0;
    for (stem, envelope_path, reference_path) in &pairs {
        match load_job(stem, envelope_path, reference_path) {
            Ok(job) => jobs.push((job, envelope_path.with_file_name(format!("{}{}", stem, SWEEP_SUFFIX)))),
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {:#}", "✗".red(), stem, e);
            }
        }
    }

    let progress = ProgressBar::new(jobs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    let outcomes: Vec<_> = jobs
        .par_iter()
        .progress_with(progress)
        .map(|(job, out)| (job.run(&config), out))
        .collect();

    let mut summaries = Vec::with_capacity(outcomes.len());
    for (outcome, out) in outcomes {
        match outcome.result {
            Ok(result) => {
                if let Err(e) = save_sweep(&JsonStore, out, &result) {
                    warn!("{}", e);
                }
                summaries.push(SweepSummary::from_sweep(
                    outcome.name,
                    &result,
                    config.target_recall,
                    config.beta,
                ));
            }
            Err(e) => {
                failures += 1;
                eprintln!("{} {}: {}", "✗".red(), outcome.name, e);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for summary in &summaries {
            print!("{}", format_summary(summary, args.verbose));
            println!();
        }
        print!("{}", format_batch_summary(&summaries, failures));
    }
    Ok(())
}

fn load_job(stem: &str, envelope_path: &Path, reference_path: &Path) -> Result<SweepJob> {
    let envelope: Envelope = JsonStore
        .read(envelope_path)
        .with_context(|| format!("Failed to load envelope {}", envelope_path.display()))?;
    let reference: Vec<Interval> = IntervalCsvStore
        .read(reference_path)
        .with_context(|| format!("Failed to load reference {}", reference_path.display()))?;
    Ok(SweepJob::new(stem, envelope, reference))
}

/// Find `<stem>.envelope.json` files with a sibling `<stem>.reference.csv`
pub fn collect_recordings(path: &Path) -> Result<Vec<(String, PathBuf, PathBuf)>> {
    let mut recordings = Vec::new();

    for entry in WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_name = entry.file_name().to_string_lossy();
        let Some(stem) = file_name.strip_suffix(ENVELOPE_SUFFIX) else {
            continue;
        };
        let reference = entry
            .path()
            .with_file_name(format!("{}{}", stem, REFERENCE_SUFFIX));
        if reference.is_file() {
            recordings.push((stem.to_string(), entry.path().to_path_buf(), reference));
        } else {
            warn!("No reference intervals for {}", entry.path().display());
        }
    }

    Ok(recordings)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_recordings_pairs_files() {
        let dir = tempfile::tempdir().unwrap();
        let rec = testgen::generate(&SyntheticConfig {
            duration_secs: 2.0,
            num_events: 2,
            ..Default::default()
        })
        .unwrap();
        rec.save(dir.path(), "a").unwrap();
        rec.save(dir.path(), "b").unwrap();
        // envelope without reference is skipped
        std::fs::write(dir.path().join("c.envelope.json"), "{}").unwrap();

        let found = collect_recordings(dir.path()).unwrap();
        let stems: Vec<_> = found.iter().map(|(s, _, _)| s.as_str()).collect();
        assert_eq!(stems, vec!["a", "b"]);
    }
}
