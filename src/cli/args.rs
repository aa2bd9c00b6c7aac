//! CLI argument parsing

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::config::{SweepConfig, SweepConfigBuilder, SweepPreset};
use crate::error::EvalResult;

/// Evaluate event detectors by adaptive threshold sweeps
#[derive(Parser, Debug)]
#[command(name = "sharpeval")]
#[command(version, about = "Threshold-sweep evaluation of detection envelopes against reference intervals")]
pub struct Args {
    /// Verbose output (debug logging and per-probe details)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sweep one recording
    Sweep {
        /// Envelope JSON file ({"fs": .., "samples": [..]})
        #[arg(short, long)]
        envelope: PathBuf,

        /// Reference intervals, one start,stop pair per line
        #[arg(short, long)]
        reference: PathBuf,

        #[command(flatten)]
        sweep: SweepArgs,

        /// Write the completed sweep as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the precision-recall curve as CSV
        #[arg(long)]
        curve: Option<PathBuf>,
    },

    /// Sweep every *.envelope.json under a directory in parallel
    Batch {
        /// Directory holding <stem>.envelope.json / <stem>.reference.csv pairs
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// Recompute the summary of a saved sweep
    Summarize {
        /// Sweep JSON written by `sweep --output` or `batch`
        #[arg(short, long)]
        sweep: PathBuf,

        #[arg(long, default_value_t = 0.8)]
        target_recall: f64,

        #[arg(long, default_value_t = 1.0)]
        beta: f64,
    },

    /// Run a sweep over a synthetic recording
    Demo {
        #[arg(long, default_value_t = 7)]
        seed: u64,

        #[command(flatten)]
        sweep: SweepArgs,
    },

    /// List available sweep presets
    Presets,
}

/// Sweep parameters shared by the sweeping subcommands
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SweepArgs {
    /// Base configuration JSON; flags below override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Probe budget preset (quick, standard, fine)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Number of thresholds to probe
    #[arg(short = 'n', long)]
    pub num_thresholds: Option<usize>,

    /// Recall the reported operating point must exceed
    #[arg(long)]
    pub target_recall: Option<f64>,

    /// Beta of the F-score used to pick the best threshold
    #[arg(long)]
    pub beta: Option<f64>,

    /// Fixed lockout in seconds
    #[arg(long, conflicts_with = "lockout_percentile")]
    pub lockout: Option<f64>,

    /// Lockout as a percentile of reference interval durations
    #[arg(long)]
    pub lockout_percentile: Option<f64>,
}

impl SweepArgs {
    /// Merge flags over `base` (a loaded config file or the preset)
    pub fn to_config(&self, base: Option<SweepConfig>) -> EvalResult<SweepConfig> {
        let mut builder = match (base, self.preset.as_deref()) {
            (Some(config), None) => SweepConfigBuilder::from_config(config),
            (Some(config), Some(name)) => {
                let preset = parse_preset(name)?;
                SweepConfigBuilder::from_config(config).num_thresholds(preset.num_thresholds())
            }
            (None, Some(name)) => SweepConfigBuilder::from_preset(parse_preset(name)?),
            (None, None) => SweepConfigBuilder::new(),
        };

        if let Some(n) = self.num_thresholds {
            builder = builder.num_thresholds(n);
        }
        if let Some(recall) = self.target_recall {
            builder = builder.target_recall(recall);
        }
        if let Some(beta) = self.beta {
            builder = builder.beta(beta);
        }
        if let Some(seconds) = self.lockout {
            builder = builder.lockout_seconds(seconds);
        }
        if let Some(p) = self.lockout_percentile {
            builder = builder.lockout_percentile(p);
        }
        builder.build()
    }
}

fn parse_preset(name: &str) -> EvalResult<SweepPreset> {
    SweepPreset::from_name(name).ok_or_else(|| {
        crate::error::EvalError::InvalidConfig(format!("Unknown preset: {}", name))
    })
}
