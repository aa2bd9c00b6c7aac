//! sharpeval - Threshold-sweep evaluation of event detectors
//!
//! Scores how well a continuous detection statistic (an "envelope") finds
//! discrete target events, measured against expert-labelled reference
//! intervals. The engine turns the envelope into detections under a
//! refractory lockout, classifies detections and intervals against each
//! other, and adaptively picks which thresholds to probe so a smooth
//! precision-recall curve is traced with a small, fixed number of passes.
//!
//! ## Module Structure
//!
//! - `core` - Detection, classification, scoring and the adaptive sweep
//! - `config` - Sweep configuration and presets
//! - `report` - Summaries of completed sweeps
//! - `storage` - Artifact persistence behind a narrow read/write interface
//! - `cli` - Command-line interface
//! - `testgen` - Synthetic recordings for tests and demos
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sharpeval::{run_sweep, Envelope, Interval, SweepConfigBuilder};
//!
//! let envelope = Envelope::new(samples, 1250.0)?;
//! let config = SweepConfigBuilder::new().num_thresholds(30).build()?;
//! let sweep = run_sweep(&envelope, &reference, &config)?;
//!
//! if let Some(best) = sweep.at_max_f1() {
//!     println!("F1 {:.3} at threshold {:.3}", best.f1(), best.threshold);
//! }
//! ```
//!
//! ## Numeric policy
//!
//! | Case                          | Result              |
//! |-------------------------------|---------------------|
//! | No detections                 | precision = 0       |
//! | No reference intervals        | recall = 0          |
//! | Precision and recall both 0   | F-beta = 0          |
//! | Unsorted or malformed inputs  | error, sweep aborts |

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod storage;
pub mod testgen;

pub use self::config::{LockoutPolicy, SweepConfig, SweepConfigBuilder, SweepPreset, ThresholdRange};
pub use self::core::{
    classify, detect, run_batch, run_sweep, Classification, Envelope, Interval, PrPoint,
    Quartiles, SweepJob, SweepOutcome, ThresholdEvaluation, ThresholdSweep,
};
pub use error::{EvalError, EvalResult, StorageError, StorageResult};
pub use report::{Grade, OperatingPoint, SweepSummary};
pub use storage::{save_pr_curve, save_sweep, ArtifactStore, IntervalCsvStore, JsonStore, PrCurveCsvStore};
