//! Core evaluation engine: detection, classification, scoring and sweeps

pub mod batch;
pub mod classify;
pub mod detector;
pub mod evaluation;
pub mod runner;
pub mod signal;
pub mod stats;
pub mod sweep;

pub use batch::{run_batch, SweepJob, SweepOutcome};
pub use classify::{classify, Classification};
pub use detector::detect;
pub use evaluation::ThresholdEvaluation;
pub use runner::run_sweep;
pub use signal::{validate_intervals, Envelope, Interval};
pub use stats::Quartiles;
pub use sweep::{PrPoint, ThresholdSweep};
