//! Report module for sharpeval

mod summary;

pub use summary::{Grade, OperatingPoint, SweepSummary};
