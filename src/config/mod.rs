//! Configuration module for sharpeval

mod profiles;

pub use profiles::{
    LockoutPolicy, SweepConfig, SweepConfigBuilder, SweepPreset, ThresholdRange,
};
