// src/config/profiles.rs
//
// Sweep configuration: probe budget, lockout and threshold range policies

use serde::{Deserialize, Serialize};

use crate::core::signal::{durations, Envelope, Interval};
use crate::core::stats;
use crate::error::{EvalError, EvalResult};

/// How the refractory lockout after each detection is chosen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LockoutPolicy {
    /// Fixed duration in seconds
    Fixed { seconds: f64 },
    /// Percentile (0-100) of the reference interval durations
    ReferencePercentile { percentile: f64 },
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::ReferencePercentile { percentile: 50.0 }
    }
}

impl LockoutPolicy {
    /// Lockout in seconds for this reference set; 0 with no reference intervals
    pub fn resolve(&self, reference: &[Interval]) -> EvalResult<f64> {
        let seconds = match *self {
            LockoutPolicy::Fixed { seconds } => seconds,
            LockoutPolicy::ReferencePercentile { percentile } => {
                check_percentile(percentile)?;
                stats::percentile(&durations(reference), percentile)
            }
        };
        if !(seconds.is_finite() && seconds >= 0.0) {
            return Err(EvalError::InvalidLockout(seconds));
        }
        Ok(seconds)
    }
}

/// Range of thresholds the adaptive search is allowed to probe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdRange {
    Explicit { low: f64, high: f64 },
    /// Observed minimum and maximum of the envelope
    EnvelopeExtent,
    /// Percentiles (0-100) of the envelope sample values
    EnvelopePercentiles { low: f64, high: f64 },
}

impl Default for ThresholdRange {
    fn default() -> Self {
        Self::EnvelopeExtent
    }
}

impl ThresholdRange {
    /// Resolve into `(low, high)` for this envelope
    pub fn resolve(&self, envelope: &Envelope) -> EvalResult<(f64, f64)> {
        let (low, high) = match *self {
            ThresholdRange::Explicit { low, high } => (low, high),
            ThresholdRange::EnvelopeExtent => envelope.extent().ok_or(EvalError::EmptyEnvelope)?,
            ThresholdRange::EnvelopePercentiles { low, high } => {
                (envelope.percentile(low)?, envelope.percentile(high)?)
            }
        };
        if !(low.is_finite() && high.is_finite()) {
            return Err(EvalError::InvalidRange { low, high });
        }
        Ok((low.min(high), low.max(high)))
    }
}

/// Preset probe budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPreset {
    /// Coarse curve for smoke runs
    Quick,
    /// Balanced defaults
    Standard,
    /// Dense curve for final reporting
    Fine,
}

impl SweepPreset {
    pub fn all() -> Vec<Self> {
        vec![Self::Quick, Self::Standard, Self::Fine]
    }

    pub fn name(&self) -> &'static str {
        match self {
            SweepPreset::Quick => "quick",
            SweepPreset::Standard => "standard",
            SweepPreset::Fine => "fine",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "quick" => Some(Self::Quick),
            "standard" | "default" => Some(Self::Standard),
            "fine" => Some(Self::Fine),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SweepPreset::Quick => "8 probes, for smoke runs",
            SweepPreset::Standard => "20 probes, balanced default",
            SweepPreset::Fine => "50 probes, dense precision-recall curve",
        }
    }

    pub fn num_thresholds(&self) -> usize {
        match self {
            SweepPreset::Quick => 8,
            SweepPreset::Standard => 20,
            SweepPreset::Fine => 50,
        }
    }
}

/// Parameters of one threshold sweep, threaded explicitly into the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Probe budget: number of thresholds evaluated
    pub num_thresholds: usize,
    /// Recall the reported operating point must exceed
    pub target_recall: f64,
    /// Beta of the F-score used to pick the best operating point
    pub beta: f64,
    pub lockout: LockoutPolicy,
    pub range: ThresholdRange,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self::from_preset(SweepPreset::Standard)
    }
}

impl SweepConfig {
    pub fn from_preset(preset: SweepPreset) -> Self {
        Self {
            num_thresholds: preset.num_thresholds(),
            target_recall: 0.8,
            beta: 1.0,
            lockout: LockoutPolicy::default(),
            range: ThresholdRange::default(),
        }
    }

    pub fn validate(&self) -> EvalResult<()> {
        if self.num_thresholds == 0 {
            return Err(EvalError::InvalidConfig(
                "num_thresholds must be at least 1".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.target_recall) {
            return Err(EvalError::InvalidConfig(format!(
                "target_recall must lie in [0, 1), got {}",
                self.target_recall
            )));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(EvalError::InvalidConfig(format!(
                "beta must be positive, got {}",
                self.beta
            )));
        }
        match self.lockout {
            LockoutPolicy::Fixed { seconds } if !(seconds.is_finite() && seconds >= 0.0) => {
                return Err(EvalError::InvalidLockout(seconds));
            }
            LockoutPolicy::ReferencePercentile { percentile } => check_percentile(percentile)?,
            _ => {}
        }
        match self.range {
            ThresholdRange::Explicit { low, high } if !(low.is_finite() && high.is_finite()) => {
                return Err(EvalError::InvalidRange { low, high });
            }
            ThresholdRange::EnvelopePercentiles { low, high } => {
                check_percentile(low)?;
                check_percentile(high)?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn check_percentile(p: f64) -> EvalResult<()> {
    if (0.0..=100.0).contains(&p) {
        Ok(())
    } else {
        Err(EvalError::InvalidPercentile(p))
    }
}

/// Builder for sweep configurations
pub struct SweepConfigBuilder {
    config: SweepConfig,
}

impl Default for SweepConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SweepConfig::default(),
        }
    }

    pub fn from_preset(preset: SweepPreset) -> Self {
        Self {
            config: SweepConfig::from_preset(preset),
        }
    }

    pub fn from_config(config: SweepConfig) -> Self {
        Self { config }
    }

    pub fn num_thresholds(mut self, n: usize) -> Self {
        self.config.num_thresholds = n;
        self
    }

    pub fn target_recall(mut self, recall: f64) -> Self {
        self.config.target_recall = recall;
        self
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.config.beta = beta;
        self
    }

    pub fn lockout_seconds(mut self, seconds: f64) -> Self {
        self.config.lockout = LockoutPolicy::Fixed { seconds };
        self
    }

    pub fn lockout_percentile(mut self, percentile: f64) -> Self {
        self.config.lockout = LockoutPolicy::ReferencePercentile { percentile };
        self
    }

    pub fn range(mut self, range: ThresholdRange) -> Self {
        self.config.range = range;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> EvalResult<SweepConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_standard() {
        let config = SweepConfig::default();
        assert_eq!(config.num_thresholds, 20);
        assert_eq!(config.target_recall, 0.8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in SweepPreset::all() {
            assert_eq!(SweepPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(SweepPreset::from_name("FINE"), Some(SweepPreset::Fine));
        assert!(SweepPreset::from_name("bogus").is_none());
    }

    #[test]
    fn test_builder_validates() {
        assert!(SweepConfigBuilder::new().num_thresholds(0).build().is_err());
        assert!(SweepConfigBuilder::new().target_recall(1.0).build().is_err());
        assert!(SweepConfigBuilder::new().beta(0.0).build().is_err());
        assert!(SweepConfigBuilder::new().lockout_seconds(-0.1).build().is_err());
        assert!(SweepConfigBuilder::new().lockout_percentile(120.0).build().is_err());

        let config = SweepConfigBuilder::from_preset(SweepPreset::Quick)
            .beta(2.0)
            .lockout_seconds(0.02)
            .build()
            .unwrap();
        assert_eq!(config.num_thresholds, 8);
        assert_eq!(config.lockout, LockoutPolicy::Fixed { seconds: 0.02 });
    }

    #[test]
    fn test_builder_default_matches_new() {
        let from_default = SweepConfigBuilder::default().build().unwrap();
        assert_eq!(from_default, SweepConfigBuilder::new().build().unwrap());
        assert_eq!(from_default, SweepConfig::default());
    }

    #[test]
    fn test_lockout_from_reference_percentile() {
        let reference = vec![
            Interval::from((0.0, 0.02)),
            Interval::from((1.0, 1.04)),
            Interval::from((2.0, 2.06)),
        ];
        let policy = LockoutPolicy::ReferencePercentile { percentile: 50.0 };
        assert!((policy.resolve(&reference).unwrap() - 0.04).abs() < 1e-9);
        assert_eq!(policy.resolve(&[]).unwrap(), 0.0);
    }

    #[test]
    fn test_range_resolution() {
        let env = Envelope::new(vec![0.0, 4.0, 2.0, 8.0, 6.0], 1.0).unwrap();
        assert_eq!(ThresholdRange::EnvelopeExtent.resolve(&env).unwrap(), (0.0, 8.0));
        assert_eq!(
            ThresholdRange::EnvelopePercentiles { low: 25.0, high: 75.0 }
                .resolve(&env)
                .unwrap(),
            (2.0, 6.0)
        );
        assert_eq!(
            ThresholdRange::Explicit { low: 5.0, high: 1.0 }.resolve(&env).unwrap(),
            (1.0, 5.0)
        );
        let empty = Envelope::new(vec![], 1.0).unwrap();
        assert!(ThresholdRange::EnvelopeExtent.resolve(&empty).is_err());
    }

    #[test]
    fn test_config_json_uses_defaults() {
        let config: SweepConfig = serde_json::from_str(
            r#"{"num_thresholds": 12, "lockout": {"kind": "fixed", "seconds": 0.05}}"#,
        )
        .unwrap();
        assert_eq!(config.num_thresholds, 12);
        assert_eq!(config.beta, 1.0);
        assert_eq!(config.range, ThresholdRange::EnvelopeExtent);
    }
}
