//! Order statistics used for delay summaries, lockout and range policies

use serde::{Deserialize, Serialize};

/// Interquartile summary of a distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
}

impl Quartiles {
    /// Summarize `data`; `None` when it is empty
    pub fn of(data: &[f64]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let sorted = sorted_copy(data);
        Some(Self {
            q25: percentile_sorted(&sorted, 25.0),
            median: percentile_sorted(&sorted, 50.0),
            q75: percentile_sorted(&sorted, 75.0),
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q75 - self.q25
    }
}

/// Compute median of a slice
pub fn median(data: &[f64]) -> f64 {
    percentile(data, 50.0)
}

/// Percentile `p` (0-100) with linear interpolation between order statistics.
///
/// Returns 0.0 for an empty slice. `p` is clamped into [0, 100].
pub fn percentile(data: &[f64], p: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    percentile_sorted(&sorted_copy(data), p)
}

/// Same as [`percentile`] for data already sorted ascending
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = p.clamp(0.0, 100.0) / 100.0 * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let frac = rank - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [0.0, 10.0, 20.0, 30.0, 40.0];
        assert_eq!(percentile(&data, 0.0), 0.0);
        assert_eq!(percentile(&data, 100.0), 40.0);
        assert!((percentile(&data, 25.0) - 10.0).abs() < 1e-12);
        assert!((percentile(&data, 90.0) - 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentile_empty_is_zero() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert!(Quartiles::of(&[]).is_none());
    }

    #[test]
    fn test_quartiles_single_value() {
        let q = Quartiles::of(&[0.7]).unwrap();
        assert_eq!(q.q25, 0.7);
        assert_eq!(q.median, 0.7);
        assert_eq!(q.q75, 0.7);
        assert_eq!(q.iqr(), 0.0);
    }
}
