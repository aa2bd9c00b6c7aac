// src/core/classify.rs
//
// Containment of detection timestamps in reference intervals.

use super::signal::{validate_intervals, Interval};
use crate::error::{EvalError, EvalResult};

/// Containment relationships between events and intervals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Per event: does it fall inside some interval
    pub event_in_interval: Vec<bool>,
    /// Per interval: number of events it contains
    pub count_in_interval: Vec<usize>,
    /// Per interval: index of the first contained event
    pub first_event_index: Vec<Option<usize>>,
}

impl Classification {
    pub fn num_events_inside(&self) -> usize {
        self.event_in_interval.iter().filter(|&&inside| inside).count()
    }

    pub fn num_intervals_hit(&self) -> usize {
        self.count_in_interval.iter().filter(|&&c| c > 0).count()
    }
}

/// Classify sorted `events` against sorted, non-overlapping `intervals`.
///
/// Containment is half-open (`start <= t < stop`). Runs as a single
/// two-pointer merge, O(M + K). Interval shape and ordering of both inputs
/// are checked; overlap between intervals is trusted.
pub fn classify(intervals: &[Interval], events: &[f64]) -> EvalResult<Classification> {
    validate_intervals(intervals)?;
    if let Some(index) = events.windows(2).position(|w| !(w[0] <= w[1])) {
        return Err(EvalError::UnsortedEvents { index: index + 1 });
    }

    let mut event_in_interval = vec![false; events.len()];
    let mut count_in_interval = vec![0usize; intervals.len()];
    let mut first_event_index = vec![None; intervals.len()];

    let mut j = 0;
    for (i, interval) in intervals.iter().enumerate() {
        while j < events.len() && events[j] < interval.start {
            j += 1;
        }
        while j < events.len() && events[j] < interval.stop {
            event_in_interval[j] = true;
            count_in_interval[i] += 1;
            first_event_index[i].get_or_insert(j);
            j += 1;
        }
    }

    Ok(Classification {
        event_in_interval,
        count_in_interval,
        first_event_index,
    })
}
