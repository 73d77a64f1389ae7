//! Merging many loans' rate segments into one obligation step function

use log::debug;
use serde::{Deserialize, Serialize};

use super::schedule::RateSegment;

/// Total monthly obligation over one span of years
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObligationInterval {
    pub start_year: f64,
    pub end_year: f64,
    pub total_rate: f64,
}

/// Non-overlapping, gap-free intervals of total monthly obligation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsolidatedObligation {
    intervals: Vec<ObligationInterval>,
}

impl ConsolidatedObligation {
    pub fn new(intervals: Vec<ObligationInterval>) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &[ObligationInterval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// First start and last end year covered, if any
    pub fn span(&self) -> Option<(f64, f64)> {
        match (self.intervals.first(), self.intervals.last()) {
            (Some(first), Some(last)) => Some((first.start_year, last.end_year)),
            _ => None,
        }
    }

    /// Highest total obligation across all intervals
    pub fn peak_rate(&self) -> f64 {
        self.intervals
            .iter()
            .map(|i| i.total_rate)
            .fold(0.0, f64::max)
    }
}

/// Merge rate segments into a consolidated step function
///
/// Every distinct segment edge becomes an interval boundary. Each interval
/// `[a, b]` sums the rate of every segment that fully contains it
/// (`start <= a && end >= b`).
pub fn combine_rates(segments: &[RateSegment]) -> ConsolidatedObligation {
    let mut boundaries: Vec<f64> = segments
        .iter()
        .flat_map(|s| [s.start_year, s.end_year])
        .collect();
    boundaries.sort_by(|a, b| a.total_cmp(b));
    boundaries.dedup();

    let intervals: Vec<ObligationInterval> = boundaries
        .windows(2)
        .map(|pair| {
            let (a, b) = (pair[0], pair[1]);
            let total_rate = segments
                .iter()
                .filter(|s| s.start_year <= a && s.end_year >= b)
                .map(|s| s.monthly_rate)
                .sum();
            ObligationInterval {
                start_year: a,
                end_year: b,
                total_rate,
            }
        })
        .collect();

    debug!(
        "combined {} segments into {} intervals",
        segments.len(),
        intervals.len()
    );

    ConsolidatedObligation::new(intervals)
}
