//! Aggregate statistics over historical rates

use serde::{Deserialize, Serialize};

/// Min/max/average historical rate (percent of sum insured) for one make and model
///
/// All three are `None` when no matching history exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRateSummary {
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub avg_rate: Option<f64>,
}

impl HistoricalRateSummary {
    /// Summary for a make/model with no recorded history
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(min_rate: f64, max_rate: f64, avg_rate: f64) -> Self {
        Self {
            min_rate: Some(min_rate),
            max_rate: Some(max_rate),
            avg_rate: Some(avg_rate),
        }
    }

    /// (min, max) range when both ends are known
    pub fn range(&self) -> Option<(f64, f64)> {
        match (self.min_rate, self.max_rate) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = HistoricalRateSummary::empty();
        assert_eq!(summary.avg_rate, None);
        assert_eq!(summary.range(), None);
    }

    #[test]
    fn test_populated_summary() {
        let summary = HistoricalRateSummary::new(3.5, 4.5, 4.0);
        assert_eq!(summary.avg_rate, Some(4.0));
        assert_eq!(summary.range(), Some((3.5, 4.5)));
    }
}
