//! Computed quote

use crate::rates::HistoricalRateSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the predicted premium came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionSource {
    /// Average of recorded rates for the make and model
    #[serde(rename = "historical")]
    Historical,
    /// Fallback model prediction (no history for the make and model)
    #[serde(rename = "model-fallback")]
    ModelFallback,
}

impl PredictionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionSource::Historical => "historical",
            PredictionSource::ModelFallback => "model-fallback",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "historical" => Some(PredictionSource::Historical),
            "model-fallback" => Some(PredictionSource::ModelFallback),
            _ => None,
        }
    }
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one premium computation
///
/// Premiums are annual amounts; rates are percentages of sum insured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    /// Vehicle age used for the age band (negative for future manufacture years)
    pub vehicle_age: i32,

    /// Historical statistics consulted (empty on the fallback path)
    pub historical: HistoricalRateSummary,

    /// Base premium before any adjustment
    pub predicted_premium: f64,
    pub predicted_rate: f64,

    /// Age band multiplier applied to the predicted premium
    pub age_multiplier: f64,
    pub adjusted_premium: f64,
    pub adjusted_rate: f64,

    /// Risk surcharge fraction applied to the adjusted premium
    pub risk_surcharge: f64,
    pub final_premium: f64,
    pub final_rate: f64,

    pub source: PredictionSource,
    pub created_at: DateTime<Utc>,
}
