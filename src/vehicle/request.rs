//! Quote request and risk profile definitions

use crate::error::{QuoteError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Calendar years accepted for manufacture and valuation years
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 1900..=2200;

/// Coarse qualitative risk label driving the surcharge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskProfile {
    Low,
    LowToModerate,
    ModerateToHigh,
    High,
    /// Any other label, kept verbatim; carries no surcharge
    Unrecognized(String),
}

impl RiskProfile {
    /// The four recognized profiles in ascending order of risk
    pub const ALL: [RiskProfile; 4] = [
        RiskProfile::Low,
        RiskProfile::LowToModerate,
        RiskProfile::ModerateToHigh,
        RiskProfile::High,
    ];

    /// Parse a label. Case, surrounding whitespace, and hyphen/space/underscore
    /// separators are ignored. "Medium to High" is accepted for Moderate-to-High.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .trim()
            .to_ascii_lowercase()
            .split(|c: char| c == ' ' || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        match key.as_str() {
            "low" => RiskProfile::Low,
            "low-to-moderate" => RiskProfile::LowToModerate,
            "moderate-to-high" | "medium-to-high" => RiskProfile::ModerateToHigh,
            "high" => RiskProfile::High,
            _ => RiskProfile::Unrecognized(label.to_string()),
        }
    }

    /// Canonical label as stored with each quote
    pub fn label(&self) -> &str {
        match self {
            RiskProfile::Low => "Low",
            RiskProfile::LowToModerate => "Low-to-Moderate",
            RiskProfile::ModerateToHigh => "Moderate-to-High",
            RiskProfile::High => "High",
            RiskProfile::Unrecognized(label) => label,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, RiskProfile::Unrecognized(_))
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for RiskProfile {
    fn from(label: String) -> Self {
        RiskProfile::from_label(&label)
    }
}

impl From<RiskProfile> for String {
    fn from(profile: RiskProfile) -> Self {
        profile.label().to_string()
    }
}

/// Inputs for one pricing computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Vehicle make, e.g. "Toyota"
    pub vehicle_make: String,

    /// Vehicle model, e.g. "Corolla"
    pub vehicle_model: String,

    /// Year of manufacture
    pub manufacture_year: i32,

    /// Insured value of the vehicle; denominator of every rate
    pub sum_insured: f64,

    pub risk_profile: RiskProfile,
}

impl QuoteRequest {
    pub fn new(
        vehicle_make: impl Into<String>,
        vehicle_model: impl Into<String>,
        manufacture_year: i32,
        sum_insured: f64,
        risk_profile: RiskProfile,
    ) -> Self {
        Self {
            vehicle_make: vehicle_make.into(),
            vehicle_model: vehicle_model.into(),
            manufacture_year,
            sum_insured,
            risk_profile,
        }
    }

    /// Copy with make and model trimmed
    pub fn normalized(&self) -> Self {
        Self {
            vehicle_make: self.vehicle_make.trim().to_string(),
            vehicle_model: self.vehicle_model.trim().to_string(),
            ..self.clone()
        }
    }

    /// Reject requests that cannot be priced
    ///
    /// Future manufacture years are not rejected here; the estimator accepts
    /// the resulting negative age.
    pub fn validate(&self) -> Result<()> {
        if self.vehicle_make.trim().is_empty() {
            return Err(QuoteError::invalid_input("vehicle_make", "must not be empty"));
        }
        if self.vehicle_model.trim().is_empty() {
            return Err(QuoteError::invalid_input("vehicle_model", "must not be empty"));
        }
        if !SUPPORTED_YEARS.contains(&self.manufacture_year) {
            return Err(QuoteError::invalid_input(
                "manufacture_year",
                format!(
                    "must be between {} and {}, got {}",
                    SUPPORTED_YEARS.start(),
                    SUPPORTED_YEARS.end(),
                    self.manufacture_year
                ),
            ));
        }
        if !self.sum_insured.is_finite() || self.sum_insured <= 0.0 {
            return Err(QuoteError::invalid_input(
                "sum_insured",
                format!("must be a positive amount, got {}", self.sum_insured),
            ));
        }
        Ok(())
    }

    /// Vehicle age in whole years at the given calendar year
    pub fn vehicle_age(&self, current_year: i32) -> i32 {
        current_year.saturating_sub(self.manufacture_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_profile_parsing() {
        assert_eq!(RiskProfile::from_label("Low"), RiskProfile::Low);
        assert_eq!(RiskProfile::from_label(" low "), RiskProfile::Low);
        assert_eq!(RiskProfile::from_label("Low to Moderate"), RiskProfile::LowToModerate);
        assert_eq!(RiskProfile::from_label("Low-to-Moderate"), RiskProfile::LowToModerate);
        assert_eq!(RiskProfile::from_label("moderate_to_high"), RiskProfile::ModerateToHigh);
        assert_eq!(RiskProfile::from_label("Medium to High"), RiskProfile::ModerateToHigh);
        assert_eq!(RiskProfile::from_label("HIGH"), RiskProfile::High);
        assert_eq!(
            RiskProfile::from_label("Extreme"),
            RiskProfile::Unrecognized("Extreme".to_string())
        );
    }

    #[test]
    fn test_risk_profile_serde_uses_label() {
        let json = serde_json::to_string(&RiskProfile::ModerateToHigh).unwrap();
        assert_eq!(json, "\"Moderate-to-High\"");
        let parsed: RiskProfile = serde_json::from_str("\"Low to Moderate\"").unwrap();
        assert_eq!(parsed, RiskProfile::LowToModerate);
        let other: RiskProfile = serde_json::from_str("\"Unknown\"").unwrap();
        assert!(!other.is_recognized());
        assert_eq!(other.label(), "Unknown");
    }

    #[test]
    fn test_validate() {
        let ok = QuoteRequest::new("Toyota", "Corolla", 2020, 500_000.0, RiskProfile::Low);
        assert!(ok.validate().is_ok());

        let zero = QuoteRequest { sum_insured: 0.0, ..ok.clone() };
        assert!(matches!(
            zero.validate(),
            Err(QuoteError::InvalidInput { ref field, .. }) if field == "sum_insured"
        ));

        let negative = QuoteRequest { sum_insured: -10.0, ..ok.clone() };
        assert!(negative.validate().is_err());

        let nan = QuoteRequest { sum_insured: f64::NAN, ..ok.clone() };
        assert!(nan.validate().is_err());

        let blank = QuoteRequest { vehicle_make: "  ".into(), ..ok.clone() };
        assert!(blank.validate().is_err());

        let ancient = QuoteRequest { manufacture_year: i32::MIN, ..ok.clone() };
        assert!(matches!(
            ancient.validate(),
            Err(QuoteError::InvalidInput { ref field, .. }) if field == "manufacture_year"
        ));
        let far_future = QuoteRequest { manufacture_year: 2201, ..ok.clone() };
        assert!(far_future.validate().is_err());
        let edge = QuoteRequest { manufacture_year: 1900, ..ok.clone() };
        assert!(edge.validate().is_ok());

        // Unrecognized labels are priced without surcharge, not rejected
        let odd = QuoteRequest { risk_profile: RiskProfile::from_label("Extreme"), ..ok };
        assert!(odd.validate().is_ok());
    }

    #[test]
    fn test_vehicle_age() {
        let request = QuoteRequest::new(" Toyota ", "Corolla ", 2020, 500_000.0, RiskProfile::Low);
        assert_eq!(request.vehicle_age(2025), 5);
        assert_eq!(request.vehicle_age(2019), -1);

        let extreme = QuoteRequest { manufacture_year: i32::MIN, ..request.clone() };
        assert_eq!(extreme.vehicle_age(2025), i32::MAX);

        let normalized = request.normalized();
        assert_eq!(normalized.vehicle_make, "Toyota");
        assert_eq!(normalized.vehicle_model, "Corolla");
    }
}
