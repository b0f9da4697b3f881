//! Vehicle-age bands and the risk surcharge table

use crate::vehicle::RiskProfile;
use serde::{Deserialize, Serialize};

/// Vehicle age band for the age adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    /// age <= 1 (includes negative ages from future manufacture years)
    New,
    /// 2..=5
    Young,
    /// 6..=10
    Mature,
    /// > 10
    Old,
}

impl AgeBand {
    /// Determine band from vehicle age in years
    pub fn from_age(age: i32) -> Self {
        match age {
            i32::MIN..=1 => AgeBand::New,
            2..=5 => AgeBand::Young,
            6..=10 => AgeBand::Mature,
            _ => AgeBand::Old,
        }
    }

    /// Multiplier applied to the predicted premium
    pub fn multiplier(&self) -> f64 {
        match self {
            AgeBand::New => 0.85,
            AgeBand::Young => 1.00,
            AgeBand::Mature => 1.10,
            AgeBand::Old => 1.25,
        }
    }
}

/// Age multiplier for a vehicle age
pub fn age_multiplier(age: i32) -> f64 {
    AgeBand::from_age(age).multiplier()
}

/// Surcharge fraction for a risk profile; unrecognized labels carry none
pub fn risk_surcharge(profile: &RiskProfile) -> f64 {
    match profile {
        RiskProfile::Low => 0.05,
        RiskProfile::LowToModerate => 0.075,
        RiskProfile::ModerateToHigh => 0.10,
        RiskProfile::High => 0.15,
        RiskProfile::Unrecognized(_) => 0.0,
    }
}

/// Premium as a percentage of sum insured, 0 when the sum insured is 0
pub fn premium_rate(premium: f64, sum_insured: f64) -> f64 {
    if sum_insured == 0.0 {
        0.0
    } else {
        premium / sum_insured * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_age_band_boundaries() {
        assert_eq!(AgeBand::from_age(-3), AgeBand::New);
        assert_eq!(AgeBand::from_age(0), AgeBand::New);
        assert_eq!(AgeBand::from_age(1), AgeBand::New);
        assert_eq!(AgeBand::from_age(2), AgeBand::Young);
        assert_eq!(AgeBand::from_age(5), AgeBand::Young);
        assert_eq!(AgeBand::from_age(6), AgeBand::Mature);
        assert_eq!(AgeBand::from_age(10), AgeBand::Mature);
        assert_eq!(AgeBand::from_age(11), AgeBand::Old);
        assert_eq!(AgeBand::from_age(45), AgeBand::Old);
    }

    #[test]
    fn test_age_multipliers() {
        assert_eq!(age_multiplier(1), 0.85);
        assert_eq!(age_multiplier(2), 1.00);
        assert_eq!(age_multiplier(5), 1.00);
        assert_eq!(age_multiplier(6), 1.10);
        assert_eq!(age_multiplier(10), 1.10);
        assert_eq!(age_multiplier(11), 1.25);
    }

    #[test]
    fn test_multiplier_across_ages() {
        for age in -5..=60 {
            let expected = if age <= 1 {
                0.85
            } else if age <= 5 {
                1.00
            } else if age <= 10 {
                1.10
            } else {
                1.25
            };
            assert_eq!(age_multiplier(age), expected, "age {}", age);
        }
        assert_eq!(age_multiplier(i32::MIN), 0.85);
        assert_eq!(age_multiplier(i32::MAX), 1.25);
    }

    #[test]
    fn test_risk_surcharge_table() {
        assert_eq!(risk_surcharge(&RiskProfile::Low), 0.05);
        assert_eq!(risk_surcharge(&RiskProfile::LowToModerate), 0.075);
        assert_eq!(risk_surcharge(&RiskProfile::ModerateToHigh), 0.10);
        assert_eq!(risk_surcharge(&RiskProfile::High), 0.15);
        assert_eq!(risk_surcharge(&RiskProfile::from_label("Severe")), 0.0);
    }

    #[test]
    fn test_premium_rate() {
        assert!((premium_rate(21_000.0, 500_000.0) - 4.2).abs() < 1e-12);
        assert_eq!(premium_rate(21_000.0, 0.0), 0.0);
    }
}
