//! Banded underwriting risk score
//!
//! Four factors each score between 0.2 and 1.0; their sum selects a risk
//! profile. Scores are tracked in tenths so band edges compare exactly.

use crate::vehicle::{QuoteRequest, RiskProfile};
use serde::{Deserialize, Serialize};

/// Declared use of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleUse {
    Personal,
    Commercial,
    Other,
}

impl VehicleUse {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "personal" => VehicleUse::Personal,
            "commercial" => VehicleUse::Commercial,
            _ => VehicleUse::Other,
        }
    }

    fn points(&self) -> u32 {
        match self {
            VehicleUse::Personal => 2,
            VehicleUse::Commercial => 10,
            VehicleUse::Other => 6,
        }
    }
}

fn vehicle_age_points(vehicle_age: i32) -> u32 {
    match vehicle_age {
        i32::MIN..=2 => 4,
        3..=5 => 6,
        6..=8 => 8,
        _ => 10,
    }
}

fn sum_insured_points(sum_insured: f64) -> u32 {
    if sum_insured <= 300_000.0 {
        2
    } else if sum_insured <= 750_000.0 {
        4
    } else if sum_insured <= 1_500_000.0 {
        6
    } else if sum_insured <= 3_000_000.0 {
        8
    } else {
        10
    }
}

fn driver_age_points(driver_age: u32) -> u32 {
    match driver_age {
        0..=24 => 10,
        25..=35 => 6,
        36..=55 => 4,
        _ => 10,
    }
}

/// Inputs to the risk score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub vehicle_use: VehicleUse,
    pub vehicle_age: i32,
    pub sum_insured: f64,
    pub driver_age: u32,
}

impl RiskFactors {
    /// Factors for a quote request; vehicle age is taken at `current_year`
    pub fn for_request(request: &QuoteRequest, vehicle_use: VehicleUse, driver_age: u32, current_year: i32) -> Self {
        Self {
            vehicle_use,
            vehicle_age: request.vehicle_age(current_year),
            sum_insured: request.sum_insured,
            driver_age,
        }
    }
}

/// Score and the profile it selects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Sum of the four factor scores, between 1.2 and 4.0
    pub raw_score: f64,
    pub profile: RiskProfile,
}

/// Score a vehicle and driver
pub fn assess(factors: &RiskFactors) -> RiskAssessment {
    let points = factors.vehicle_use.points()
        + vehicle_age_points(factors.vehicle_age)
        + sum_insured_points(factors.sum_insured)
        + driver_age_points(factors.driver_age);

    let profile = match points {
        0..=17 => RiskProfile::Low,
        18..=23 => RiskProfile::LowToModerate,
        24..=29 => RiskProfile::ModerateToHigh,
        _ => RiskProfile::High,
    };

    RiskAssessment {
        raw_score: points as f64 / 10.0,
        profile,
    }
}
