//! Premium computation
//!
//! The chain for one quote:
//! 1. **Base premium**: historical average rate × sum insured, or the fallback
//!    model's monthly prediction × 12 when no history exists
//! 2. **Age adjustment**: step multiplier by vehicle age band
//! 3. **Risk surcharge**: fixed fraction by risk profile
//!
//! Rates are always premium ÷ sum insured × 100.

mod adjustments;
mod estimator;
pub mod model;
mod result;
pub mod risk_score;

pub use adjustments::{age_multiplier, premium_rate, risk_surcharge, AgeBand};
pub use estimator::{EstimatorConfig, PremiumEstimator};
pub use model::{CoefficientModel, FeatureValue, FeatureVector, PremiumModel};
pub use result::{PredictionSource, QuoteResult};
pub use risk_score::{assess, RiskAssessment, RiskFactors, VehicleUse};
