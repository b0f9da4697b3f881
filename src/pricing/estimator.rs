//! Premium estimator: base premium, age adjustment, risk surcharge

use super::adjustments::{age_multiplier, premium_rate, risk_surcharge};
use super::model::{CoefficientModel, FeatureVector, PremiumModel};
use super::result::{PredictionSource, QuoteResult};
use super::risk_score::{assess, RiskAssessment, RiskFactors, VehicleUse};
use crate::config::UnderwritingConfig;
use crate::error::{QuoteError, Result};
use crate::rates::{HistoricalRateSummary, RateLookup, SqliteRateStore};
use crate::store::Database;
use crate::vehicle::QuoteRequest;
use chrono::{Datelike, Local, Utc};
use log::{debug, info, warn};

/// Months per year, used to annualize the model's monthly premium
const MONTHS_PER_YEAR: f64 = 12.0;

/// Settings that change estimator behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EstimatorConfig {
    /// Use the fallback model when the rate lookup fails, not only when it finds nothing
    pub fallback_on_lookup_error: bool,

    /// Calendar year for vehicle age (None = current local year)
    pub valuation_year: Option<i32>,
}

impl From<&UnderwritingConfig> for EstimatorConfig {
    fn from(config: &UnderwritingConfig) -> Self {
        Self {
            fallback_on_lookup_error: config.fallback_on_lookup_error,
            valuation_year: config.valuation_year,
        }
    }
}

/// Fallback model state
enum FallbackModel {
    Loaded(Box<dyn PremiumModel>),
    /// Reason the model cannot be used, reported if the fallback is reached
    Unavailable(String),
}

/// Computes quotes from historical rates, falling back to a model
pub struct PremiumEstimator<L> {
    rates: L,
    model: FallbackModel,
    config: EstimatorConfig,
}

impl<L: RateLookup> PremiumEstimator<L> {
    /// Create an estimator with no fallback model
    pub fn new(rates: L, config: EstimatorConfig) -> Self {
        Self {
            rates,
            model: FallbackModel::Unavailable("no fallback model configured".to_string()),
            config,
        }
    }

    /// Attach a fallback model
    pub fn with_model(mut self, model: Box<dyn PremiumModel>) -> Self {
        self.model = FallbackModel::Loaded(model);
        self
    }

    pub fn has_model(&self) -> bool {
        matches!(self.model, FallbackModel::Loaded(_))
    }

    pub fn rates(&self) -> &L {
        &self.rates
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Calendar year used for vehicle age
    pub fn current_year(&self) -> i32 {
        self.config
            .valuation_year
            .unwrap_or_else(|| Local::now().year())
    }

    /// Score a request's vehicle and driver at the valuation year
    pub fn assess_risk(&self, request: &QuoteRequest, vehicle_use: VehicleUse, driver_age: u32) -> RiskAssessment {
        assess(&RiskFactors::for_request(request, vehicle_use, driver_age, self.current_year()))
    }

    /// Compute a quote. Pure apart from the rate lookup; nothing is persisted.
    pub fn estimate(&self, request: &QuoteRequest) -> Result<QuoteResult> {
        request.validate()?;
        let request = request.normalized();
        let sum_insured = request.sum_insured;

        let current_year = self.current_year();
        let vehicle_age = request.vehicle_age(current_year);
        if vehicle_age < 0 {
            warn!(
                "Manufacture year {} is after valuation year {}; pricing with vehicle age {}",
                request.manufacture_year, current_year, vehicle_age
            );
        }

        let historical = self.lookup_history(&request)?;

        let (predicted_premium, source) = match historical.avg_rate {
            Some(avg_rate) => (
                Self::historical_premium(&request, avg_rate)?,
                PredictionSource::Historical,
            ),
            None => (
                self.predict_fallback(&request, vehicle_age)?,
                PredictionSource::ModelFallback,
            ),
        };

        let age_multiplier = age_multiplier(vehicle_age);
        let adjusted_premium = predicted_premium * age_multiplier;

        let risk_surcharge = risk_surcharge(&request.risk_profile);
        let final_premium = adjusted_premium * (1.0 + risk_surcharge);

        let result = QuoteResult {
            vehicle_age,
            historical,
            predicted_premium,
            predicted_rate: premium_rate(predicted_premium, sum_insured),
            age_multiplier,
            adjusted_premium,
            adjusted_rate: premium_rate(adjusted_premium, sum_insured),
            risk_surcharge,
            final_premium,
            final_rate: premium_rate(final_premium, sum_insured),
            source,
            created_at: Utc::now(),
        };

        info!(
            "Quoted {} {} ({}): final premium {:.2} at {:.4}% [{}]",
            request.vehicle_make,
            request.vehicle_model,
            request.manufacture_year,
            result.final_premium,
            result.final_rate,
            result.source
        );

        Ok(result)
    }

    fn lookup_history(&self, request: &QuoteRequest) -> Result<HistoricalRateSummary> {
        match self.rates.lookup(&request.vehicle_make, &request.vehicle_model) {
            Ok(summary) => Ok(summary),
            Err(QuoteError::LookupUnavailable(reason))
                if self.config.fallback_on_lookup_error && self.has_model() =>
            {
                warn!(
                    "Rate lookup failed for {} {} ({}); using fallback model",
                    request.vehicle_make, request.vehicle_model, reason
                );
                Ok(HistoricalRateSummary::empty())
            }
            Err(e) => Err(e),
        }
    }

    /// Annual premium from the historical average rate
    fn historical_premium(request: &QuoteRequest, avg_rate: f64) -> Result<f64> {
        if !avg_rate.is_finite() || avg_rate < 0.0 {
            return Err(QuoteError::LookupUnavailable(format!(
                "unusable average rate {} for {} {}",
                avg_rate, request.vehicle_make, request.vehicle_model
            )));
        }
        Ok(avg_rate / 100.0 * request.sum_insured)
    }

    /// Annual premium from the fallback model
    fn predict_fallback(&self, request: &QuoteRequest, vehicle_age: i32) -> Result<f64> {
        let model = match &self.model {
            FallbackModel::Loaded(model) => model,
            FallbackModel::Unavailable(reason) => {
                return Err(QuoteError::ModelUnavailable(format!(
                    "no history for {} {} and {}",
                    request.vehicle_make, request.vehicle_model, reason
                )))
            }
        };

        let features = FeatureVector::for_request(model.feature_columns(), request, vehicle_age);
        let monthly = model.predict_monthly(&features)?;
        if !monthly.is_finite() || monthly < 0.0 {
            return Err(QuoteError::ModelUnavailable(format!(
                "{} returned an unusable monthly premium {}",
                model.name(),
                monthly
            )));
        }

        debug!(
            "{} predicted monthly premium {:.2} for {} {}",
            model.name(),
            monthly,
            request.vehicle_make,
            request.vehicle_model
        );
        Ok(monthly * MONTHS_PER_YEAR)
    }
}

impl PremiumEstimator<SqliteRateStore> {
    /// Build the SQLite-backed estimator described by a configuration
    ///
    /// A model that fails to load does not prevent historical quotes; the load
    /// error is reported only when a quote needs the fallback.
    pub fn from_config(config: &UnderwritingConfig) -> Result<Self> {
        config.validate()?;
        let rates = SqliteRateStore::new(Database::new(&config.database_path), &config.rates_table)?;
        let mut estimator = Self::new(rates, EstimatorConfig::from(config));

        if let Some(path) = &config.model_path {
            match CoefficientModel::load(path) {
                Ok(model) => {
                    info!("Loaded fallback model from {}", path.display());
                    estimator = estimator.with_model(Box::new(model));
                }
                Err(e) => {
                    warn!("Fallback model not loaded: {}", e);
                    estimator.model = FallbackModel::Unavailable(e.to_string());
                }
            }
        }

        Ok(estimator)
    }
}
