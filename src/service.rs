//! Quote service: estimate, then record
//!
//! Computation and storage fail independently. A computation error yields no
//! quote at all; a storage error is returned next to the computed quote.

use crate::config::UnderwritingConfig;
use crate::error::{QuoteError, Result};
use crate::persist::{ResultStore, SqliteResultStore};
use crate::pricing::{PremiumEstimator, QuoteResult};
use crate::rates::{RateLookup, SqliteRateStore};
use crate::store::Database;
use crate::vehicle::QuoteRequest;
use log::warn;
use rayon::prelude::*;

/// A computed quote and the outcome of recording it
#[derive(Debug)]
pub struct QuoteOutcome {
    pub result: QuoteResult,
    /// Record id, or the reason the quote could not be stored
    pub persistence: Result<i64>,
}

impl QuoteOutcome {
    pub fn is_persisted(&self) -> bool {
        self.persistence.is_ok()
    }

    pub fn persistence_error(&self) -> Option<&QuoteError> {
        self.persistence.as_ref().err()
    }
}

/// Estimator paired with a results store
pub struct QuoteService<L, S> {
    estimator: PremiumEstimator<L>,
    store: S,
}

impl<L: RateLookup, S: ResultStore> QuoteService<L, S> {
    pub fn new(estimator: PremiumEstimator<L>, store: S) -> Self {
        Self { estimator, store }
    }

    pub fn estimator(&self) -> &PremiumEstimator<L> {
        &self.estimator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Price one request and record the result
    pub fn quote(&self, request: &QuoteRequest) -> Result<QuoteOutcome> {
        let result = self.estimator.estimate(request)?;
        let persistence = self.store.append(request, &result);
        if let Err(e) = &persistence {
            warn!(
                "Quote for {} {} computed but not stored: {}",
                request.vehicle_make.trim(),
                request.vehicle_model.trim(),
                e
            );
        }
        Ok(QuoteOutcome { result, persistence })
    }

    /// Price independent requests in parallel; output order matches input order
    pub fn quote_batch(&self, requests: &[QuoteRequest]) -> Vec<Result<QuoteOutcome>> {
        requests.par_iter().map(|request| self.quote(request)).collect()
    }
}

impl QuoteService<SqliteRateStore, SqliteResultStore> {
    /// Estimator and results store sharing the configured SQLite database
    pub fn from_config(config: &UnderwritingConfig) -> Result<Self> {
        let estimator = PremiumEstimator::from_config(config)?;
        let store = SqliteResultStore::new(Database::new(&config.database_path), &config.results_table)?;
        Ok(Self::new(estimator, store))
    }
}
