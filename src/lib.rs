//! Motor Underwriting - premium quoting for motor insurance
//!
//! This library provides:
//! - Historical rate lookup by vehicle make and model, with CSV ingestion
//! - Premium estimation with a fallback regression model
//! - Vehicle-age and risk-profile adjustments, plus a banded risk score
//! - Append-only storage of every computed quote

pub mod config;
pub mod error;
pub mod persist;
pub mod pricing;
pub mod rates;
pub mod service;
pub mod store;
pub mod vehicle;

// Re-export commonly used types
pub use config::UnderwritingConfig;
pub use error::{QuoteError, Result};
pub use persist::{ResultStore, SqliteResultStore, StoredQuote};
pub use pricing::{PredictionSource, PremiumEstimator, PremiumModel, QuoteResult};
pub use rates::{HistoricalRateSummary, RateLookup, SqliteRateStore};
pub use service::{QuoteOutcome, QuoteService};
pub use vehicle::{QuoteRequest, RiskProfile};
