//! Append-only storage of computed quotes

mod sqlite;

pub use sqlite::SqliteResultStore;

use crate::error::Result;
use crate::pricing::QuoteResult;
use crate::vehicle::QuoteRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Destination for computed quotes
///
/// Each call appends a new record; earlier records are never touched.
pub trait ResultStore: Send + Sync {
    /// Store a request and its result, returning the new record id
    fn append(&self, request: &QuoteRequest, result: &QuoteResult) -> Result<i64>;
}

/// A quote read back from the results store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuote {
    pub id: i64,
    /// When the record was written
    pub recorded_at: DateTime<Utc>,
    pub request: QuoteRequest,
    pub result: QuoteResult,
}
