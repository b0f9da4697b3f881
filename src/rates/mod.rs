//! Historical rates: lookup and ingestion

mod summary;
mod lookup;
pub mod ingest;

pub use summary::HistoricalRateSummary;
pub use lookup::{RateLookup, SqliteRateStore};
pub use ingest::{ingest_csv, ingest_csv_path};
