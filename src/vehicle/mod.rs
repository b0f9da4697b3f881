//! Quote request structures and CSV loading

mod request;
pub mod loader;

pub use request::{QuoteRequest, RiskProfile, SUPPORTED_YEARS};
pub use loader::{load_requests, load_requests_from_reader};
