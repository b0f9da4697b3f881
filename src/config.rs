//! Engine configuration
//!
//! Database location, table names and fallback behaviour are passed explicitly to
//! the stores and the estimator at construction.

use crate::error::{QuoteError, Result};
use crate::vehicle::SUPPORTED_YEARS;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default SQLite database file
pub const DEFAULT_DATABASE_PATH: &str = "underwriting.db";

/// Default table holding uploaded historical policy rows
pub const DEFAULT_RATES_TABLE: &str = "motor_insurance_data";

/// Default append-only table of computed quotes
pub const DEFAULT_RESULTS_TABLE: &str = "premium_results";

fn default_database_path() -> PathBuf { PathBuf::from(DEFAULT_DATABASE_PATH) }
fn default_rates_table() -> String { DEFAULT_RATES_TABLE.to_string() }
fn default_results_table() -> String { DEFAULT_RESULTS_TABLE.to_string() }

/// Configuration for a quoting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingConfig {
    /// SQLite database holding both the rates and the results tables
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Historical rates table (vehicle_make, vehicle_model, rate, ...)
    #[serde(default = "default_rates_table")]
    pub rates_table: String,

    /// Quote results table
    #[serde(default = "default_results_table")]
    pub results_table: String,

    /// Coefficient CSV for the fallback model (None = no fallback)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Fall back to the model when the rate lookup itself fails.
    /// When false, a lookup failure aborts the quote.
    #[serde(default)]
    pub fallback_on_lookup_error: bool,

    /// Override of the current calendar year used for vehicle age
    #[serde(default)]
    pub valuation_year: Option<i32>,
}

impl Default for UnderwritingConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            rates_table: default_rates_table(),
            results_table: default_results_table(),
            model_path: None,
            fallback_on_lookup_error: false,
            valuation_year: None,
        }
    }
}

impl UnderwritingConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| QuoteError::Config(format!("cannot open {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| QuoteError::Config(format!("cannot parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check table names and the valuation year
    pub fn validate(&self) -> Result<()> {
        validate_table_name(&self.rates_table)?;
        validate_table_name(&self.results_table)?;
        if self.rates_table == self.results_table {
            return Err(QuoteError::Config(
                "rates_table and results_table must differ".to_string(),
            ));
        }
        if let Some(year) = self.valuation_year {
            if !SUPPORTED_YEARS.contains(&year) {
                return Err(QuoteError::Config(format!(
                    "valuation_year {} out of range",
                    year
                )));
            }
        }
        Ok(())
    }
}

/// Table names are interpolated into SQL, so only plain identifiers are accepted
pub fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if valid_start && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(QuoteError::Config(format!("invalid table name: {:?}", name)))
    }
}
