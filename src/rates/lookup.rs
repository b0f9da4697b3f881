//! Historical rate lookup against the rates table

use super::HistoricalRateSummary;
use crate::config::validate_table_name;
use crate::error::{QuoteError, Result};
use crate::store::{fold_case, Database};
use log::debug;

/// Source of historical rate statistics
///
/// Implementations return an empty summary when nothing matches and reserve
/// `QuoteError::LookupUnavailable` for failures to reach or query the store.
pub trait RateLookup: Send + Sync {
    fn lookup(&self, make: &str, model: &str) -> Result<HistoricalRateSummary>;
}

/// Rate lookup backed by a SQLite table of uploaded policy rows
#[derive(Debug, Clone)]
pub struct SqliteRateStore {
    database: Database,
    table: String,
}

impl SqliteRateStore {
    pub fn new(database: Database, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            database,
            table: table.to_string(),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

impl RateLookup for SqliteRateStore {
    fn lookup(&self, make: &str, model: &str) -> Result<HistoricalRateSummary> {
        let make = fold_case(make);
        let model = fold_case(model);

        let conn = self
            .database
            .connect_read_only()
            .map_err(|e| QuoteError::LookupUnavailable(format!("{}: {}", self.database.path().display(), e)))?;

        let sql = format!(
            "SELECT MIN(rate), MAX(rate), AVG(rate)
             FROM {}
             WHERE fold_case(vehicle_make) = ?1
               AND fold_case(vehicle_model) = ?2",
            self.table
        );

        // Aggregates over zero rows yield a single row of NULLs
        let summary = conn
            .query_row(&sql, [&make, &model], |row| {
                Ok(HistoricalRateSummary {
                    min_rate: row.get(0)?,
                    max_rate: row.get(1)?,
                    avg_rate: row.get(2)?,
                })
            })
            .map_err(|e| QuoteError::LookupUnavailable(e.to_string()))?;

        debug!(
            "Rate lookup {} {}: min={:?} max={:?} avg={:?}",
            make, model, summary.min_rate, summary.max_rate, summary.avg_rate
        );

        Ok(summary)
    }
}
