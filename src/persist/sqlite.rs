//! SQLite results table

use super::{ResultStore, StoredQuote};
use crate::config::validate_table_name;
use crate::error::{QuoteError, Result};
use crate::pricing::{PredictionSource, QuoteResult};
use crate::rates::HistoricalRateSummary;
use crate::store::schema::create_results_table;
use crate::store::Database;
use crate::vehicle::{QuoteRequest, RiskProfile};
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use rusqlite::types::Type;
use rusqlite::Row;

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Quote results appended to a SQLite table
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    database: Database,
    table: String,
}

impl SqliteResultStore {
    pub fn new(database: Database, table: &str) -> Result<Self> {
        validate_table_name(table)?;
        Ok(Self {
            database,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Newest quotes first
    pub fn recent(&self, limit: usize) -> Result<Vec<StoredQuote>> {
        let read_err = |e: rusqlite::Error| QuoteError::PersistenceFailure(format!("reading {}: {}", self.table, e));

        let conn = self.database.connect().map_err(read_err)?;
        create_results_table(&conn, &self.table).map_err(read_err)?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, vehicle_make, vehicle_model, vehicle_make_year, sum_insured, vehicle_age,
                        risk_profile, historical_min_rate, historical_max_rate, historical_avg_rate,
                        predicted_premium, predicted_rate, age_multiplier, adjusted_premium, adjusted_rate,
                        risk_surcharge, final_premium, final_rate, prediction_source, quoted_at, created_at
                 FROM {}
                 ORDER BY id DESC
                 LIMIT ?1",
                self.table
            ))
            .map_err(read_err)?;

        let rows = stmt
            .query_map([limit as i64], read_row)
            .map_err(read_err)?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(read_err)
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredQuote> {
    let risk_label: String = row.get(6)?;

    let source_label: String = row.get(18)?;
    let source = PredictionSource::from_label(&source_label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            18,
            Type::Text,
            format!("unknown prediction source {:?}", source_label).into(),
        )
    })?;

    let quoted_at: String = row.get(19)?;
    let created_at: String = row.get(20)?;

    let result = QuoteResult {
        vehicle_age: row.get(5)?,
        historical: HistoricalRateSummary {
            min_rate: row.get(7)?,
            max_rate: row.get(8)?,
            avg_rate: row.get(9)?,
        },
        predicted_premium: row.get(10)?,
        predicted_rate: row.get(11)?,
        age_multiplier: row.get(12)?,
        adjusted_premium: row.get(13)?,
        adjusted_rate: row.get(14)?,
        risk_surcharge: row.get(15)?,
        final_premium: row.get(16)?,
        final_rate: row.get(17)?,
        source,
        created_at: parse_timestamp(19, &quoted_at)?,
    };

    Ok(StoredQuote {
        id: row.get(0)?,
        recorded_at: parse_timestamp(20, &created_at)?,
        request: QuoteRequest {
            vehicle_make: row.get(1)?,
            vehicle_model: row.get(2)?,
            manufacture_year: row.get(3)?,
            sum_insured: row.get(4)?,
            risk_profile: RiskProfile::from_label(&risk_label),
        },
        result,
    })
}

impl ResultStore for SqliteResultStore {
    fn append(&self, request: &QuoteRequest, result: &QuoteResult) -> Result<i64> {
        let write_err = |e: rusqlite::Error| {
            warn!("Failed to persist quote to {}: {}", self.table, e);
            QuoteError::PersistenceFailure(e.to_string())
        };

        let conn = self.database.connect().map_err(write_err)?;
        create_results_table(&conn, &self.table).map_err(write_err)?;

        let request = request.normalized();
        conn.execute(
            &format!(
                "INSERT INTO {} (vehicle_make, vehicle_model, vehicle_make_year, sum_insured, vehicle_age,
                    risk_profile, historical_min_rate, historical_max_rate, historical_avg_rate,
                    predicted_premium, predicted_rate, age_multiplier, adjusted_premium, adjusted_rate,
                    risk_surcharge, final_premium, final_rate, prediction_source, quoted_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
                self.table
            ),
            rusqlite::params![
                request.vehicle_make,
                request.vehicle_model,
                request.manufacture_year,
                request.sum_insured,
                result.vehicle_age,
                request.risk_profile.label(),
                result.historical.min_rate,
                result.historical.max_rate,
                result.historical.avg_rate,
                result.predicted_premium,
                result.predicted_rate,
                result.age_multiplier,
                result.adjusted_premium,
                result.adjusted_rate,
                result.risk_surcharge,
                result.final_premium,
                result.final_rate,
                result.source.as_str(),
                timestamp(&result.created_at),
                timestamp(&Utc::now()),
            ],
        )
        .map_err(write_err)?;

        let id = conn.last_insert_rowid();
        debug!("Stored quote {} in {}", id, self.table);
        Ok(id)
    }
}
