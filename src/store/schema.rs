//! Table creation for the rates and results tables

use rusqlite::{Connection, Result};

/// Create the historical rates table
///
/// Only vehicle_make, vehicle_model and rate take part in pricing; the other
/// columns are kept from uploaded data for reference.
pub fn create_rates_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                vehicle_make TEXT NOT NULL,
                vehicle_model TEXT NOT NULL,
                vehicle_make_year INTEGER,
                sum_insured REAL,
                premium REAL,
                rate REAL
            )"
        ),
        [],
    )?;

    Ok(())
}

/// Create the append-only quote results table
pub fn create_results_table(conn: &Connection, table: &str) -> Result<()> {
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                vehicle_make TEXT NOT NULL,
                vehicle_model TEXT NOT NULL,
                vehicle_make_year INTEGER NOT NULL,
                sum_insured REAL NOT NULL,
                vehicle_age INTEGER NOT NULL,
                risk_profile TEXT NOT NULL,
                historical_min_rate REAL,
                historical_max_rate REAL,
                historical_avg_rate REAL,
                predicted_premium REAL NOT NULL,
                predicted_rate REAL NOT NULL,
                age_multiplier REAL NOT NULL,
                adjusted_premium REAL NOT NULL,
                adjusted_rate REAL NOT NULL,
                risk_surcharge REAL NOT NULL,
                final_premium REAL NOT NULL,
                final_rate REAL NOT NULL,
                prediction_source TEXT NOT NULL,
                quoted_at TEXT NOT NULL,
                created_at TEXT NOT NULL
            )"
        ),
        [],
    )?;

    conn.execute(
        &format!("CREATE INDEX IF NOT EXISTS idx_{table}_created ON {table}(created_at DESC)"),
        [],
    )?;

    Ok(())
}
