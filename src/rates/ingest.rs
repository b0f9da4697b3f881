//! Load uploaded historical policy data into the rates table
//!
//! Headers are normalized (trimmed, lowercased, spaces to underscores) so that
//! "VEHICLE MAKE" and "vehicle_make" land in the same column.

use super::SqliteRateStore;
use crate::error::{QuoteError, Result};
use crate::store::schema::create_rates_table;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Normalize a CSV header to its column name
pub fn normalize_column(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Column positions located in the header row
struct ColumnMap {
    make: usize,
    model: usize,
    rate: usize,
    make_year: Option<usize>,
    sum_insured: Option<usize>,
    premium: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<String> = headers.iter().map(normalize_column).collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| QuoteError::Ingest(format!("missing required column '{}'", name)))
        };

        Ok(Self {
            make: require("vehicle_make")?,
            model: require("vehicle_model")?,
            rate: require("rate")?,
            make_year: find("vehicle_make_year"),
            sum_insured: find("sum_insured"),
            premium: find("premium"),
        })
    }
}

/// One row ready for insertion
#[derive(Debug, Clone, PartialEq)]
struct RateRow {
    make: String,
    model: String,
    make_year: Option<i64>,
    sum_insured: Option<f64>,
    premium: Option<f64>,
    rate: Option<f64>,
}

fn optional_field<T: std::str::FromStr>(record: &StringRecord, idx: Option<usize>, line: u64, column: &str) -> Result<Option<T>> {
    let raw = match idx.and_then(|i| record.get(i)) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };
    raw.replace(',', "")
        .parse::<T>()
        .map(Some)
        .map_err(|_| QuoteError::Ingest(format!("line {}: cannot parse {} value {:?}", line, column, raw)))
}

/// Amounts and rates must be finite and non-negative
fn optional_amount(record: &StringRecord, idx: Option<usize>, line: u64, column: &str) -> Result<Option<f64>> {
    match optional_field::<f64>(record, idx, line, column)? {
        Some(value) if !value.is_finite() || value < 0.0 => Err(QuoteError::Ingest(format!(
            "line {}: {} must be a finite non-negative number, got {}",
            line, column, value
        ))),
        value => Ok(value),
    }
}

fn parse_row(record: &StringRecord, columns: &ColumnMap, line: u64) -> Result<RateRow> {
    let text = |idx: usize, column: &str| -> Result<String> {
        match record.get(idx) {
            Some(value) if !value.is_empty() => Ok(value.to_string()),
            _ => Err(QuoteError::Ingest(format!("line {}: empty {}", line, column))),
        }
    };

    Ok(RateRow {
        make: text(columns.make, "vehicle_make")?,
        model: text(columns.model, "vehicle_model")?,
        make_year: optional_field(record, columns.make_year, line, "vehicle_make_year")?,
        sum_insured: optional_amount(record, columns.sum_insured, line, "sum_insured")?,
        premium: optional_amount(record, columns.premium, line, "premium")?,
        rate: optional_amount(record, Some(columns.rate), line, "rate")?,
    })
}

/// Append every row of a CSV file to the rates table
pub fn ingest_csv_path<P: AsRef<Path>>(store: &SqliteRateStore, path: P) -> Result<usize> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| QuoteError::Ingest(format!("cannot open {}: {}", path.display(), e)))?;
    ingest_csv(store, file)
}

/// Append every row from a CSV reader to the rates table
///
/// All rows are parsed before anything is written and then inserted in one
/// transaction, so a malformed file leaves the table untouched.
pub fn ingest_csv<R: Read>(store: &SqliteRateStore, reader: R) -> Result<usize> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|e| QuoteError::Ingest(e.to_string()))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut rows = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| QuoteError::Ingest(e.to_string()))?;
        // Header is line 1
        rows.push(parse_row(&record, &columns, i as u64 + 2)?);
    }

    let storage_err = |e: rusqlite::Error| QuoteError::Ingest(e.to_string());
    let mut conn = store.database().connect().map_err(storage_err)?;
    create_rates_table(&conn, store.table()).map_err(storage_err)?;

    let tx = conn.transaction().map_err(storage_err)?;
    {
        let mut stmt = tx
            .prepare(&format!(
                "INSERT INTO {} (vehicle_make, vehicle_model, vehicle_make_year, sum_insured, premium, rate)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                store.table()
            ))
            .map_err(storage_err)?;
        for row in &rows {
            stmt.execute(rusqlite::params![
                row.make,
                row.model,
                row.make_year,
                row.sum_insured,
                row.premium,
                row.rate,
            ])
            .map_err(storage_err)?;
        }
    }
    tx.commit().map_err(storage_err)?;

    info!("Ingested {} historical rows into {}", rows.len(), store.table());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateLookup;
    use crate::store::test_support::temp_database;
    use approx::assert_relative_eq;

    const UPLOAD: &str = "\
VEHICLE MAKE,VEHICLE MODEL,VEHICLE MAKE YEAR,SUM INSURED,PREMIUM,RATE
Toyota,Corolla,2019,\"500,000\",20000,4.0
toyota,COROLLA,2021,600000,27000,4.5
Toyota,Corolla,2018,400000,,
Honda,Civic,2020,800000,28000,3.5
";

    fn store(name: &str) -> SqliteRateStore {
        SqliteRateStore::new(temp_database(name), "motor_insurance_data").unwrap()
    }

    #[test]
    fn test_normalize_column() {
        assert_eq!(normalize_column(" VEHICLE MAKE YEAR "), "vehicle_make_year");
        assert_eq!(normalize_column("Rate"), "rate");
    }

    #[test]
    fn test_ingest_then_lookup() {
        let store = store("ingest");
        let count = ingest_csv(&store, UPLOAD.as_bytes()).unwrap();
        assert_eq!(count, 4);

        // Blank rate is stored as NULL and ignored by the aggregates
        let summary = store.lookup("Toyota", "Corolla").unwrap();
        assert_relative_eq!(summary.min_rate.unwrap(), 4.0);
        assert_relative_eq!(summary.max_rate.unwrap(), 4.5);
        assert_relative_eq!(summary.avg_rate.unwrap(), 4.25);
    }

    #[test]
    fn test_ingest_appends() {
        let store = store("ingest-append");
        ingest_csv(&store, UPLOAD.as_bytes()).unwrap();
        ingest_csv(&store, UPLOAD.as_bytes()).unwrap();

        let conn = store.database().connect().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM motor_insurance_data", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 8);
    }

    #[test]
    fn test_missing_rate_column() {
        let store = store("ingest-missing");
        let data = "vehicle_make,vehicle_model,premium\nToyota,Corolla,20000\n";
        let err = ingest_csv(&store, data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("rate"));
    }

    #[test]
    fn test_bad_number_writes_nothing() {
        let store = store("ingest-bad");
        let data = "vehicle_make,vehicle_model,rate\nToyota,Corolla,4.0\nHonda,Civic,abc\n";
        assert!(matches!(ingest_csv(&store, data.as_bytes()), Err(QuoteError::Ingest(_))));
        // Table was never created, so the lookup reports the store as unavailable
        assert!(store.lookup("Toyota", "Corolla").is_err());
    }

    #[test]
    fn test_unusable_amounts_are_rejected() {
        for (column, value) in [("rate", "inf"), ("rate", "-4"), ("rate", "NaN"), ("premium", "-1"), ("sum_insured", "inf")] {
            let store = store("ingest-unusable");
            let data = format!(
                "vehicle_make,vehicle_model,sum_insured,premium,rate\nToyota,Corolla,{},{},{}\n",
                if column == "sum_insured" { value } else { "500000" },
                if column == "premium" { value } else { "20000" },
                if column == "rate" { value } else { "4.0" },
            );
            let err = ingest_csv(&store, data.as_bytes()).unwrap_err();
            assert!(matches!(err, QuoteError::Ingest(_)), "{} = {}", column, value);
            assert!(err.to_string().contains(column), "{}", err);
        }
    }
}
