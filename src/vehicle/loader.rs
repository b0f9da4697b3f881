//! Load quote requests from CSV
//!
//! Expected columns: vehicle_make, vehicle_model, vehicle_make_year, sum_insured, risk_profile

use super::{QuoteRequest, RiskProfile};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "vehicle_make")]
    make: String,
    #[serde(rename = "vehicle_model")]
    model: String,
    #[serde(rename = "vehicle_make_year")]
    make_year: i32,
    sum_insured: f64,
    risk_profile: String,
}

impl CsvRow {
    fn to_request(self) -> QuoteRequest {
        QuoteRequest::new(
            self.make,
            self.model,
            self.make_year,
            self.sum_insured,
            RiskProfile::from_label(&self.risk_profile),
        )
    }
}

/// Load all quote requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> Result<Vec<QuoteRequest>, Box<dyn Error>> {
    let reader = Reader::from_path(path)?;
    collect_requests(reader)
}

/// Load quote requests from any reader (e.g., string buffer, request body)
pub fn load_requests_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<QuoteRequest>, Box<dyn Error>> {
    collect_requests(Reader::from_reader(reader))
}

fn collect_requests<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<QuoteRequest>, Box<dyn Error>> {
    let mut requests = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        requests.push(row.to_request());
    }
    Ok(requests)
}
