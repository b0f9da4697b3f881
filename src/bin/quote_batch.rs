//! Price a CSV of quote requests in parallel
//!
//! Usage: quote_batch <requests.csv> [output.csv] [config.json]
//!
//! Every computed quote is stored; a row per request is written to the output
//! CSV with either the quote or the reason it could not be priced.

use anyhow::{Context, Result};
use motor_underwriting::vehicle::load_requests;
use motor_underwriting::{QuoteOutcome, QuoteRequest, QuoteService, UnderwritingConfig};
use serde::Serialize;
use std::io::Write;
use std::time::Instant;

/// One line of the output file
#[derive(Debug, Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "Make")]
    make: &'a str,
    #[serde(rename = "Model")]
    model: &'a str,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "SumInsured")]
    sum_insured: f64,
    #[serde(rename = "RiskProfile")]
    risk_profile: &'a str,
    #[serde(rename = "Source")]
    source: Option<&'static str>,
    #[serde(rename = "PredictedPremium")]
    predicted_premium: Option<f64>,
    #[serde(rename = "PredictedRate")]
    predicted_rate: Option<f64>,
    #[serde(rename = "AdjustedPremium")]
    adjusted_premium: Option<f64>,
    #[serde(rename = "FinalPremium")]
    final_premium: Option<f64>,
    #[serde(rename = "FinalRate")]
    final_rate: Option<f64>,
    #[serde(rename = "RecordId")]
    record_id: Option<i64>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl<'a> OutputRow<'a> {
    fn new(request: &'a QuoteRequest, outcome: &motor_underwriting::Result<QuoteOutcome>) -> Self {
        let mut row = OutputRow {
            make: request.vehicle_make.trim(),
            model: request.vehicle_model.trim(),
            year: request.manufacture_year,
            sum_insured: request.sum_insured,
            risk_profile: request.risk_profile.label(),
            source: None,
            predicted_premium: None,
            predicted_rate: None,
            adjusted_premium: None,
            final_premium: None,
            final_rate: None,
            record_id: None,
            error: None,
        };

        match outcome {
            Ok(outcome) => {
                let r = &outcome.result;
                row.source = Some(r.source.as_str());
                row.predicted_premium = Some(r.predicted_premium);
                row.predicted_rate = Some(r.predicted_rate);
                row.adjusted_premium = Some(r.adjusted_premium);
                row.final_premium = Some(r.final_premium);
                row.final_rate = Some(r.final_rate);
                match &outcome.persistence {
                    Ok(id) => row.record_id = Some(*id),
                    Err(e) => row.error = Some(e.to_string()),
                }
            }
            Err(e) => row.error = Some(e.to_string()),
        }
        row
    }
}

/// Counts reported after a run
#[derive(Debug, Default, PartialEq)]
struct Summary {
    priced: usize,
    unsaved: usize,
}

fn write_outputs<W: Write>(
    writer: W,
    requests: &[QuoteRequest],
    outcomes: &[motor_underwriting::Result<QuoteOutcome>],
) -> Result<Summary> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut summary = Summary::default();

    for (request, outcome) in requests.iter().zip(outcomes) {
        if let Ok(outcome) = outcome {
            summary.priced += 1;
            if !outcome.is_persisted() {
                summary.unsaved += 1;
            }
        }
        csv_writer.serialize(OutputRow::new(request, outcome))?;
    }

    csv_writer.flush()?;
    Ok(summary)
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().context("usage: quote_batch <requests.csv> [output.csv] [config.json]")?;
    let output = args.next().unwrap_or_else(|| "quote_output.csv".to_string());
    let config = match args.next() {
        Some(path) => UnderwritingConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => UnderwritingConfig::default(),
    };

    let start = Instant::now();
    println!("Loading requests from {}...", input);
    let requests = load_requests(&input).map_err(|e| anyhow::anyhow!("loading {}: {}", input, e))?;
    println!("Loaded {} requests in {:?}", requests.len(), start.elapsed());

    let service = QuoteService::from_config(&config)?;

    println!("Pricing...");
    let price_start = Instant::now();
    let outcomes = service.quote_batch(&requests);
    println!("Priced {} requests in {:?}", outcomes.len(), price_start.elapsed());

    let file = std::fs::File::create(&output).with_context(|| format!("creating {}", output))?;
    let summary = write_outputs(file, &requests, &outcomes)?;

    println!("\nSummary:");
    println!("  Requests:      {}", requests.len());
    println!("  Priced:        {}", summary.priced);
    println!("  Failed:        {}", requests.len() - summary.priced);
    println!("  Not stored:    {}", summary.unsaved);
    println!("\nResults written to: {}", output);

    Ok(())
}
