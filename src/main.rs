//! Motor Underwriting CLI
//!
//! Ingest historical rates, price vehicles, score risk and review stored quotes

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use motor_underwriting::pricing::risk_score::{assess, RiskFactors, VehicleUse};
use motor_underwriting::rates::ingest_csv_path;
use motor_underwriting::{
    QuoteRequest, QuoteService, RiskProfile, SqliteRateStore, SqliteResultStore, UnderwritingConfig,
};
use motor_underwriting::store::Database;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "underwrite", version, about = "Motor insurance premium quoting")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database (overrides the configuration)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Append a CSV of historical policies to the rates table
    Ingest {
        file: PathBuf,
    },

    /// Price a vehicle and store the quote
    Quote {
        #[arg(long)]
        make: String,
        #[arg(long)]
        model: String,
        /// Year of manufacture
        #[arg(long)]
        year: i32,
        #[arg(long)]
        sum_insured: f64,
        /// Low, Low-to-Moderate, Moderate-to-High or High
        #[arg(long)]
        risk: Option<String>,
        /// Driver age; with no --risk, the profile comes from the risk score
        #[arg(long)]
        driver_age: Option<u32>,
        /// personal, commercial or other (used with --driver-age)
        #[arg(long, default_value = "personal")]
        vehicle_use: String,
        /// Coefficient CSV for the fallback model (overrides the configuration)
        #[arg(long)]
        model_file: Option<PathBuf>,
    },

    /// Compute the banded risk score for a vehicle and driver
    Score {
        /// personal, commercial or other
        #[arg(long, default_value = "personal")]
        vehicle_use: String,
        #[arg(long)]
        vehicle_age: i32,
        #[arg(long)]
        sum_insured: f64,
        #[arg(long)]
        driver_age: u32,
    },

    /// Show the most recent stored quotes
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn load_config(cli: &Cli) -> Result<UnderwritingConfig> {
    let mut config = match &cli.config {
        Some(path) => UnderwritingConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => UnderwritingConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;

    match cli.command {
        Command::Ingest { file } => {
            let store = SqliteRateStore::new(Database::new(&config.database_path), &config.rates_table)?;
            let count = ingest_csv_path(&store, &file)
                .with_context(|| format!("ingesting {}", file.display()))?;
            println!("Ingested {} rows from {} into {}", count, file.display(), config.rates_table);
        }

        Command::Quote { make, model, year, sum_insured, risk, driver_age, vehicle_use, model_file } => {
            if model_file.is_some() {
                config.model_path = model_file;
            }
            let service = QuoteService::from_config(&config)?;
            let mut request = QuoteRequest::new(make, model, year, sum_insured, RiskProfile::Low);
            request.risk_profile = match (risk, driver_age) {
                (Some(label), _) => RiskProfile::from_label(&label),
                (None, Some(driver_age)) => {
                    let assessment = service.estimator().assess_risk(
                        &request,
                        VehicleUse::from_label(&vehicle_use),
                        driver_age,
                    );
                    println!("Risk score {:.1} -> {}", assessment.raw_score, assessment.profile);
                    assessment.profile
                }
                (None, None) => RiskProfile::Low,
            };
            let outcome = service.quote(&request)?;
            let result = &outcome.result;

            println!("Motor Insurance Premium Quote");
            println!("=============================\n");
            println!("  Vehicle:      {} {} ({})", request.vehicle_make.trim(), request.vehicle_model.trim(), year);
            println!("  Vehicle Age:  {}", result.vehicle_age);
            println!("  Sum Insured:  {:.2}", request.sum_insured);
            println!("  Risk Profile: {}", request.risk_profile);
            println!();
            if let Some((min, max)) = result.historical.range() {
                println!("  Historical Rate Range:  {:.2}% - {:.2}%", min, max);
            }
            println!("  Predicted Premium:      {:.2} ({:.2}%) [{}]", result.predicted_premium, result.predicted_rate, result.source);
            println!("  Age Adjusted Premium:   {:.2} ({:.2}%) x{:.2}", result.adjusted_premium, result.adjusted_rate, result.age_multiplier);
            println!("  Final Premium:          {:.2} ({:.2}%) +{:.1}% risk", result.final_premium, result.final_rate, result.risk_surcharge * 100.0);
            println!();

            match &outcome.persistence {
                Ok(id) => println!("Quote saved as #{} in {}", id, config.results_table),
                Err(e) => eprintln!("Quote NOT saved: {}", e),
            }
        }

        Command::Score { vehicle_use, vehicle_age, sum_insured, driver_age } => {
            let assessment = assess(&RiskFactors {
                vehicle_use: VehicleUse::from_label(&vehicle_use),
                vehicle_age,
                sum_insured,
                driver_age,
            });
            println!("Risk Score:   {:.1}", assessment.raw_score);
            println!("Risk Profile: {}", assessment.profile);
        }

        Command::History { limit } => {
            let store = SqliteResultStore::new(Database::new(&config.database_path), &config.results_table)?;
            let quotes = store.recent(limit)?;

            println!("{:>5} {:<20} {:<10} {:<20} {:>14} {:>14} {:>8} {:<15}",
                "ID", "Recorded", "Make", "Model", "Sum Insured", "Final Prem", "Rate", "Source");
            println!("{}", "-".repeat(112));
            for quote in &quotes {
                println!("{:>5} {:<20} {:<10} {:<20} {:>14.2} {:>14.2} {:>7.2}% {:<15}",
                    quote.id,
                    quote.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    quote.request.vehicle_make,
                    quote.request.vehicle_model,
                    quote.request.sum_insured,
                    quote.result.final_premium,
                    quote.result.final_rate,
                    quote.result.source.as_str(),
                );
            }
            println!("\n{} quote(s)", quotes.len());
        }
    }

    Ok(())
}
