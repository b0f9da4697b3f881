//! End-to-end quoting against a SQLite database

use approx::assert_relative_eq;
use motor_underwriting::pricing::VehicleUse;
use motor_underwriting::rates::ingest_csv;
use motor_underwriting::store::Database;
use motor_underwriting::{
    PredictionSource, QuoteError, QuoteRequest, QuoteService, RiskProfile, SqliteRateStore,
    SqliteResultStore, UnderwritingConfig,
};
use std::path::PathBuf;

const HISTORY: &str = "\
VEHICLE MAKE,VEHICLE MODEL,VEHICLE MAKE YEAR,SUM INSURED,PREMIUM,RATE
Toyota,Corolla,2019,500000,17500,3.5
Toyota,Corolla,2021,500000,22500,4.5
TOYOTA,COROLLA,2020,500000,20000,4.0
Honda,Civic,2018,900000,36000,4.0
";

const MODEL: &str = "\
term,coefficient
intercept,400
SUM INSURED,0.002
vehicle_age,10
VEHICLE MAKE=Suzuki,-50
";

fn temp_path(name: &str, extension: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "motor-underwriting-it-{}-{}.{}",
        name,
        std::process::id(),
        extension
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn setup(name: &str, with_model: bool) -> UnderwritingConfig {
    let model_path = if with_model {
        let path = temp_path(name, "csv");
        std::fs::write(&path, MODEL).unwrap();
        Some(path)
    } else {
        None
    };

    let config = UnderwritingConfig {
        database_path: temp_path(name, "db"),
        model_path,
        valuation_year: Some(2025),
        ..Default::default()
    };

    let rates = SqliteRateStore::new(Database::new(&config.database_path), &config.rates_table).unwrap();
    assert_eq!(ingest_csv(&rates, HISTORY.as_bytes()).unwrap(), 4);
    config
}

#[test]
fn test_historical_quote_is_priced_and_stored() {
    let config = setup("historical", true);
    let service = QuoteService::from_config(&config).unwrap();

    let request = QuoteRequest::new("toyota", " corolla ", 2020, 500_000.0, RiskProfile::Low);
    let outcome = service.quote(&request).unwrap();
    let result = &outcome.result;

    assert_eq!(result.source, PredictionSource::Historical);
    assert_eq!(result.historical.range(), Some((3.5, 4.5)));
    assert_relative_eq!(result.predicted_premium, 20_000.0, epsilon = 1e-6);
    assert_relative_eq!(result.predicted_rate, 4.0, epsilon = 1e-9);
    assert_relative_eq!(result.final_premium, 21_000.0, epsilon = 1e-6);
    assert_relative_eq!(result.final_rate, 4.2, epsilon = 1e-9);

    let id = *outcome.persistence.as_ref().unwrap();
    let store = SqliteResultStore::new(Database::new(&config.database_path), &config.results_table).unwrap();
    let stored = store.recent(5).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, id);
    assert_eq!(stored[0].request.vehicle_model, "corolla");
    assert_eq!(stored[0].result.source, PredictionSource::Historical);
    assert_eq!(stored[0].result.historical, result.historical);
    assert_eq!(stored[0].result.final_premium, result.final_premium);
    // timestamps are stored at microsecond precision
    let drift = result.created_at - stored[0].result.created_at;
    assert!(drift.num_milliseconds().abs() < 1);
}

#[test]
fn test_unknown_vehicle_uses_model() {
    let config = setup("fallback", true);
    let service = QuoteService::from_config(&config).unwrap();

    // 400 + 0.002 * 600000 + 10 * 3 - 50 = 1580 per month
    let request = QuoteRequest::new("Suzuki", "Swift", 2022, 600_000.0, RiskProfile::High);
    let outcome = service.quote(&request).unwrap();
    let result = &outcome.result;

    assert_eq!(result.source, PredictionSource::ModelFallback);
    assert_relative_eq!(result.predicted_premium, 1_580.0 * 12.0, epsilon = 1e-6);
    assert_eq!(result.age_multiplier, 1.0);
    assert_relative_eq!(result.final_premium, 1_580.0 * 12.0 * 1.15, epsilon = 1e-6);
    assert!(outcome.is_persisted());
}

#[test]
fn test_unknown_vehicle_without_model_fails_and_stores_nothing() {
    let config = setup("no-model", false);
    let service = QuoteService::from_config(&config).unwrap();

    let request = QuoteRequest::new("Lada", "Niva", 2015, 300_000.0, RiskProfile::Low);
    assert!(matches!(service.quote(&request), Err(QuoteError::ModelUnavailable(_))));
    assert!(service.store().recent(10).unwrap().is_empty());
}

#[test]
fn test_batch_quotes() {
    let config = setup("batch", true);
    let service = QuoteService::from_config(&config).unwrap();

    let requests = vec![
        QuoteRequest::new("Toyota", "Corolla", 2020, 500_000.0, RiskProfile::Low),
        QuoteRequest::new("Honda", "Civic", 2010, 900_000.0, RiskProfile::from_label("Moderate to High")),
        QuoteRequest::new("Toyota", "Corolla", 2020, 0.0, RiskProfile::Low),
        QuoteRequest::new("Suzuki", "Swift", 2024, 400_000.0, RiskProfile::LowToModerate),
    ];
    let outcomes = service.quote_batch(&requests);

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[0].is_ok());
    assert!(matches!(outcomes[2], Err(QuoteError::InvalidInput { .. })));

    let civic = outcomes[1].as_ref().unwrap();
    // age 15 → ×1.25, then +10%
    assert_relative_eq!(civic.result.final_premium, 36_000.0 * 1.25 * 1.10, epsilon = 1e-6);

    let suzuki = outcomes[3].as_ref().unwrap();
    assert_eq!(suzuki.result.source, PredictionSource::ModelFallback);
    assert_eq!(suzuki.result.age_multiplier, 0.85);

    assert_eq!(service.store().recent(10).unwrap().len(), 3);
}

#[test]
fn test_scored_profile_and_non_ascii_make() {
    let config = setup("scored", false);
    let rates = SqliteRateStore::new(Database::new(&config.database_path), &config.rates_table).unwrap();
    ingest_csv(&rates, "vehicle_make,vehicle_model,rate\nŠkoda,Octavia,5.0\n".as_bytes()).unwrap();
    let service = QuoteService::from_config(&config).unwrap();

    let mut request = QuoteRequest::new("ŠKODA", "octavia", 2017, 1_000_000.0, RiskProfile::Low);
    // commercial 1.0 + age 8 0.8 + 1M 0.6 + driver 40 0.4 = 2.8
    let assessment = service.estimator().assess_risk(&request, VehicleUse::Commercial, 40);
    assert_eq!(assessment.profile, RiskProfile::ModerateToHigh);
    request.risk_profile = assessment.profile;

    let outcome = service.quote(&request).unwrap();
    let result = &outcome.result;
    assert_eq!(result.source, PredictionSource::Historical);
    assert_relative_eq!(result.predicted_premium, 50_000.0, epsilon = 1e-6);
    assert_eq!(result.age_multiplier, 1.10);
    assert_relative_eq!(result.final_premium, 50_000.0 * 1.10 * 1.10, epsilon = 1e-6);

    let stored = service.store().recent(1).unwrap();
    assert_eq!(stored[0].request.risk_profile, RiskProfile::ModerateToHigh);
    assert_eq!(stored[0].result.risk_surcharge, 0.10);
}
