//! AWS Lambda handler for single premium quotes
//!
//! Accepts a quote request as JSON and returns the computed quote, whether it
//! was stored, and any error. Set `UNDERWRITING_CONFIG` to a JSON configuration
//! file; otherwise defaults are used.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use motor_underwriting::pricing::VehicleUse;
use motor_underwriting::{
    QuoteError, QuoteRequest, QuoteResult, QuoteService, RiskProfile, SqliteRateStore,
    SqliteResultStore, UnderwritingConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Input payload
#[derive(Debug, Deserialize)]
pub struct QuoteEvent {
    pub vehicle_make: String,
    pub vehicle_model: String,
    #[serde(alias = "vehicle_make_year")]
    pub manufacture_year: i32,
    pub sum_insured: f64,
    /// Explicit risk label; takes precedence over the risk score
    #[serde(default)]
    pub risk_profile: Option<String>,
    /// Scored into a risk profile when no label is given
    #[serde(default)]
    pub driver_age: Option<u32>,
    #[serde(default = "default_vehicle_use")]
    pub vehicle_use: String,
}

fn default_vehicle_use() -> String { "personal".to_string() }

/// Output payload
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteResult>,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    pub execution_time_ms: u64,
}

fn error_kind(error: &QuoteError) -> &'static str {
    match error {
        QuoteError::LookupUnavailable(_) => "lookup_unavailable",
        QuoteError::ModelUnavailable(_) => "model_unavailable",
        QuoteError::PersistenceFailure(_) => "persistence_failure",
        QuoteError::InvalidInput { .. } => "invalid_input",
        QuoteError::Config(_) => "config",
        QuoteError::Ingest(_) => "ingest",
    }
}

type Service = QuoteService<SqliteRateStore, SqliteResultStore>;

fn request_for(service: &Service, event: QuoteEvent) -> QuoteRequest {
    let mut request = QuoteRequest::new(
        event.vehicle_make,
        event.vehicle_model,
        event.manufacture_year,
        event.sum_insured,
        RiskProfile::Low,
    );
    request.risk_profile = match (event.risk_profile, event.driver_age) {
        (Some(label), _) => RiskProfile::from_label(&label),
        (None, Some(driver_age)) => {
            service
                .estimator()
                .assess_risk(&request, VehicleUse::from_label(&event.vehicle_use), driver_age)
                .profile
        }
        (None, None) => RiskProfile::Low,
    };
    request
}

fn respond(outcome: motor_underwriting::Result<motor_underwriting::QuoteOutcome>, start: std::time::Instant) -> QuoteResponse {
    match outcome {
        Ok(outcome) => {
            let (record_id, persistence_error) = match &outcome.persistence {
                Ok(id) => (Some(*id), None),
                Err(e) => (None, Some(e.to_string())),
            };
            QuoteResponse {
                quote: Some(outcome.result),
                persisted: record_id.is_some(),
                record_id,
                persistence_error,
                error: None,
                error_kind: None,
                execution_time_ms: start.elapsed().as_millis() as u64,
            }
        }
        Err(e) => QuoteResponse {
            quote: None,
            persisted: false,
            record_id: None,
            persistence_error: None,
            error_kind: Some(error_kind(&e)),
            error: Some(e.to_string()),
            execution_time_ms: start.elapsed().as_millis() as u64,
        },
    }
}

async fn handler(service: Arc<Service>, event: LambdaEvent<QuoteEvent>) -> Result<QuoteResponse, Error> {
    let start = std::time::Instant::now();
    let payload = event.payload;

    // SQLite calls block
    let outcome = tokio::task::spawn_blocking(move || {
        let request = request_for(&service, payload);
        service.quote(&request)
    })
    .await?;

    Ok(respond(outcome, start))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let config = match std::env::var("UNDERWRITING_CONFIG") {
        Ok(path) => UnderwritingConfig::load(path)?,
        Err(_) => UnderwritingConfig::default(),
    };
    let service = Arc::new(QuoteService::from_config(&config)?);

    run(service_fn(move |event: LambdaEvent<QuoteEvent>| {
        let service = Arc::clone(&service);
        async move { handler(service, event).await }
    }))
    .await
}
