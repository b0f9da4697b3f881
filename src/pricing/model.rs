//! Fallback premium model used when no historical rate exists
//!
//! The model sees a fixed-shape feature vector: every declared column defaulted
//! to zero, with the five canonical vehicle fields written over the defaults.

use crate::error::{QuoteError, Result};
use crate::vehicle::QuoteRequest;
use csv::ReaderBuilder;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const FEATURE_MAKE: &str = "VEHICLE MAKE";
pub const FEATURE_MODEL: &str = "VEHICLE MODEL";
pub const FEATURE_MAKE_YEAR: &str = "VEHICLE MAKE YEAR";
pub const FEATURE_SUM_INSURED: &str = "SUM INSURED";
pub const FEATURE_VEHICLE_AGE: &str = "vehicle_age";

/// A single model input value
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(n) => write!(f, "{}", n),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// Ordered named feature values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, FeatureValue)>,
}

impl FeatureVector {
    /// All declared columns set to zero
    pub fn zeroed(columns: &[String]) -> Self {
        Self {
            entries: columns
                .iter()
                .map(|c| (c.clone(), FeatureValue::Number(0.0)))
                .collect(),
        }
    }

    /// Declared columns zeroed, canonical vehicle fields overwritten
    pub fn for_request(columns: &[String], request: &QuoteRequest, vehicle_age: i32) -> Self {
        let mut features = Self::zeroed(columns);
        features.set(FEATURE_MAKE, FeatureValue::Text(request.vehicle_make.clone()));
        features.set(FEATURE_MODEL, FeatureValue::Text(request.vehicle_model.clone()));
        features.set(FEATURE_MAKE_YEAR, FeatureValue::Number(request.manufacture_year as f64));
        features.set(FEATURE_SUM_INSURED, FeatureValue::Number(request.sum_insured));
        features.set(FEATURE_VEHICLE_AGE, FeatureValue::Number(vehicle_age as f64));
        features
    }

    /// Overwrite a column, appending it if undeclared
    pub fn set(&mut self, column: &str, value: FeatureValue) {
        match self.entries.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        self.entries.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

/// Pre-trained regression returning a monthly premium
pub trait PremiumModel: Send + Sync {
    /// Columns the model was trained on
    fn feature_columns(&self) -> &[String];

    /// Predicted monthly premium for one vehicle
    fn predict_monthly(&self, features: &FeatureVector) -> Result<f64>;

    fn name(&self) -> &str {
        "premium-model"
    }
}

/// One coefficient of a linear predictor
#[derive(Debug, Clone, PartialEq)]
enum Term {
    Intercept(f64),
    /// coefficient × numeric column value
    Numeric { column: String, coefficient: f64 },
    /// coefficient when a text column equals the level (case-insensitive)
    Indicator { column: String, level: String, coefficient: f64 },
}

/// Linear premium model read from a `term,coefficient` table
///
/// Term names: `intercept`, a numeric column name (e.g. `SUM INSURED`), or
/// `COLUMN=level` for a categorical indicator (e.g. `VEHICLE MAKE=Toyota`).
#[derive(Debug, Clone)]
pub struct CoefficientModel {
    terms: Vec<Term>,
    columns: Vec<String>,
}

impl CoefficientModel {
    /// Load coefficients from a CSV file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| QuoteError::ModelUnavailable(format!("cannot open {}: {}", path.display(), e)))?;
        Self::from_reader(file)
    }

    /// Load coefficients from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().from_reader(reader);
        let mut terms = Vec::new();

        for result in csv_reader.records() {
            let record = result.map_err(|e| QuoteError::ModelUnavailable(e.to_string()))?;
            let name = record.get(0).unwrap_or("").trim();
            let raw = record.get(1).unwrap_or("").trim();
            let coefficient: f64 = raw.parse().map_err(|_| {
                QuoteError::ModelUnavailable(format!("bad coefficient {:?} for term {:?}", raw, name))
            })?;
            terms.push(Self::parse_term(name, coefficient)?);
        }

        if terms.is_empty() {
            return Err(QuoteError::ModelUnavailable("coefficient table is empty".to_string()));
        }
        Ok(Self::from_terms(terms))
    }

    fn parse_term(name: &str, coefficient: f64) -> Result<Term> {
        if name.is_empty() {
            return Err(QuoteError::ModelUnavailable("empty term name".to_string()));
        }
        if name.eq_ignore_ascii_case("intercept") {
            return Ok(Term::Intercept(coefficient));
        }
        Ok(match name.split_once('=') {
            Some((column, level)) => Term::Indicator {
                column: column.trim().to_string(),
                level: level.trim().to_string(),
                coefficient,
            },
            None => Term::Numeric {
                column: name.to_string(),
                coefficient,
            },
        })
    }

    fn from_terms(terms: Vec<Term>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for term in &terms {
            let column = match term {
                Term::Intercept(_) => continue,
                Term::Numeric { column, .. } | Term::Indicator { column, .. } => column,
            };
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
        Self { terms, columns }
    }
}

impl PremiumModel for CoefficientModel {
    fn feature_columns(&self) -> &[String] {
        &self.columns
    }

    fn predict_monthly(&self, features: &FeatureVector) -> Result<f64> {
        let mut prediction = 0.0;
        for term in &self.terms {
            prediction += match term {
                Term::Intercept(c) => *c,
                Term::Numeric { column, coefficient } => match features.get(column) {
                    Some(FeatureValue::Number(x)) => coefficient * x,
                    Some(FeatureValue::Text(s)) => {
                        return Err(QuoteError::ModelUnavailable(format!(
                            "column {:?} expects a number, got {:?}",
                            column, s
                        )))
                    }
                    None => 0.0,
                },
                Term::Indicator { column, level, coefficient } => match features.get(column) {
                    Some(FeatureValue::Text(s)) if s.trim().eq_ignore_ascii_case(level) => *coefficient,
                    _ => 0.0,
                },
            };
        }
        Ok(prediction)
    }

    fn name(&self) -> &str {
        "coefficient-model"
    }
}
