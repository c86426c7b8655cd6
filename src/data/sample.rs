//! Synthetic mortgage portfolio generation.
//!
//! Generated records use the ranges of a typical stress run:
//! credit 500-850, loan 100k-500k, value 150k-600k, income 40k-150k,
//! debt 10k-50k. An optional fraction is deliberately broken so the
//! data-quality path can be exercised.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::{LoanType, PropertyType};
use crate::error::AppError;
use crate::io::source::SourceFormat;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    /// Fraction of records to corrupt, in `[0, 1]`.
    pub invalid_ratio: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 1_000,
            seed: 42,
            invalid_ratio: 0.0,
        }
    }
}

pub fn generate_sample(config: &SampleConfig) -> Result<Vec<Value>, AppError> {
    if !(0.0..=1.0).contains(&config.invalid_ratio) {
        return Err(AppError::new(2, "Invalid ratio must be within [0, 1]."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let records = (0..config.count)
        .map(|_| {
            let record = well_formed(&mut rng);
            if config.invalid_ratio > 0.0 && rng.gen_bool(config.invalid_ratio) {
                corrupt(record, &mut rng)
            } else {
                record
            }
        })
        .collect();

    Ok(records)
}

fn well_formed(rng: &mut StdRng) -> Value {
    let loan_type = LoanType::ALL[rng.gen_range(0..LoanType::ALL.len())];
    let property_type = PropertyType::ALL[rng.gen_range(0..PropertyType::ALL.len())];
    json!({
        "credit_score": rng.gen_range(500..=850),
        "loan_amount": rng.gen_range(100_000..=500_000),
        "property_value": rng.gen_range(150_000..=600_000),
        "annual_income": rng.gen_range(40_000..=150_000),
        "debt_amount": rng.gen_range(10_000..=50_000),
        "loan_type": loan_type.as_str(),
        "property_type": property_type.as_str(),
    })
}

fn corrupt(mut record: Value, rng: &mut StdRng) -> Value {
    let Some(fields) = record.as_object_mut() else {
        return record;
    };
    match rng.gen_range(0..4) {
        0 => {
            fields.remove("annual_income");
        }
        1 => {
            fields.insert("credit_score".to_string(), json!(900));
        }
        2 => {
            fields.insert("loan_type".to_string(), json!("balloon"));
        }
        _ => {
            fields.insert("property_value".to_string(), json!("unknown"));
        }
    }
    record
}

#[derive(Serialize)]
struct SampleDocument<'a> {
    mortgages: &'a [Value],
}

/// Write records as a `{"mortgages": [...]}` document, or as JSON Lines when
/// the path ends in `.jsonl` / `.ndjson`.
pub fn write_sample(path: &Path, records: &[Value]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(3, format!("Failed to create sample '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    let write_err = |e: std::io::Error| AppError::new(3, format!("Failed to write sample: {e}"));

    match SourceFormat::from_path(path) {
        SourceFormat::JsonLines => {
            for record in records {
                serde_json::to_writer(&mut out, record)
                    .map_err(|e| AppError::new(3, format!("Failed to write sample: {e}")))?;
                out.write_all(b"\n").map_err(write_err)?;
            }
        }
        SourceFormat::Document => {
            serde_json::to_writer_pretty(&mut out, &SampleDocument { mortgages: records })
                .map_err(|e| AppError::new(3, format!("Failed to write sample: {e}")))?;
        }
    }

    out.flush().map_err(write_err)
}
