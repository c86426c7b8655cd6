//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the reader thread and scoring workers
//! - merged in any order on the orchestrating thread
//! - exported to JSON after a run

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// One loan as read from the source: an untyped field -> value mapping.
pub type RawRecord = Map<String, Value>;

/// A bounded run of source elements scored together by one worker.
///
/// Elements are kept as `Value` so that a non-object element is counted as an
/// invalid record instead of aborting the read.
pub type RecordBatch = Vec<Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    #[default]
    Fixed,
    Adjustable,
}

impl LoanType {
    pub const ALL: [LoanType; 2] = [LoanType::Fixed, LoanType::Adjustable];

    pub fn as_str(self) -> &'static str {
        match self {
            LoanType::Fixed => "fixed",
            LoanType::Adjustable => "adjustable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    #[default]
    SingleFamily,
    Condo,
}

impl PropertyType {
    pub const ALL: [PropertyType; 2] = [PropertyType::SingleFamily, PropertyType::Condo];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::SingleFamily => "single_family",
            PropertyType::Condo => "condo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Final portfolio rating.
///
/// `C` covers both "high risk" and "no usable data"; use
/// `PortfolioSummary::valid_count` to tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "BBB")]
    Bbb,
    #[serde(rename = "C")]
    C,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Aaa => "AAA",
            Rating::Bbb => "BBB",
            Rating::C => "C",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Additive summary of one scored batch.
///
/// Merging is field-wise summation, so any grouping or ordering of batch
/// results produces the same totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub total_risk: i64,
    pub credit_score_sum: i64,
    pub valid_count: u64,
    pub invalid_count: u64,
}

impl Add for BatchResult {
    type Output = BatchResult;

    fn add(mut self, rhs: BatchResult) -> BatchResult {
        self += rhs;
        self
    }
}

impl AddAssign for BatchResult {
    fn add_assign(&mut self, rhs: BatchResult) {
        self.total_risk += rhs.total_risk;
        self.credit_score_sum += rhs.credit_score_sum;
        self.valid_count += rhs.valid_count;
        self.invalid_count += rhs.invalid_count;
    }
}

impl Sum for BatchResult {
    fn sum<I: Iterator<Item = BatchResult>>(iter: I) -> Self {
        iter.fold(BatchResult::default(), Add::add)
    }
}

/// Run-level knobs. All have defaults; see `RatingConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Maximum number of records per batch (last batch may be smaller).
    pub chunk_size: usize,
    /// Invalid-record ratio above which an error-level diagnostic is emitted.
    pub rejection_threshold: f64,
    /// Lower bound on the worker count.
    pub min_workers: usize,
    /// Cores left free for the orchestrator and the rest of the host.
    pub reserve_cores: usize,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2,
            rejection_threshold: 0.3,
            min_workers: 1,
            reserve_cores: 1,
        }
    }
}

impl RatingConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.chunk_size == 0 {
            return Err(AppError::new(2, "Chunk size must be >= 1."));
        }
        if !(0.0..=1.0).contains(&self.rejection_threshold) {
            return Err(AppError::new(
                2,
                format!(
                    "Rejection threshold must be within [0, 1], got {}.",
                    self.rejection_threshold
                ),
            ));
        }
        if self.min_workers == 0 {
            return Err(AppError::new(2, "Minimum worker count must be >= 1."));
        }
        if self.min_workers > rayon::max_num_threads() {
            return Err(AppError::new(
                2,
                format!(
                    "Minimum worker count must be <= {}, got {}.",
                    rayon::max_num_threads(),
                    self.min_workers
                ),
            ));
        }
        Ok(())
    }
}

/// Everything a rating run produced, for reporting and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub rating: Rating,
    /// Risk score after the average-credit-score adjustment.
    pub total_risk_score: i64,
    pub credit_score_sum: i64,
    pub valid_count: u64,
    pub invalid_count: u64,
    /// `None` when no records were seen at all.
    pub invalid_ratio: Option<f64>,
    /// `None` when there were no valid records.
    pub average_credit_score: Option<f64>,
    /// True when `invalid_ratio` exceeded the configured rejection threshold.
    pub quality_alert: bool,
    pub batches: usize,
    pub workers: usize,
    pub elapsed_ms: u128,
    pub generated_at: DateTime<Utc>,
}
