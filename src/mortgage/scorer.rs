//! Pluggable record scorer.
//!
//! The batch processor only sees this trait, so alternate scoring models (or
//! test doubles with different thresholds) can be injected into a run.

use serde_json::Value;

use crate::error::RecordError;
use crate::mortgage::{Mortgage, MortgageScore};
use crate::rules::RuleBook;

/// Validate and score one raw source element.
///
/// Implementations are shared by every worker of a run and must not hold
/// mutable state.
pub trait MortgageScorer: Send + Sync {
    fn score(&self, record: &Value) -> Result<MortgageScore, RecordError>;
}

/// Default scorer: `ValidationRules` then the five-part `RiskParams` sum.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedScorer {
    rules: RuleBook,
}

impl RuleBasedScorer {
    pub fn new(rules: RuleBook) -> Self {
        Self { rules }
    }
}

impl MortgageScorer for RuleBasedScorer {
    fn score(&self, record: &Value) -> Result<MortgageScore, RecordError> {
        let object = record.as_object().ok_or_else(|| RecordError::NotAnObject {
            value: record.to_string(),
        })?;
        let mortgage = Mortgage::from_record(object, &self.rules.validation)?;
        mortgage.calculate_total_risk(&self.rules.risk)
    }
}
