//! Accumulated portfolio state and the rating policy applied to it.

use crate::diagnostics::DiagnosticSink;
use crate::domain::{BatchResult, Rating};

/// Average credit score at or above which the portfolio risk is reduced by 1.
pub const REWARD_AVERAGE_CREDIT: f64 = 700.0;
/// Average credit score below which the portfolio risk is increased by 1.
pub const PENALTY_AVERAGE_CREDIT: f64 = 650.0;

/// Running totals for one rating run.
///
/// Only the orchestrating thread touches this, after all batches returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortfolioState {
    pub total_risk_score: i64,
    pub credit_score_sum: i64,
    pub valid_count: u64,
    pub invalid_count: u64,
}

/// Outcome of the data-quality check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QualityCheck {
    /// No records at all; nothing to judge.
    Skipped,
    Passed { invalid_ratio: f64 },
    /// Advisory only: the rating is still computed.
    Alert { invalid_ratio: f64 },
}

impl QualityCheck {
    pub fn invalid_ratio(&self) -> Option<f64> {
        match self {
            QualityCheck::Skipped => None,
            QualityCheck::Passed { invalid_ratio } | QualityCheck::Alert { invalid_ratio } => {
                Some(*invalid_ratio)
            }
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, QualityCheck::Alert { .. })
    }
}

/// Seed the state from the merged (summed) batch results of a run.
impl From<BatchResult> for PortfolioState {
    fn from(merged: BatchResult) -> Self {
        Self {
            total_risk_score: merged.total_risk,
            credit_score_sum: merged.credit_score_sum,
            valid_count: merged.valid_count,
            invalid_count: merged.invalid_count,
        }
    }
}

impl PortfolioState {
    pub fn total_records(&self) -> u64 {
        self.valid_count + self.invalid_count
    }

    pub fn average_credit_score(&self) -> Option<f64> {
        (self.valid_count > 0).then(|| self.credit_score_sum as f64 / self.valid_count as f64)
    }

    /// Compare the invalid ratio with `rejection_threshold` and report.
    pub fn check_data_quality(&self, rejection_threshold: f64, sink: &dyn DiagnosticSink) -> QualityCheck {
        let total = self.total_records();
        if total == 0 {
            sink.warn("No mortgage records available for data quality check.");
            return QualityCheck::Skipped;
        }

        let invalid_ratio = self.invalid_count as f64 / total as f64;
        if invalid_ratio > rejection_threshold {
            sink.error(&format!(
                "High invalid data rate: {:.2}%. Please review the input data/file!",
                invalid_ratio * 100.0
            ));
            QualityCheck::Alert { invalid_ratio }
        } else {
            QualityCheck::Passed { invalid_ratio }
        }
    }

    /// Reward a strong average credit score, penalize a weak one.
    ///
    /// Returns the adjustment applied to `total_risk_score`.
    pub fn apply_average_adjustment(&mut self) -> i64 {
        let Some(average) = self.average_credit_score() else {
            return 0;
        };
        let delta = if average >= REWARD_AVERAGE_CREDIT {
            -1
        } else if average < PENALTY_AVERAGE_CREDIT {
            1
        } else {
            0
        };
        self.total_risk_score += delta;
        delta
    }

    pub fn rating(&self) -> Rating {
        classify(self.valid_count, self.total_risk_score)
    }
}

/// Map `(valid_count, total_risk_score)` to a rating.
///
/// - no valid records -> C
/// - score <= 2 (including negative) -> AAA
/// - 3..=5 -> BBB
/// - otherwise -> C
pub fn classify(valid_count: u64, total_risk_score: i64) -> Rating {
    if valid_count == 0 {
        return Rating::C;
    }
    match total_risk_score {
        i64::MIN..=2 => Rating::Aaa,
        3..=5 => Rating::Bbb,
        _ => Rating::C,
    }
}
