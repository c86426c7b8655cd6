//! Risk parameter table: ratio thresholds and categorical weights.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{LoanType, PropertyType};
use crate::error::AppError;

/// `(low, high)` pair for a three-tier ratio policy.
///
/// - ratio `<= low` -> 0
/// - ratio in `(low, high]` -> 1
/// - ratio `> high` -> 2
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioThresholds {
    pub low: f64,
    pub high: f64,
}

impl RatioThresholds {
    pub fn tier(&self, ratio: f64) -> i64 {
        if ratio > self.high {
            2
        } else if ratio > self.low {
            1
        } else {
            0
        }
    }
}

/// `(low, high)` credit score pair.
///
/// - score `>= high` -> -1
/// - score `< low` -> +1
/// - otherwise 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditScoreThresholds {
    pub low: i64,
    pub high: i64,
}

impl CreditScoreThresholds {
    pub fn tier(&self, credit_score: i64) -> i64 {
        if credit_score >= self.high {
            -1
        } else if credit_score < self.low {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskParams {
    pub ltv_thresholds: RatioThresholds,
    pub dti_thresholds: RatioThresholds,
    pub credit_score_thresholds: CreditScoreThresholds,
    pub loan_type_weights: BTreeMap<LoanType, i64>,
    pub property_type_weights: BTreeMap<PropertyType, i64>,
}

impl Default for RiskParams {
    fn default() -> Self {
        Self {
            ltv_thresholds: RatioThresholds { low: 0.8, high: 0.9 },
            dti_thresholds: RatioThresholds { low: 0.4, high: 0.5 },
            credit_score_thresholds: CreditScoreThresholds { low: 650, high: 700 },
            loan_type_weights: BTreeMap::from([(LoanType::Fixed, -1), (LoanType::Adjustable, 1)]),
            property_type_weights: BTreeMap::from([
                (PropertyType::SingleFamily, 0),
                (PropertyType::Condo, 1),
            ]),
        }
    }
}

impl RiskParams {
    /// Weight for a loan type; types missing from the table score 0.
    pub fn loan_type_weight(&self, loan_type: LoanType) -> i64 {
        self.loan_type_weights.get(&loan_type).copied().unwrap_or(0)
    }

    /// Weight for a property type; types missing from the table score 0.
    pub fn property_type_weight(&self, property_type: PropertyType) -> i64 {
        self.property_type_weights
            .get(&property_type)
            .copied()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (name, t) in [("ltv", self.ltv_thresholds), ("dti", self.dti_thresholds)] {
            if !(t.low.is_finite() && t.high.is_finite()) || t.low > t.high {
                return Err(AppError::new(
                    2,
                    format!("Invalid {name} thresholds: low {} must be <= high {}.", t.low, t.high),
                ));
            }
        }
        let cs = self.credit_score_thresholds;
        if cs.low > cs.high {
            return Err(AppError::new(
                2,
                format!(
                    "Invalid credit score thresholds: low {} must be <= high {}.",
                    cs.low, cs.high
                ),
            ));
        }
        Ok(())
    }
}
