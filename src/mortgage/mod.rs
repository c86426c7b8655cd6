//! A single validated mortgage and its rule-based risk score.
//!
//! A `Mortgage` only exists for records that passed every validation rule.
//! Scoring is a sum of five independent sub-scores read from `RiskParams`.

pub mod scorer;

pub use scorer::*;

use serde_json::Value;

use crate::domain::{LoanType, PropertyType, RawRecord};
use crate::error::RecordError;
use crate::rules::{RiskParams, ValidationRules};

#[derive(Debug, Clone, PartialEq)]
pub struct Mortgage {
    pub credit_score: i64,
    pub loan_amount: f64,
    pub property_value: f64,
    pub annual_income: f64,
    pub debt_amount: f64,
    pub loan_type: LoanType,
    pub property_type: PropertyType,
}

/// Risk and credit score contributed by one mortgage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MortgageScore {
    pub risk_score: i64,
    pub credit_score: i64,
}

impl Mortgage {
    /// Validate `record` and build a typed mortgage from it.
    pub fn from_record(record: &RawRecord, rules: &ValidationRules) -> Result<Self, RecordError> {
        rules.check(record)?;

        Ok(Self {
            credit_score: integer_field(record, "credit_score")?,
            loan_amount: number_field(record, "loan_amount")?,
            property_value: number_field(record, "property_value")?,
            annual_income: number_field(record, "annual_income")?,
            debt_amount: number_field(record, "debt_amount")?,
            loan_type: category_field(record, "loan_type", LoanType::from_name)?.unwrap_or_default(),
            property_type: category_field(record, "property_type", PropertyType::from_name)?
                .unwrap_or_default(),
        })
    }

    pub fn ltv_risk(&self, params: &RiskParams) -> Result<i64, RecordError> {
        let ltv = ratio(self.loan_amount, self.property_value, "ltv")?;
        Ok(params.ltv_thresholds.tier(ltv))
    }

    pub fn dti_risk(&self, params: &RiskParams) -> Result<i64, RecordError> {
        let dti = ratio(self.debt_amount, self.annual_income, "dti")?;
        Ok(params.dti_thresholds.tier(dti))
    }

    pub fn credit_score_risk(&self, params: &RiskParams) -> i64 {
        params.credit_score_thresholds.tier(self.credit_score)
    }

    pub fn loan_type_risk(&self, params: &RiskParams) -> i64 {
        params.loan_type_weight(self.loan_type)
    }

    pub fn property_type_risk(&self, params: &RiskParams) -> i64 {
        params.property_type_weight(self.property_type)
    }

    /// Sum of the five sub-scores, paired with the credit score.
    ///
    /// Fails only on a zero LTV/DTI denominator, which the default rules
    /// already reject at validation time.
    pub fn calculate_total_risk(&self, params: &RiskParams) -> Result<MortgageScore, RecordError> {
        let risk_score = self.ltv_risk(params)?
            + self.dti_risk(params)?
            + self.credit_score_risk(params)
            + self.loan_type_risk(params)
            + self.property_type_risk(params);

        Ok(MortgageScore {
            risk_score,
            credit_score: self.credit_score,
        })
    }
}

fn ratio(numerator: f64, denominator: f64, name: &'static str) -> Result<f64, RecordError> {
    if denominator == 0.0 {
        return Err(RecordError::ZeroDenominator { ratio: name });
    }
    Ok(numerator / denominator)
}

fn invalid_type(field: &str, value: &Value) -> RecordError {
    RecordError::InvalidType {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn required<'a>(record: &'a RawRecord, field: &str) -> Result<&'a Value, RecordError> {
    record.get(field).ok_or_else(|| RecordError::MissingField {
        field: field.to_string(),
    })
}

fn integer_field(record: &RawRecord, field: &str) -> Result<i64, RecordError> {
    let value = required(record, field)?;
    value.as_i64().ok_or_else(|| invalid_type(field, value))
}

fn number_field(record: &RawRecord, field: &str) -> Result<f64, RecordError> {
    let value = required(record, field)?;
    value.as_f64().ok_or_else(|| invalid_type(field, value))
}

fn category_field<T>(
    record: &RawRecord,
    field: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<Option<T>, RecordError> {
    let Some(value) = record.get(field) else {
        return Ok(None);
    };
    let text = value.as_str().ok_or_else(|| invalid_type(field, value))?;
    parse(text).map(Some).ok_or_else(|| RecordError::InvalidOption {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mortgage(value: Value) -> Result<Mortgage, RecordError> {
        let record = value.as_object().cloned().unwrap();
        Mortgage::from_record(&record, &ValidationRules::default())
    }

    fn score(value: Value) -> i64 {
        mortgage(value)
            .unwrap()
            .calculate_total_risk(&RiskParams::default())
            .unwrap()
            .risk_score
    }

    #[test]
    fn builds_typed_mortgage_with_defaults() {
        let m = mortgage(json!({
            "credit_score": 690,
            "loan_amount": 200000,
            "property_value": 250000.5,
            "annual_income": 90000,
            "debt_amount": 12000
        }))
        .unwrap();

        assert_eq!(m.credit_score, 690);
        assert_eq!(m.property_value, 250000.5);
        assert_eq!(m.loan_type, LoanType::Fixed);
        assert_eq!(m.property_type, PropertyType::SingleFamily);
    }

    #[test]
    fn invalid_record_is_an_error_not_a_panic() {
        let err = mortgage(json!({
            "credit_score": 900,
            "loan_amount": 200000,
            "property_value": 250000,
            "annual_income": 90000,
            "debt_amount": 12000
        }))
        .unwrap_err();
        assert_eq!(err.field(), Some("credit_score"));
    }

    #[test]
    fn sub_scores_for_high_risk_record() {
        let m = mortgage(json!({
            "credit_score": 500,
            "loan_amount": 400000,
            "property_value": 410000,
            "annual_income": 30000,
            "debt_amount": 25000,
            "loan_type": "adjustable",
            "property_type": "condo"
        }))
        .unwrap();
        let params = RiskParams::default();

        assert_eq!(m.ltv_risk(&params).unwrap(), 2);
        assert_eq!(m.dti_risk(&params).unwrap(), 2);
        assert_eq!(m.credit_score_risk(&params), 1);
        assert_eq!(m.loan_type_risk(&params), 1);
        assert_eq!(m.property_type_risk(&params), 1);
        assert_eq!(
            m.calculate_total_risk(&params).unwrap(),
            MortgageScore {
                risk_score: 7,
                credit_score: 500
            }
        );
    }

    #[test]
    fn total_risk_for_reference_records() {
        assert_eq!(
            score(json!({
                "credit_score": 720, "loan_amount": 250000, "property_value": 300000,
                "annual_income": 85000, "debt_amount": 20000,
                "loan_type": "fixed", "property_type": "single_family"
            })),
            -1
        );
        assert_eq!(
            score(json!({
                "credit_score": 680, "loan_amount": 350000, "property_value": 400000,
                "annual_income": 95000, "debt_amount": 35000,
                "loan_type": "adjustable", "property_type": "condo"
            })),
            3
        );
        // DTI of exactly 0.4 stays in the lowest tier.
        assert_eq!(
            score(json!({
                "credit_score": 670, "loan_amount": 250000, "property_value": 280000,
                "annual_income": 75000, "debt_amount": 30000,
                "loan_type": "adjustable", "property_type": "condo"
            })),
            3
        );
    }

    #[test]
    fn credit_score_boundaries_in_scoring() {
        let base = |credit_score: i64| {
            mortgage(json!({
                "credit_score": credit_score, "loan_amount": 1, "property_value": 10,
                "annual_income": 10, "debt_amount": 1
            }))
            .unwrap()
            .credit_score_risk(&RiskParams::default())
        };
        assert_eq!(base(700), -1);
        assert_eq!(base(650), 0);
        assert_eq!(base(649), 1);
    }

    #[test]
    fn zero_denominator_is_reported_when_rules_allow_it() {
        let mut rules = ValidationRules::default();
        rules.fields.get_mut("property_value").unwrap().greater_than = None;
        let record = json!({
            "credit_score": 700, "loan_amount": 1000, "property_value": 0,
            "annual_income": 50000, "debt_amount": 0
        });
        let m = Mortgage::from_record(record.as_object().unwrap(), &rules).unwrap();

        assert_eq!(
            m.calculate_total_risk(&RiskParams::default()).unwrap_err(),
            RecordError::ZeroDenominator { ratio: "ltv" }
        );
    }
}
