//! Field validation rules.
//!
//! Each rule is a small declarative record (type, inclusive bounds, strict
//! lower bound, allowed options). `check_field` is the single interpreter for
//! it; checks run in a fixed order and stop at the first failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::RawRecord;
use crate::error::RecordError;

/// Value type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// JSON integer (no fractional part in the source text).
    Integer,
    /// Any JSON number.
    Number,
    /// JSON string.
    Text,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::Text => value.is_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub kind: FieldKind,
    /// Inclusive lower bound: `value < min` rejects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound: `value > max` rejects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Strict lower bound: `value <= greater_than` rejects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<f64>,
    /// Allowed values for categorical text fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldRule {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            min: None,
            max: None,
            greater_than: None,
            options: None,
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn greater_than(mut self, bound: f64) -> Self {
        self.greater_than = Some(bound);
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

/// Per-field rules plus the list of fields every record must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRules {
    pub required: Vec<String>,
    pub fields: BTreeMap<String, FieldRule>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        let required = [
            "credit_score",
            "loan_amount",
            "property_value",
            "annual_income",
            "debt_amount",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        // `property_value` and `annual_income` are LTV/DTI denominators, so
        // zero is rejected here rather than faulting during scoring.
        let fields = BTreeMap::from([
            (
                "credit_score".to_string(),
                FieldRule::new(FieldKind::Integer).min(300.0).max(850.0),
            ),
            ("loan_amount".to_string(), FieldRule::new(FieldKind::Number).min(0.0)),
            (
                "property_value".to_string(),
                FieldRule::new(FieldKind::Number).greater_than(0.0),
            ),
            (
                "annual_income".to_string(),
                FieldRule::new(FieldKind::Number).greater_than(0.0),
            ),
            ("debt_amount".to_string(), FieldRule::new(FieldKind::Number).min(0.0)),
            (
                "loan_type".to_string(),
                FieldRule::new(FieldKind::Text).options(["fixed", "adjustable"]),
            ),
            (
                "property_type".to_string(),
                FieldRule::new(FieldKind::Text).options(["single_family", "condo"]),
            ),
        ]);

        Self { required, fields }
    }
}

impl ValidationRules {
    /// Validate a raw record, reporting the first failing field.
    ///
    /// Required fields are checked first. Fields without a rule are passed
    /// through unchecked.
    pub fn check(&self, record: &RawRecord) -> Result<(), RecordError> {
        if let Some(field) = self.required.iter().find(|field| !record.contains_key(*field)) {
            return Err(RecordError::MissingField {
                field: field.clone(),
            });
        }

        for (field, value) in record {
            if let Some(rule) = self.fields.get(field) {
                check_field(field, value, rule)?;
            }
        }

        Ok(())
    }

    /// Pass/fail view of `check`.
    pub fn validate(&self, record: &RawRecord) -> bool {
        self.check(record).is_ok()
    }
}

/// Apply one rule to one value: type, then min, max, strict bound, then options.
pub fn check_field(field: &str, value: &Value, rule: &FieldRule) -> Result<(), RecordError> {
    if !rule.kind.accepts(value) {
        return Err(RecordError::InvalidType {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    if let Some(number) = value.as_f64() {
        if let Some(min) = rule.min {
            if number < min {
                return Err(RecordError::BelowMinimum {
                    field: field.to_string(),
                    value: value.to_string(),
                    min,
                });
            }
        }
        if let Some(max) = rule.max {
            if number > max {
                return Err(RecordError::AboveMaximum {
                    field: field.to_string(),
                    value: value.to_string(),
                    max,
                });
            }
        }
        if let Some(bound) = rule.greater_than {
            if number <= bound {
                return Err(RecordError::NotGreaterThan {
                    field: field.to_string(),
                    value: value.to_string(),
                    bound,
                });
            }
        }
    }

    if let Some(options) = &rule.options {
        let allowed = value
            .as_str()
            .is_some_and(|text| options.iter().any(|option| option == text));
        if !allowed {
            return Err(RecordError::InvalidOption {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn valid() -> RawRecord {
        record(json!({
            "credit_score": 720,
            "loan_amount": 250000,
            "property_value": 300000,
            "annual_income": 85000,
            "debt_amount": 20000,
            "loan_type": "fixed",
            "property_type": "single_family"
        }))
    }

    #[test]
    fn accepts_well_formed_record() {
        assert!(ValidationRules::default().validate(&valid()));
    }

    #[test]
    fn missing_required_field_fails_closed() {
        let mut raw = valid();
        raw.remove("debt_amount");
        let err = ValidationRules::default().check(&raw).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingField {
                field: "debt_amount".to_string()
            }
        );
    }

    #[test]
    fn unknown_fields_pass_through() {
        let mut raw = valid();
        raw.insert("servicer".to_string(), json!({"nested": true}));
        assert!(ValidationRules::default().validate(&raw));
    }

    #[test]
    fn credit_score_must_be_an_integer_in_range() {
        let rules = ValidationRules::default();

        let mut raw = valid();
        raw.insert("credit_score".to_string(), json!(720.5));
        assert!(matches!(rules.check(&raw), Err(RecordError::InvalidType { .. })));

        raw.insert("credit_score".to_string(), json!("720"));
        assert!(matches!(rules.check(&raw), Err(RecordError::InvalidType { .. })));

        raw.insert("credit_score".to_string(), json!(299));
        assert!(matches!(rules.check(&raw), Err(RecordError::BelowMinimum { .. })));

        raw.insert("credit_score".to_string(), json!(851));
        assert!(matches!(rules.check(&raw), Err(RecordError::AboveMaximum { .. })));

        // Bounds are inclusive.
        raw.insert("credit_score".to_string(), json!(300));
        assert!(rules.validate(&raw));
        raw.insert("credit_score".to_string(), json!(850));
        assert!(rules.validate(&raw));
    }

    #[test]
    fn numeric_fields_accept_floats_and_reject_negatives() {
        let rules = ValidationRules::default();
        let mut raw = valid();
        raw.insert("loan_amount".to_string(), json!(250000.75));
        assert!(rules.validate(&raw));

        raw.insert("loan_amount".to_string(), json!(-1));
        assert!(matches!(rules.check(&raw), Err(RecordError::BelowMinimum { .. })));

        raw.insert("loan_amount".to_string(), json!(0));
        assert!(rules.validate(&raw));
    }

    #[test]
    fn zero_denominators_are_rejected() {
        let rules = ValidationRules::default();
        for field in ["property_value", "annual_income"] {
            let mut raw = valid();
            raw.insert(field.to_string(), json!(0));
            let err = rules.check(&raw).unwrap_err();
            assert!(matches!(err, RecordError::NotGreaterThan { .. }), "{field}: {err}");
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn categorical_fields_check_membership_and_type() {
        let rules = ValidationRules::default();
        let mut raw = valid();
        raw.insert("loan_type".to_string(), json!("balloon"));
        assert!(matches!(rules.check(&raw), Err(RecordError::InvalidOption { .. })));

        raw.insert("loan_type".to_string(), json!(1));
        assert!(matches!(rules.check(&raw), Err(RecordError::InvalidType { .. })));
    }

    #[test]
    fn null_and_bool_values_are_type_failures() {
        let rules = ValidationRules::default();
        let mut raw = valid();
        raw.insert("annual_income".to_string(), Value::Null);
        assert!(matches!(rules.check(&raw), Err(RecordError::InvalidType { .. })));

        raw.insert("annual_income".to_string(), json!(true));
        assert!(matches!(rules.check(&raw), Err(RecordError::InvalidType { .. })));
    }
}
