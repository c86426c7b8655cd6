//! Static rule tables used to validate and score mortgages.
//!
//! A `RuleBook` is an immutable value built once per run and shared read-only
//! by every worker. `RuleBook::default()` carries the reference tables;
//! `RuleBook::from_json_file` loads an override (e.g. stricter thresholds).

pub mod risk;
pub mod validation;

pub use risk::*;
pub use validation::*;

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleBook {
    #[serde(default)]
    pub validation: ValidationRules,
    #[serde(default)]
    pub risk: RiskParams,
}

impl RuleBook {
    pub fn from_json_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path).map_err(|e| {
            AppError::new(2, format!("Failed to open rules JSON '{}': {e}", path.display()))
        })?;
        let book: RuleBook = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| AppError::new(2, format!("Invalid rules JSON '{}': {e}", path.display())))?;
        book.risk.validate()?;
        Ok(book)
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::new(4, format!("Failed to serialize rules: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rule_book_survives_json() {
        let book = RuleBook::default();
        let text = book.to_json_pretty().unwrap();
        let parsed: RuleBook = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, book);
        assert!(text.contains("\"single_family\": 0"));
    }

    #[test]
    fn partial_override_keeps_default_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let mut risk = serde_json::to_value(RiskParams::default()).unwrap();
        risk["credit_score_thresholds"]["high"] = serde_json::json!(750);
        write!(file, "{}", serde_json::json!({ "risk": risk })).unwrap();

        let book = RuleBook::from_json_file(file.path()).unwrap();
        assert_eq!(book.risk.credit_score_thresholds.high, 750);
        assert_eq!(book.validation, ValidationRules::default());
    }

    #[test]
    fn missing_rules_file_is_a_configuration_error() {
        let err = RuleBook::from_json_file(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
