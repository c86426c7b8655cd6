//! Error types.
//!
//! - `AppError`: run-level faults surfaced to the caller (bad configuration,
//!   unreadable or malformed record source, failed exports). Carries the
//!   process exit code used by the `mrate` binary.
//! - `RecordError`: why a single mortgage record was rejected. These never
//!   escape a batch; they are counted as invalid and logged.
//!
//! Exit codes:
//! - 2: input/configuration error
//! - 3: output/export error
//! - 4: internal error (worker pool construction)

use thiserror::Error;

#[derive(Clone, PartialEq, Eq)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Record-level rejection reason.
///
/// Values are rendered with their JSON text so the log line shows exactly what
/// the source contained.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("record is not a JSON object: {value}")]
    NotAnObject { value: String },
    #[error("missing field: {field}")]
    MissingField { field: String },
    #[error("invalid type for {field}: {value}")]
    InvalidType { field: String, value: String },
    #[error("value is low for {field}: {value} (min {min})")]
    BelowMinimum { field: String, value: String, min: f64 },
    #[error("value is high for {field}: {value} (max {max})")]
    AboveMaximum { field: String, value: String, max: f64 },
    #[error("value for {field} must be greater than {bound}: {value}")]
    NotGreaterThan {
        field: String,
        value: String,
        bound: f64,
    },
    #[error("invalid option given for {field}: {value}")]
    InvalidOption { field: String, value: String },
    #[error("zero denominator in {ratio} ratio")]
    ZeroDenominator { ratio: &'static str },
}

impl RecordError {
    /// Field the rejection is attributed to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            RecordError::MissingField { field }
            | RecordError::InvalidType { field, .. }
            | RecordError::BelowMinimum { field, .. }
            | RecordError::AboveMaximum { field, .. }
            | RecordError::NotGreaterThan { field, .. }
            | RecordError::InvalidOption { field, .. } => Some(field),
            RecordError::NotAnObject { .. } | RecordError::ZeroDenominator { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_keeps_exit_code_and_message() {
        let err = AppError::new(2, "File not found: mortgages.json");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "File not found: mortgages.json");
    }

    #[test]
    fn record_error_reports_field() {
        let err = RecordError::MissingField {
            field: "credit_score".to_string(),
        };
        assert_eq!(err.field(), Some("credit_score"));
        assert_eq!(err.to_string(), "missing field: credit_score");
        assert_eq!(RecordError::ZeroDenominator { ratio: "ltv" }.field(), None);
    }
}
