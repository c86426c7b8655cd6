//! Export a rating summary to JSON.
//!
//! The export is meant to be easy to consume in downstream scripts; the schema
//! is `domain::PortfolioSummary`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::PortfolioSummary;
use crate::error::AppError;

/// Write a rating summary JSON file.
pub fn write_summary_json(path: &Path, summary: &PortfolioSummary) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(3, format!("Failed to create summary JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .map_err(|e| AppError::new(3, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}
