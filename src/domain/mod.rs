//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw input shapes (`RawRecord`, `RecordBatch`)
//! - categorical loan attributes (`LoanType`, `PropertyType`)
//! - partial and final aggregates (`BatchResult`, `PortfolioSummary`)
//! - run configuration (`RatingConfig`) and the final `Rating`

pub mod types;

pub use types::*;
