//! `mortgage-rating` library crate.
//!
//! The binary (`mrate`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the pipeline can be embedded (in-memory records, custom scorers/sinks)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod batch;
pub mod cli;
pub mod data;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod io;
pub mod mortgage;
pub mod portfolio;
pub mod report;
pub mod rules;

pub use domain::{PortfolioSummary, Rating, RatingConfig};
pub use error::{AppError, RecordError};
pub use portfolio::CreditRating;
