//! Shared "rating pipeline" logic used by the CLI.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! rules -> scorer -> CreditRating run -> summary
//!
//! The CLI can then focus on presentation (printing vs exports).

use std::path::Path;
use std::sync::Arc;

use crate::cli::RateArgs;
use crate::diagnostics::TracingSink;
use crate::domain::PortfolioSummary;
use crate::error::AppError;
use crate::mortgage::RuleBasedScorer;
use crate::portfolio::CreditRating;
use crate::rules::RuleBook;

/// Built-in rule book, or the one at `path`.
pub fn load_rules(path: Option<&Path>) -> Result<RuleBook, AppError> {
    match path {
        Some(path) => RuleBook::from_json_file(path),
        None => Ok(RuleBook::default()),
    }
}

/// Execute a full rating run for the given CLI arguments.
pub fn run_rating(args: &RateArgs) -> Result<PortfolioSummary, AppError> {
    let rules = load_rules(args.rules.as_deref())?;

    CreditRating::from_file(&args.input)
        .with_config(args.rating_config())
        .with_scorer(Arc::new(RuleBasedScorer::new(rules)))
        .with_sink(Arc::new(TracingSink))
        .run()
}
