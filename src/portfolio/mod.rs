//! Portfolio-level aggregation and rating.
//!
//! - merge partial batch results and apply quality/average adjustments (`state`)
//! - orchestrate a full parallel rating run (`aggregator`)

pub mod aggregator;
pub mod state;

pub use aggregator::*;
pub use state::*;
