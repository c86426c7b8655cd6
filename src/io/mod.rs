//! Input/output helpers.
//!
//! - streaming record source for JSON / JSON Lines files (`source`)
//! - rating summary export (`export`)

pub mod export;
pub mod source;

pub use export::*;
pub use source::*;
