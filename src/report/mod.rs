//! Reporting utilities: formatted terminal output for rating runs.

pub mod format;

pub use format::*;
