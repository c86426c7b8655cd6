//! Data sources: seeded synthetic mortgage portfolios.

pub mod sample;

pub use sample::*;
