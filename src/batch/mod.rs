//! Batch pipeline building blocks.
//!
//! Responsibilities:
//!
//! - size the worker pool from host capacity (`workers`)
//! - split the record source into bounded batches, lazily (`chunker`)
//! - score one batch into an additive partial result (`processor`)

pub mod chunker;
pub mod processor;
pub mod workers;

pub use chunker::*;
pub use processor::*;
pub use workers::*;
