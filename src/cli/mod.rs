//! Command-line parsing for the mortgage portfolio rater.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::SampleConfig;
use crate::domain::RatingConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mrate", version, about = "Mortgage Portfolio Credit Rating")]
pub struct Cli {
    /// Log filter used when `RUST_LOG` is not set (e.g. `info`, `warn`, `mortgage_rating=debug`).
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a mortgage file and print the portfolio rating.
    Rate(RateArgs),
    /// Write a synthetic mortgage portfolio (JSON document or JSON Lines).
    Generate(GenerateArgs),
    /// Print the active rule book as JSON, followed by the risk table.
    Rules(RulesArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct RateArgs {
    /// Mortgage file: `{"mortgages": [...]}` JSON, or `.jsonl` / `.ndjson`.
    #[arg(short = 'i', long, value_name = "FILE")]
    pub input: PathBuf,

    /// Records per batch.
    #[arg(long, default_value_t = 2)]
    pub chunk_size: usize,

    /// Invalid-record ratio above which a data-quality alert is logged.
    #[arg(long, default_value_t = 0.3)]
    pub rejection_threshold: f64,

    /// Lower bound on the worker count.
    #[arg(long, default_value_t = 1)]
    pub min_workers: usize,

    /// Cores left free when sizing the worker pool.
    #[arg(long, default_value_t = 1)]
    pub reserve_cores: usize,

    /// Rule book JSON overriding the built-in validation/risk tables.
    #[arg(long, value_name = "JSON")]
    pub rules: Option<PathBuf>,

    /// Export the run summary to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

impl RateArgs {
    pub fn rating_config(&self) -> RatingConfig {
        RatingConfig {
            chunk_size: self.chunk_size,
            rejection_threshold: self.rejection_threshold,
            min_workers: self.min_workers,
            reserve_cores: self.reserve_cores,
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Number of records to generate.
    #[arg(short = 'n', long, default_value_t = 1_000)]
    pub count: usize,

    /// Random seed (same seed, same portfolio).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Fraction of records to corrupt on purpose.
    #[arg(long, default_value_t = 0.0)]
    pub invalid_ratio: f64,

    /// Output path; `.jsonl` / `.ndjson` writes JSON Lines.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: PathBuf,
}

impl GenerateArgs {
    pub fn sample_config(&self) -> SampleConfig {
        SampleConfig {
            count: self.count,
            seed: self.seed,
            invalid_ratio: self.invalid_ratio,
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct RulesArgs {
    /// Rule book JSON to show instead of the built-in tables.
    #[arg(long, value_name = "JSON")]
    pub rules: Option<PathBuf>,
}
