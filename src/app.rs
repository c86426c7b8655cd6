//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the tracing subscriber
//! - runs the rating pipeline, or one of the helper commands
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, GenerateArgs, RateArgs, RulesArgs};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `mrate` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; it only supplies defaults such as RUST_LOG.
    let _ = dotenvy::dotenv();

    let cli = crate::cli::Cli::parse();
    crate::diagnostics::init_tracing(&cli.log_level)?;

    match cli.command {
        Command::Rate(args) => handle_rate(args),
        Command::Generate(args) => handle_generate(args),
        Command::Rules(args) => handle_rules(args),
    }
}

fn handle_rate(args: RateArgs) -> Result<(), AppError> {
    let summary = pipeline::run_rating(&args)?;

    println!("{}", crate::report::format_summary(&summary));

    if let Some(path) = &args.export {
        crate::io::export::write_summary_json(path, &summary)?;
        tracing::info!(path = %path.display(), "wrote rating summary");
    }

    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let records = crate::data::generate_sample(&args.sample_config())?;
    crate::data::write_sample(&args.output, &records)?;
    tracing::info!(
        count = records.len(),
        path = %args.output.display(),
        "wrote synthetic mortgage portfolio"
    );
    Ok(())
}

fn handle_rules(args: RulesArgs) -> Result<(), AppError> {
    let rules = pipeline::load_rules(args.rules.as_deref())?;
    println!("{}", rules.to_json_pretty()?);
    println!();
    println!("{}", crate::report::format_risk_table(&rules));
    Ok(())
}
