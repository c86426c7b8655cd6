//! Full rating run: chunk -> score in parallel -> merge -> check -> adjust -> rate.
//!
//! A `CreditRating` is consumed by its run, so every rating request starts
//! from a fresh `PortfolioState`. Workers only read the scorer and rule
//! tables; the merge happens on the calling thread once every batch has
//! returned, and it is a plain field-wise sum, so neither chunk size nor
//! worker count nor completion order can change the result.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use serde_json::Value;

use crate::batch::{BatchChunker, BatchProcessor, RecordSource, clamp_workers, optimal_workers};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::domain::{BatchResult, PortfolioSummary, Rating, RatingConfig};
use crate::error::AppError;
use crate::mortgage::{MortgageScorer, RuleBasedScorer};
use crate::portfolio::state::PortfolioState;

pub struct CreditRating {
    source: RecordSource,
    config: RatingConfig,
    scorer: Arc<dyn MortgageScorer>,
    sink: Arc<dyn DiagnosticSink>,
    workers: Option<usize>,
}

impl CreditRating {
    pub fn new(source: RecordSource) -> Self {
        Self {
            source,
            config: RatingConfig::default(),
            scorer: Arc::new(RuleBasedScorer::default()),
            sink: Arc::new(TracingSink),
            workers: None,
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(RecordSource::File(path.into()))
    }

    pub fn from_records(records: Vec<Value>) -> Self {
        Self::new(RecordSource::from(records))
    }

    pub fn with_config(mut self, config: RatingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn MortgageScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Pin the worker count instead of deriving it from the host.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(clamp_workers(workers));
        self
    }

    /// Run the pipeline once and return only the rating.
    pub fn get_rating(self) -> Result<Rating, AppError> {
        self.run().map(|summary| summary.rating)
    }

    /// Run the pipeline once and return everything it produced.
    pub fn run(self) -> Result<PortfolioSummary, AppError> {
        self.config.validate()?;
        let started = Instant::now();

        if self.source.is_none() {
            self.sink
                .warn("No valid file path or list of mortgages provided; rating an empty portfolio.");
        }

        let workers = self.workers.unwrap_or_else(|| {
            clamp_workers(optimal_workers(self.config.min_workers, self.config.reserve_cores))
        });
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("mrate-worker-{idx}"))
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to create worker pool: {e}")))?;

        let batches = BatchChunker::new(self.source, self.config.chunk_size)
            .with_read_ahead(workers.saturating_mul(2))
            .batches()?;

        let processor = BatchProcessor::new(self.scorer.as_ref(), self.sink.as_ref());
        let results: Vec<BatchResult> = pool.install(|| {
            batches
                .par_bridge()
                .map(|batch| batch.map(|records| processor.process(&records)))
                .collect::<Result<Vec<_>, AppError>>()
        })?;

        let sink = self.sink.as_ref();
        if results.is_empty() {
            sink.warn("No mortgage batches were produced; nothing to rate.");
            return Ok(PortfolioSummary {
                rating: Rating::C,
                total_risk_score: 0,
                credit_score_sum: 0,
                valid_count: 0,
                invalid_count: 0,
                invalid_ratio: None,
                average_credit_score: None,
                quality_alert: false,
                batches: 0,
                workers,
                elapsed_ms: started.elapsed().as_millis(),
                generated_at: Utc::now(),
            });
        }

        let merged: BatchResult = results.iter().copied().sum();
        let mut state = PortfolioState::from(merged);
        let quality = state.check_data_quality(self.config.rejection_threshold, sink);
        let average_credit_score = state.average_credit_score();
        state.apply_average_adjustment();

        let elapsed = started.elapsed();
        sink.info(&format!(
            "Processed {} valid mortgages in {:.2} seconds",
            state.valid_count,
            elapsed.as_secs_f64()
        ));
        sink.info(&format!("Flagged {} invalid mortgages", state.invalid_count));

        Ok(PortfolioSummary {
            rating: state.rating(),
            total_risk_score: state.total_risk_score,
            credit_score_sum: state.credit_score_sum,
            valid_count: state.valid_count,
            invalid_count: state.invalid_count,
            invalid_ratio: quality.invalid_ratio(),
            average_credit_score,
            quality_alert: quality.is_alert(),
            batches: results.len(),
            workers,
            elapsed_ms: elapsed.as_millis(),
            generated_at: Utc::now(),
        })
    }
}
