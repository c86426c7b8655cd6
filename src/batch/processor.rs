//! Score one batch into a partial aggregate.
//!
//! `process` never fails: every per-record problem is counted as invalid and
//! reported to the sink, so the concurrency layer only ever sees plain
//! `BatchResult` data.

use serde_json::Value;

use crate::diagnostics::DiagnosticSink;
use crate::domain::BatchResult;
use crate::mortgage::MortgageScorer;

pub struct BatchProcessor<'a> {
    scorer: &'a dyn MortgageScorer,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(scorer: &'a dyn MortgageScorer, sink: &'a dyn DiagnosticSink) -> Self {
        Self { scorer, sink }
    }

    pub fn process(&self, batch: &[Value]) -> BatchResult {
        let mut result = BatchResult::default();

        for record in batch {
            match self.scorer.score(record) {
                Ok(score) => {
                    result.total_risk += score.risk_score;
                    result.credit_score_sum += score.credit_score;
                    result.valid_count += 1;
                }
                Err(err) => {
                    self.sink.warn(&format!("Rejected mortgage record: {err}"));
                    result.invalid_count += 1;
                }
            }
        }

        result
    }
}
