//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized

use crate::domain::PortfolioSummary;
use crate::rules::RuleBook;

/// Format the run summary (counts, quality, adjustment inputs, rating).
pub fn format_summary(summary: &PortfolioSummary) -> String {
    let mut out = String::new();

    out.push_str("=== mrate - Mortgage Portfolio Rating ===\n");
    out.push_str(&format!(
        "Records: valid={} | invalid={} | batches={} | workers={}\n",
        summary.valid_count, summary.invalid_count, summary.batches, summary.workers
    ));

    match summary.invalid_ratio {
        Some(ratio) => {
            let flag = if summary.quality_alert { "  (ALERT: review input data)" } else { "" };
            out.push_str(&format!("Invalid ratio: {:.2}%{flag}\n", ratio * 100.0));
        }
        None => out.push_str("Invalid ratio: -\n"),
    }

    out.push_str(&format!(
        "Average credit score: {}\n",
        fmt_opt(summary.average_credit_score)
    ));
    out.push_str(&format!("Total risk score: {}\n", summary.total_risk_score));
    out.push_str(&format!("Elapsed: {} ms\n", summary.elapsed_ms));

    let note = if summary.valid_count == 0 { " (no usable data)" } else { "" };
    out.push_str(&format!("\nFinal Credit Rating: {}{note}\n", summary.rating));

    out
}

/// Format the risk table of a rule book.
pub fn format_risk_table(rules: &RuleBook) -> String {
    let risk = &rules.risk;
    let mut out = String::new();

    out.push_str(format!("{:<16} {:>8} {:>8}", "factor", "low", "high").trim_end());
    out.push('\n');
    out.push_str(&format!("{:-<16} {:-<8} {:-<8}\n", "", "", ""));
    out.push_str(&format!(
        "{:<16} {:>8.2} {:>8.2}\n",
        "ltv", risk.ltv_thresholds.low, risk.ltv_thresholds.high
    ));
    out.push_str(&format!(
        "{:<16} {:>8.2} {:>8.2}\n",
        "dti", risk.dti_thresholds.low, risk.dti_thresholds.high
    ));
    out.push_str(&format!(
        "{:<16} {:>8} {:>8}\n",
        "credit_score", risk.credit_score_thresholds.low, risk.credit_score_thresholds.high
    ));

    out.push('\n');
    for (kind, weight) in &risk.loan_type_weights {
        out.push_str(&format!("loan_type {:<14} {weight:>+3}\n", kind.as_str()));
    }
    for (kind, weight) in &risk.property_type_weights {
        out.push_str(&format!("property_type {:<10} {weight:>+3}\n", kind.as_str()));
    }

    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rating;
    use chrono::Utc;

    fn summary(valid_count: u64, rating: Rating) -> PortfolioSummary {
        PortfolioSummary {
            rating,
            total_risk_score: 1,
            credit_score_sum: 1400,
            valid_count,
            invalid_count: 1,
            invalid_ratio: Some(1.0 / 3.0),
            average_credit_score: (valid_count > 0).then_some(700.0),
            quality_alert: true,
            batches: 2,
            workers: 4,
            elapsed_ms: 3,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn summary_lists_counts_and_rating() {
        let text = format_summary(&summary(2, Rating::Aaa));
        assert!(text.contains("valid=2 | invalid=1"));
        assert!(text.contains("Invalid ratio: 33.33%  (ALERT"));
        assert!(text.contains("Average credit score: 700.00"));
        assert!(text.contains("Final Credit Rating: AAA\n"));
    }

    #[test]
    fn summary_marks_no_data_c() {
        let text = format_summary(&summary(0, Rating::C));
        assert!(text.contains("Average credit score: -"));
        assert!(text.contains("Final Credit Rating: C (no usable data)"));
    }

    #[test]
    fn risk_table_shows_thresholds_and_weights() {
        let text = format_risk_table(&RuleBook::default());
        assert!(text.contains("ltv"));
        assert!(text.contains("0.80"));
        assert!(text.contains("650"));
        assert!(text.contains("loan_type fixed"));
        assert!(text.contains("-1"));
        assert!(text.contains("property_type condo"));
    }
}
