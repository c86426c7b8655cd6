use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mortgage_rating::batch::RecordSource;
use mortgage_rating::data::{SampleConfig, generate_sample, write_sample};
use mortgage_rating::diagnostics::MemorySink;
use mortgage_rating::{CreditRating, PortfolioSummary, Rating, RatingConfig};
use serde_json::{Value, json};

fn quiet(rating: CreditRating) -> CreditRating {
    rating.with_sink(Arc::new(MemorySink::new()))
}

fn rate(records: Vec<Value>) -> PortfolioSummary {
    quiet(CreditRating::from_records(records)).run().unwrap()
}

fn mortgage(
    credit_score: i64,
    loan_amount: i64,
    property_value: i64,
    annual_income: i64,
    debt_amount: i64,
    loan_type: &str,
    property_type: &str,
) -> Value {
    json!({
        "credit_score": credit_score,
        "loan_amount": loan_amount,
        "property_value": property_value,
        "annual_income": annual_income,
        "debt_amount": debt_amount,
        "loan_type": loan_type,
        "property_type": property_type,
    })
}

#[test]
fn two_record_portfolio_is_aaa() {
    let records = vec![
        mortgage(720, 250_000, 300_000, 85_000, 20_000, "fixed", "single_family"),
        mortgage(680, 350_000, 400_000, 95_000, 35_000, "adjustable", "condo"),
    ];
    let rating = quiet(CreditRating::from_records(records)).get_rating().unwrap();
    assert_eq!(rating, Rating::Aaa);
}

#[test]
fn high_risk_record_is_c() {
    let summary = rate(vec![mortgage(500, 400_000, 410_000, 30_000, 25_000, "adjustable", "condo")]);
    assert_eq!(summary.rating, Rating::C);
    // 7 from the record, +1 for the weak average.
    assert_eq!(summary.total_risk_score, 8);
    assert_eq!(summary.valid_count, 1);
}

#[test]
fn low_risk_record_is_aaa() {
    let summary = rate(vec![mortgage(800, 100_000, 500_000, 120_000, 5_000, "fixed", "single_family")]);
    assert_eq!(summary.rating, Rating::Aaa);
    assert_eq!(summary.total_risk_score, -3);
}

#[test]
fn medium_risk_record_is_bbb() {
    let summary = rate(vec![mortgage(670, 250_000, 280_000, 75_000, 30_000, "adjustable", "condo")]);
    assert_eq!(summary.rating, Rating::Bbb);
    assert_eq!(summary.total_risk_score, 3);
}

#[test]
fn empty_input_is_c_with_zero_counts() {
    for rating in [
        CreditRating::from_records(Vec::new()),
        CreditRating::new(RecordSource::None),
    ] {
        let summary = quiet(rating).run().unwrap();
        assert_eq!(summary.rating, Rating::C);
        assert_eq!(summary.valid_count, 0);
        assert_eq!(summary.invalid_count, 0);
    }
}

#[test]
fn record_missing_required_field_is_excluded() {
    let mut broken = mortgage(800, 100_000, 500_000, 120_000, 5_000, "fixed", "single_family");
    broken.as_object_mut().unwrap().remove("credit_score");

    let with_broken = rate(vec![
        mortgage(670, 250_000, 280_000, 75_000, 30_000, "adjustable", "condo"),
        broken,
    ]);
    let without = rate(vec![mortgage(670, 250_000, 280_000, 75_000, 30_000, "adjustable", "condo")]);

    assert_eq!(with_broken.invalid_count, 1);
    assert_eq!(with_broken.valid_count, 1);
    assert_eq!(with_broken.total_risk_score, without.total_risk_score);
    assert_eq!(with_broken.credit_score_sum, without.credit_score_sum);
}

#[test]
fn result_is_independent_of_chunk_size_and_workers() {
    let records = generate_sample(&SampleConfig {
        count: 997,
        seed: 11,
        invalid_ratio: 0.1,
    })
    .unwrap();

    let baseline = quiet(CreditRating::from_records(records.clone()))
        .with_config(RatingConfig {
            chunk_size: 1_000,
            ..RatingConfig::default()
        })
        .with_workers(1)
        .run()
        .unwrap();

    for (chunk_size, workers) in [(1, 4), (2, 3), (7, 8), (64, 2), (997, 5)] {
        let summary = quiet(CreditRating::from_records(records.clone()))
            .with_config(RatingConfig {
                chunk_size,
                ..RatingConfig::default()
            })
            .with_workers(workers)
            .run()
            .unwrap();

        assert_eq!(summary.rating, baseline.rating, "chunk={chunk_size} workers={workers}");
        assert_eq!(summary.total_risk_score, baseline.total_risk_score);
        assert_eq!(summary.credit_score_sum, baseline.credit_score_sum);
        assert_eq!(summary.valid_count, baseline.valid_count);
        assert_eq!(summary.invalid_count, baseline.invalid_count);
    }
}

#[test]
fn reordering_records_does_not_change_the_result() {
    let records = generate_sample(&SampleConfig {
        count: 300,
        seed: 5,
        invalid_ratio: 0.05,
    })
    .unwrap();
    let mut reversed = records.clone();
    reversed.reverse();

    let forward = rate(records);
    let backward = rate(reversed);

    assert_eq!(forward.total_risk_score, backward.total_risk_score);
    assert_eq!(forward.valid_count, backward.valid_count);
    assert_eq!(forward.invalid_count, backward.invalid_count);
    assert_eq!(forward.rating, backward.rating);
}

#[test]
fn file_and_memory_sources_agree() {
    let records = generate_sample(&SampleConfig {
        count: 250,
        seed: 21,
        invalid_ratio: 0.2,
    })
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let document = dir.path().join("mortgages.json");
    let lines = dir.path().join("mortgages.jsonl");
    write_sample(&document, &records).unwrap();
    write_sample(&lines, &records).unwrap();

    let memory = rate(records);
    for path in [document, lines] {
        let summary = quiet(CreditRating::from_file(&path))
            .with_config(RatingConfig {
                chunk_size: 16,
                ..RatingConfig::default()
            })
            .run()
            .unwrap();
        assert_eq!(summary.total_risk_score, memory.total_risk_score, "{}", path.display());
        assert_eq!(summary.valid_count, memory.valid_count);
        assert_eq!(summary.invalid_count, memory.invalid_count);
        assert_eq!(summary.batches, 250usize.div_ceil(16));
    }
}

#[test]
fn missing_file_is_a_configuration_error() {
    let err = quiet(CreditRating::from_file("/nonexistent/mortgages.json"))
        .run()
        .unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.message().contains("File not found"));
}

#[test]
fn malformed_file_aborts_the_run() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"mortgages": [{{"credit_score": 700}}, "#).unwrap();

    let err = quiet(CreditRating::from_file(file.path())).run().unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(err.message().contains("Malformed JSON"));
}

#[test]
fn file_without_records_is_the_no_data_case() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"mortgages": []}}"#).unwrap();

    let summary = quiet(CreditRating::from_file(file.path())).run().unwrap();
    assert_eq!(summary.rating, Rating::C);
    assert_eq!(summary.batches, 0);
    assert_eq!(summary.valid_count, 0);
}

#[test]
fn stress_hundred_thousand_records() {
    let records = generate_sample(&SampleConfig {
        count: 100_000,
        seed: 42,
        invalid_ratio: 0.0,
    })
    .unwrap();

    let started = Instant::now();
    let summary = quiet(CreditRating::from_records(records))
        .with_config(RatingConfig {
            chunk_size: 1_000,
            ..RatingConfig::default()
        })
        .run()
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary.valid_count, 100_000);
    assert_eq!(summary.invalid_count, 0);
    assert!(elapsed < Duration::from_secs(30), "stress run took {elapsed:?}");
}
