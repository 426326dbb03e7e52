use cdm_evaluators::BenchmarkEvaluator;
use cdm_evaluators::benchmark::{diagnoses_match, normalize_diagnosis};

#[test]
fn diagnoses_normalise_by_stem() {
    assert_eq!(normalize_diagnosis("Acute Appendicitis"), "appendicitis");
    assert_eq!(normalize_diagnosis("calculous cholecystitis"), "cholecystitis");
    assert_eq!(normalize_diagnosis("Sigmoid diverticulitis"), "diverticulitis");
    assert_eq!(normalize_diagnosis("gallstone pancreatitis"), "pancreatitis");
    assert_eq!(normalize_diagnosis("gastroenteritis"), "other");
    assert_eq!(normalize_diagnosis(""), "other");
}

#[test]
fn stem_order_breaks_ties() {
    assert_eq!(
        normalize_diagnosis("pancreatitis secondary to cholecystitis"),
        "cholecystitis"
    );
}

#[test]
fn prediction_is_compared_literally() {
    assert!(diagnoses_match("appendicitis", "appendicitis"));
    assert!(!diagnoses_match("appendicitis", "Appendicitis"));
    assert!(!diagnoses_match("appendicitis", "acute appendicitis"));
}

#[test]
fn record_tracks_totals() {
    let mut bench = BenchmarkEvaluator::new();

    assert_eq!(
        bench.record(Some("Acute appendicitis"), Some("appendicitis")),
        ("appendicitis", true)
    );
    assert_eq!(
        bench.record(Some("Acute cholecystitis"), Some("appendicitis")),
        ("cholecystitis", false)
    );
    assert_eq!(
        bench.record(Some("Acute cholecystitis"), Some("gastritis")),
        ("cholecystitis", false)
    );
    assert_eq!(bench.record(Some("hernia"), None), ("other", false));

    let summary = bench.summary();
    assert_eq!(summary.processed_cases, 4);
    assert_eq!(summary.correct, 1);
    assert_eq!(summary.unknown, 2);
    assert!((summary.accuracy - 0.25).abs() < 1e-12);

    let appendicitis = summary.per_diagnosis["appendicitis"];
    assert_eq!((appendicitis.cases, appendicitis.correct), (1, 1));
    assert!((appendicitis.accuracy - 1.0).abs() < 1e-12);

    let cholecystitis = summary.per_diagnosis["cholecystitis"];
    assert_eq!((cholecystitis.cases, cholecystitis.correct), (2, 0));
    assert!(!summary.per_diagnosis.contains_key("other"));
}

#[test]
fn empty_class_reports_zero_accuracy() {
    let mut bench = BenchmarkEvaluator::new();
    bench.record(Some("appendicitis"), Some("appendicitis"));

    let pancreatitis = bench.summary().per_diagnosis["pancreatitis"];
    assert_eq!(pancreatitis.cases, 0);
    assert_eq!(pancreatitis.correct, 0);
    assert_eq!(pancreatitis.accuracy, 0.0);
}

#[test]
fn empty_evaluator_summary() {
    let summary = BenchmarkEvaluator::new().summary();
    assert_eq!(summary.processed_cases, 0);
    assert_eq!(summary.accuracy, 0.0);
    assert_eq!(summary.per_diagnosis.len(), 4);
}

#[test]
fn summary_serialises_with_expected_keys() {
    let mut bench = BenchmarkEvaluator::new();
    bench.record(Some("diverticulitis"), Some("diverticulitis"));
    let json = serde_json::to_value(bench.summary()).unwrap();
    assert_eq!(json["processed_cases"], 1);
    assert_eq!(json["per_diagnosis"]["diverticulitis"]["correct"], 1);
    assert_eq!(json["per_diagnosis"]["pancreatitis"]["accuracy"], 0.0);
}
