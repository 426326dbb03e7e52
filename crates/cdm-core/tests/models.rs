use std::str::FromStr;

use cdm_core::models::agent_run::{AgentRunResult, BenchmarkOutput, MessageRole};
use cdm_core::models::case::BenchmarkDataset;
use cdm_core::models::scores::{CaseAnswers, CaseScores, Procedure, TreatmentFlags};
use cdm_core::{CoreError, Pathology};
use serde_json::json;

#[test]
fn pathology_parses_case_insensitively() {
    assert_eq!(Pathology::from_str(" Cholecystitis ").unwrap(), Pathology::Cholecystitis);
    assert!(matches!(
        Pathology::from_str("gastritis"),
        Err(CoreError::UnknownPathology(_))
    ));
    assert_eq!(Pathology::Pancreatitis.to_string(), "pancreatitis");
}

#[test]
fn agent_run_deserialises_with_role_aliases() {
    let run: AgentRunResult = serde_json::from_value(json!({
        "parsed_output": {
            "thought": "RLQ pain and leukocytosis",
            "final_diagnosis": "Acute appendicitis",
            "treatment": ["appendectomy"]
        },
        "messages": [
            { "type": "human", "content": "Patient history..." },
            {
                "type": "ai",
                "content": "",
                "tool_calls": [
                    { "name": "physical_examination", "args": {} },
                    { "name": "request_lab_test", "args": { "test_id": 51301 }, "id": "call_1" }
                ]
            },
            { "role": "tool", "content": "WBC 14.2" },
            {
                "role": "assistant",
                "content": "",
                "tool_calls": [{ "name": "request_lab_test", "args": { "test_id": 50889 } }]
            },
            { "role": "function", "content": "" }
        ]
    }))
    .unwrap();

    assert_eq!(run.messages[0].role, MessageRole::User);
    assert_eq!(run.messages[1].role, MessageRole::Assistant);
    assert_eq!(run.messages[4].role, MessageRole::Other);

    let names: Vec<&str> = run.tool_calls().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["physical_examination", "request_lab_test", "request_lab_test"]
    );

    let counts = run.tool_call_counts();
    assert_eq!(counts["physical_examination"], 1);
    assert_eq!(counts["request_lab_test"], 2);
    assert_eq!(counts["total"], 3);
}

#[test]
fn benchmark_output_picks_variant_by_shape() {
    let full: BenchmarkOutput =
        serde_json::from_value(json!({ "diagnosis": "Cholecystitis" })).unwrap();
    assert!(matches!(full, BenchmarkOutput::FullInfo(_)));

    let agent: BenchmarkOutput = serde_json::from_value(json!({
        "parsed_output": { "final_diagnosis": "Cholecystitis" }
    }))
    .unwrap();
    assert!(matches!(agent, BenchmarkOutput::Agent(_)));
}

#[test]
fn scores_use_report_keys() {
    let scores = CaseScores {
        physical_examination: 1,
        imaging: 2,
        ..CaseScores::default()
    };
    let json = serde_json::to_value(scores).unwrap();
    assert_eq!(json["Physical Examination"], 1);
    assert_eq!(json["Late Physical Examination"], 0);
    assert_eq!(json["Imaging"], 2);
    assert_eq!(json["Gracious Diagnosis"], 0);
}

#[test]
fn treatment_flags_keep_their_keys() {
    let mut flags = TreatmentFlags::new([(Procedure::Ercp, false), (Procedure::Support, true)]);
    assert!(flags.mark(Procedure::Ercp));
    assert!(!flags.mark(Procedure::Appendectomy));
    assert_eq!(flags.len(), 2);
    assert_eq!(flags.get(Procedure::Appendectomy), None);

    let cleared = flags.cleared();
    assert_eq!(cleared.get(Procedure::Support), Some(false));

    let answers = CaseAnswers {
        treatment_requested: flags,
        ..CaseAnswers::default()
    };
    let json = serde_json::to_value(&answers).unwrap();
    assert_eq!(json["Treatment Requested"], json!({ "ERCP": true, "Support": true }));
}

#[test]
fn dataset_tolerates_extra_fields() {
    let mut dataset: BenchmarkDataset = serde_json::from_value(json!({
        "cases": [
            {
                "hadm_id": 20001,
                "pathology": "appendicitis",
                "demographics": { "age": 34, "gender": "F" },
                "patient_history": "RLQ pain for one day.",
                "lab_tests": { "51301": "14.2" },
                "ground_truth": {
                    "primary_diagnosis": ["acute appendicitis"],
                    "treatments": [
                        { "title": "appendectomy", "icd_code": "0DTJ0ZZ", "is_coded": true }
                    ]
                }
            },
            { "hadm_id": 20002 }
        ]
    }))
    .unwrap();

    assert_eq!(dataset.len(), 2);
    let first = &dataset.cases[0];
    assert_eq!(first.require_pathology().unwrap(), Pathology::Appendicitis);
    assert_eq!(first.require_ground_truth().unwrap().treatments.len(), 1);

    let second = &dataset.cases[1];
    assert!(matches!(
        second.require_ground_truth(),
        Err(CoreError::MissingField(_))
    ));

    dataset.truncate(1);
    assert_eq!(dataset.iter().count(), 1);
}
