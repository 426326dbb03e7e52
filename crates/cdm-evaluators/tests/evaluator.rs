use cdm_core::Pathology;
use cdm_core::models::agent_run::{
    AgentMessage, AgentRunResult, BenchmarkOutput, BenchmarkOutputCdm, BenchmarkOutputFullInfo,
    MessageRole, ToolCall, tool_names,
};
use cdm_core::models::ground_truth::{GroundTruth, Treatment};
use cdm_core::models::scores::{DiagnosisScores, ImagingOrder, Procedure, TreatmentFlags};
use cdm_evaluators::{EvalError, Evaluation, Stage, get_evaluator, get_evaluator_by_name};
use serde_json::json;

fn appendicitis_truth() -> GroundTruth {
    GroundTruth {
        primary_diagnosis: vec!["acute appendicitis".to_string()],
        treatments: vec![Treatment::coded("appendectomy", "0DTJ0ZZ")],
    }
}

fn physical() -> ToolCall {
    ToolCall::new(tool_names::PHYSICAL_EXAMINATION, json!({}))
}

fn lab(test_id: serde_json::Value) -> ToolCall {
    ToolCall::new(tool_names::REQUEST_LAB_TEST, json!({ "test_id": test_id }))
}

fn imaging(region: &str, modality: &str) -> ToolCall {
    ToolCall::new(
        tool_names::REQUEST_IMAGING,
        json!({ "region": region, "modality": modality }),
    )
}

fn run(diagnosis: &str, calls: Vec<ToolCall>, treatment: &[&str]) -> AgentRunResult {
    AgentRunResult {
        parsed_output: BenchmarkOutputCdm {
            thought: String::new(),
            final_diagnosis: diagnosis.to_string(),
            treatment: treatment.iter().map(|t| t.to_string()).collect(),
        },
        messages: vec![
            AgentMessage {
                role: MessageRole::User,
                content: json!("Patient presents with right lower quadrant pain."),
                tool_calls: Vec::new(),
            },
            AgentMessage {
                role: MessageRole::Assistant,
                content: json!(""),
                tool_calls: calls,
            },
        ],
    }
}

fn order(region: &str, modality: &str) -> ImagingOrder {
    ImagingOrder {
        region: region.to_string(),
        modality: modality.to_string(),
    }
}

#[test]
fn appendicitis_end_to_end() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run(
            "Appendicitis",
            vec![physical(), lab(json!(51301)), imaging("abdomen", "ultrasound")],
            &["appendectomy", "IV fluids", "antibiotics"],
        ))
        .unwrap();

    let scores = result.scores;
    assert_eq!(scores.diagnosis, 1);
    assert_eq!(scores.gracious_diagnosis, 1);
    assert_eq!(scores.physical_examination, 1);
    assert_eq!(scores.late_physical_examination, 1);
    assert_eq!(scores.laboratory_tests, 1);
    assert_eq!(scores.imaging, 2);

    let expected = TreatmentFlags::new([
        (Procedure::Appendectomy, true),
        (Procedure::Antibiotics, true),
        (Procedure::Support, true),
    ]);
    assert_eq!(result.answers.treatment_requested, expected);
    assert_eq!(result.answers.treatment_required, expected);
    assert_eq!(result.answers.diagnosis, "Appendicitis");
    assert_eq!(result.answers.correct_imaging, vec![order("abdomen", "ultrasound")]);
    assert!(result.explanations.physical.starts_with("CORRECT"));
    assert!(result.explanations.diagnosis.starts_with("CORRECT"));
}

#[test]
fn evaluation_is_repeatable() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let input = run(
        "acute appendicitis",
        vec![lab(json!(51301)), physical(), imaging("abdomen", "ct")],
        &["antibiotics"],
    );
    let first = evaluator.evaluate_case(&input).unwrap();
    let second = evaluator.evaluate_case(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn misspelled_diagnosis_is_correct() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("Acute apendicitis", vec![], &[]))
        .unwrap();
    assert_eq!(result.scores.diagnosis, 1);
}

#[test]
fn unrelated_diagnosis_scores_zero() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("Gastroenteritis", vec![], &[]))
        .unwrap();
    assert_eq!(result.scores.diagnosis, 0);
    assert_eq!(result.scores.gracious_diagnosis, 0);
    assert!(result.explanations.diagnosis.is_empty());
}

#[test]
fn negated_diagnosis_scores_zero() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("no appendicitis, likely gastroenteritis", vec![], &[]))
        .unwrap();
    assert_eq!(result.scores.diagnosis, 0);
}

#[test]
fn alternative_name_scores_both() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("Gangrenous appendix", vec![], &[]))
        .unwrap();
    assert_eq!(result.scores.diagnosis, 1);
    assert_eq!(result.scores.gracious_diagnosis, 1);
}

#[test]
fn gracious_name_scores_gracious_only() {
    let truth = GroundTruth {
        primary_diagnosis: vec!["sigmoid diverticulitis".to_string()],
        treatments: vec![],
    };
    let evaluator = get_evaluator(Pathology::Diverticulitis, truth);
    let result = evaluator
        .evaluate_case(&run("Perforated sigmoid colon", vec![], &[]))
        .unwrap();
    assert_eq!(result.scores.diagnosis, 0);
    assert_eq!(result.scores.gracious_diagnosis, 1);
    assert!(result.explanations.diagnosis.starts_with("GRACIOUS"));
}

#[test]
fn first_correct_imaging_wins() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run(
            "appendicitis",
            vec![imaging("abdomen", "ct"), imaging("abdomen", "ultrasound")],
            &[],
        ))
        .unwrap();
    assert_eq!(result.scores.imaging, 1);
    assert_eq!(
        result.answers.correct_imaging,
        vec![order("abdomen", "ct"), order("abdomen", "ultrasound")]
    );
}

#[test]
fn duplicate_imaging_is_unnecessary() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run(
            "appendicitis",
            vec![imaging("Abdomen", "US"), imaging("abdomen", "us")],
            &[],
        ))
        .unwrap();
    assert_eq!(result.scores.imaging, 2);
    assert_eq!(result.answers.correct_imaging, vec![order("abdomen", "us")]);
    assert_eq!(result.answers.unnecessary_imaging, vec![order("abdomen", "us")]);
}

#[test]
fn wrong_region_is_unnecessary() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("appendicitis", vec![imaging("chest", "x-ray")], &[]))
        .unwrap();
    assert_eq!(result.scores.imaging, 0);
    assert!(result.answers.correct_imaging.is_empty());
    assert_eq!(result.answers.unnecessary_imaging, vec![order("chest", "x-ray")]);
    assert!(result.explanations.imaging.starts_with("INCORRECT REGION"));
}

#[test]
fn lab_category_counts_once() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run(
            "appendicitis",
            vec![lab(json!(51301)), lab(json!(51755)), lab(json!(51301))],
            &[],
        ))
        .unwrap();
    assert_eq!(result.scores.laboratory_tests, 1);
    assert_eq!(
        result.answers.correct_laboratory_tests["Inflammation"],
        vec![51301, 51755, 51301]
    );
}

#[test]
fn neutral_labs_are_unnecessary_and_unknown_labs_dropped() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run(
            "appendicitis",
            vec![lab(json!(51279)), lab(json!("99999"))],
            &[],
        ))
        .unwrap();
    assert_eq!(result.scores.laboratory_tests, 0);
    assert_eq!(result.answers.unnecessary_laboratory_tests, vec![51279]);
    assert!(result.answers.correct_laboratory_tests["Inflammation"].is_empty());
}

#[test]
fn lab_panel_names_expand() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run(
            "appendicitis",
            vec![lab(json!("Complete Blood Count (CBC)"))],
            &[],
        ))
        .unwrap();
    assert_eq!(result.scores.laboratory_tests, 1);
    assert_eq!(
        result.answers.correct_laboratory_tests["Inflammation"],
        vec![51301, 51755, 51300]
    );
    assert!(result.answers.unnecessary_laboratory_tests.contains(&51279));
}

#[test]
fn late_physical_exam_is_a_protocol_violation() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("appendicitis", vec![lab(json!(51301)), physical()], &[]))
        .unwrap();
    assert_eq!(result.scores.physical_examination, 0);
    assert_eq!(result.scores.late_physical_examination, 1);
    assert!(result.explanations.physical.starts_with("PROTOCOL VIOLATION"));
}

#[test]
fn missing_physical_exam_scores_zero() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let result = evaluator
        .evaluate_case(&run("appendicitis", vec![lab(json!(51301))], &[]))
        .unwrap();
    assert_eq!(result.scores.physical_examination, 0);
    assert_eq!(result.scores.late_physical_examination, 0);
}

#[test]
fn unscored_tools_still_count_as_actions() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let microbio = ToolCall::new(tool_names::REQUEST_MICROBIO_TEST, json!({ "test_id": 90201 }));
    let result = evaluator
        .evaluate_case(&run("appendicitis", vec![microbio, physical()], &[]))
        .unwrap();
    assert_eq!(result.scores.physical_examination, 0);
    assert_eq!(result.scores.late_physical_examination, 1);
}

#[test]
fn lab_call_without_test_id_is_rejected() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let bad = ToolCall::new(tool_names::REQUEST_LAB_TEST, json!({}));
    let err = evaluator
        .evaluate_case(&run("appendicitis", vec![physical(), bad], &[]))
        .unwrap_err();
    match err {
        EvalError::MalformedToolCall { tool, index, .. } => {
            assert_eq!(tool, tool_names::REQUEST_LAB_TEST);
            assert_eq!(index, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn imaging_call_without_modality_is_rejected() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let bad = ToolCall::new(tool_names::REQUEST_IMAGING, json!({ "region": "abdomen" }));
    let err = evaluator
        .evaluate_case(&run("appendicitis", vec![bad], &[]))
        .unwrap_err();
    assert!(matches!(err, EvalError::MalformedToolCall { index: 0, .. }));
}

#[test]
fn imaging_region_must_be_a_string() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let bad = ToolCall::new(
        tool_names::REQUEST_IMAGING,
        json!({ "region": 7, "modality": "ultrasound" }),
    );
    let err = evaluator
        .evaluate_case(&run("appendicitis", vec![bad], &[]))
        .unwrap_err();
    match err {
        EvalError::MalformedToolCall { reason, .. } => {
            assert_eq!(reason, "'region' must be a string");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn non_numeric_test_id_is_rejected() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let err = evaluator
        .evaluate_case(&run("appendicitis", vec![lab(json!(true))], &[]))
        .unwrap_err();
    assert!(matches!(err, EvalError::MalformedToolCall { .. }));
}

#[test]
fn steps_out_of_order_are_rejected() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let mut case = evaluator.begin();
    assert_eq!(case.stage(), Stage::Initialized);

    let err = case.score_lab(0, &lab(json!(51301))).unwrap_err();
    assert!(matches!(
        err,
        EvalError::OutOfOrder {
            stage: Stage::Initialized,
            operation: "score_lab"
        }
    ));
    assert!(case.finish().is_err());

    case.score_diagnosis("appendicitis").unwrap();
    assert!(case.score_diagnosis("appendicitis").is_err());

    case.score_physical_exam(0).unwrap();
    assert_eq!(case.stage(), Stage::ToolTraceWalked);
    case.score_treatment(&["antibiotics".to_string()]).unwrap();
    assert!(case.score_imaging_action(1, &imaging("abdomen", "us")).is_err());

    let result = case.finish().unwrap();
    assert_eq!(result.scores.physical_examination, 1);
    assert_eq!(case.stage(), Stage::Finalized);
    assert!(case.finish().is_err());
}

#[test]
fn treatment_can_follow_diagnosis_directly() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let mut case = evaluator.begin();
    case.score_diagnosis("appendicitis").unwrap();
    case.score_treatment(&[]).unwrap();
    assert_eq!(case.stage(), Stage::TreatmentScored);
}

#[test]
fn full_info_scores_diagnosis_only() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let output = BenchmarkOutputFullInfo {
        diagnosis: "Acute appendicitis with perforation".to_string(),
    };
    let scores = evaluator.evaluate_full_info(&output).unwrap();
    assert_eq!(
        scores,
        DiagnosisScores {
            diagnosis: 1,
            gracious_diagnosis: 1
        }
    );

    match evaluator.evaluate(&BenchmarkOutput::FullInfo(output)).unwrap() {
        Evaluation::FullInfo(s) => assert_eq!(s, scores),
        other => panic!("unexpected evaluation: {other:?}"),
    }
}

#[test]
fn agent_output_dispatches_to_case_evaluation() {
    let evaluator = get_evaluator(Pathology::Appendicitis, appendicitis_truth());
    let input = run("appendicitis", vec![physical()], &[]);
    let direct = evaluator.evaluate_case(&input).unwrap();
    match evaluator.evaluate(&BenchmarkOutput::Agent(input)).unwrap() {
        Evaluation::Agent(result) => assert_eq!(result, direct),
        other => panic!("unexpected evaluation: {other:?}"),
    }
}

#[test]
fn unknown_pathology_name_is_an_error() {
    let err = get_evaluator_by_name("gastritis", GroundTruth::default())
        .err()
        .unwrap();
    assert!(matches!(err, EvalError::UnknownPathology(name) if name == "gastritis"));

    let evaluator = get_evaluator_by_name(" Pancreatitis ", GroundTruth::default()).unwrap();
    assert_eq!(evaluator.pathology(), Pathology::Pancreatitis);
}
