//! Per-case scoring state machine.
//!
//! A [`CaseEvaluation`] is the accumulator for one case. Its steps must run
//! in order: diagnosis, then the tool-call trace (zero or more calls, in
//! chronological order), then treatment, then [`CaseEvaluation::finish`].
//! Calling a step at the wrong time returns [`EvalError::OutOfOrder`]
//! instead of silently producing a half-scored case.
//!
//! [`Evaluator`] wraps a [`Guideline`] and a case's ground truth and drives
//! the whole sequence for a recorded run.

use serde::{Deserialize, Serialize};
use tracing::debug;

use cdm_core::Pathology;
use cdm_core::models::agent_run::{
    AgentRunResult, BenchmarkOutput, BenchmarkOutputFullInfo, ToolCall, tool_names,
};
use cdm_core::models::ground_truth::GroundTruth;
use cdm_core::models::scores::{
    CaseAnswers, CaseExplanations, CaseScores, DiagnosisScores, ImagingOrder, LabTestId,
};

use crate::error::EvalError;
use crate::fuzzy::{DIAGNOSIS_MATCH_THRESHOLD, ratio};
use crate::guideline::{Guideline, ImagingGrade, TreatmentAssessment, TreatmentContext};
use crate::keywords::keyword_present;
use crate::mappings::lab_panel;
use crate::procedures::AltKeywords;

/// Where a [`CaseEvaluation`] is in its step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Initialized,
    DiagnosisScored,
    ToolTraceWalked,
    TreatmentScored,
    Finalized,
}

/// Final per-case record of an interactive run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    pub answers: CaseAnswers,
    pub scores: CaseScores,
    pub explanations: CaseExplanations,
}

/// Result of [`Evaluator::evaluate`], matching the kind of output scored.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Agent(CaseResult),
    FullInfo(DiagnosisScores),
}

/// Accumulator for one case.
pub struct CaseEvaluation<'a> {
    guideline: &'a dyn Guideline,
    ground_truth: &'a GroundTruth,
    stage: Stage,
    answers: CaseAnswers,
    scores: CaseScores,
    explanations: CaseExplanations,
}

impl<'a> CaseEvaluation<'a> {
    pub fn new(guideline: &'a dyn Guideline, ground_truth: &'a GroundTruth) -> Self {
        let TreatmentAssessment {
            requested,
            required,
        } = guideline.initial_treatment();
        let correct_laboratory_tests = guideline
            .required_lab_tests()
            .iter()
            .map(|c| (c.name.to_string(), Vec::new()))
            .collect();

        Self {
            guideline,
            ground_truth,
            stage: Stage::Initialized,
            answers: CaseAnswers {
                correct_laboratory_tests,
                treatment_requested: requested,
                treatment_required: required,
                ..CaseAnswers::default()
            },
            scores: CaseScores::default(),
            explanations: CaseExplanations::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn answers(&self) -> &CaseAnswers {
        &self.answers
    }

    pub fn scores(&self) -> &CaseScores {
        &self.scores
    }

    pub fn explanations(&self) -> &CaseExplanations {
        &self.explanations
    }

    fn pathology(&self) -> Pathology {
        self.guideline.pathology()
    }

    fn expect_stage(&self, allowed: &[Stage], operation: &'static str) -> Result<(), EvalError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(EvalError::OutOfOrder {
                stage: self.stage,
                operation,
            })
        }
    }

    fn expect_trace(&mut self, operation: &'static str) -> Result<(), EvalError> {
        self.expect_stage(&[Stage::DiagnosisScored, Stage::ToolTraceWalked], operation)?;
        self.stage = Stage::ToolTraceWalked;
        Ok(())
    }

    /// Score the model's free-text diagnosis.
    ///
    /// Tiers are tried in order and the first hit wins: a fuzzy token match
    /// on the disease name, then an alternate name (both scores), then a
    /// gracious alternate name (gracious score only).
    pub fn score_diagnosis(&mut self, answer: &str) -> Result<(), EvalError> {
        self.expect_stage(&[Stage::Initialized], "score_diagnosis")?;
        self.answers.diagnosis = answer.to_string();
        self.stage = Stage::DiagnosisScored;

        let name = self.pathology().as_str();
        let lowered = answer.to_lowercase();
        let fuzzy_hit = lowered.split_whitespace().find(|token| {
            ratio(token, name) > DIAGNOSIS_MATCH_THRESHOLD && keyword_present(answer, token)
        });
        if let Some(token) = fuzzy_hit {
            self.scores.diagnosis = 1;
            self.scores.gracious_diagnosis = 1;
            self.explanations.diagnosis =
                format!("CORRECT: '{token}' matches the diagnosis {name}");
            debug!(pathology = %name, token, "diagnosis matched by name");
            return Ok(());
        }

        if let Some((location, modifier)) =
            first_alternative(self.guideline.alternative_names(), answer)
        {
            self.scores.diagnosis = 1;
            self.scores.gracious_diagnosis = 1;
            self.explanations.diagnosis = format!(
                "CORRECT: '{location}' with '{modifier}' is an alternative name for {name}"
            );
            debug!(pathology = %name, location, modifier, "diagnosis matched by alternative name");
            return Ok(());
        }

        if let Some((location, modifier)) =
            first_alternative(self.guideline.gracious_alternative_names(), answer)
        {
            self.scores.gracious_diagnosis = 1;
            self.explanations.diagnosis = format!(
                "GRACIOUS: '{location}' with '{modifier}' is accepted in place of {name}"
            );
            debug!(pathology = %name, location, modifier, "diagnosis matched graciously");
            return Ok(());
        }

        debug!(pathology = %name, "diagnosis not matched");
        Ok(())
    }

    /// Dispatch one tool call by name. Tools without a scoring rule are
    /// ignored.
    pub fn score_tool_call(&mut self, index: usize, call: &ToolCall) -> Result<(), EvalError> {
        match call.name.as_str() {
            tool_names::PHYSICAL_EXAMINATION => self.score_physical_exam(index),
            tool_names::REQUEST_LAB_TEST => self.score_lab(index, call),
            tool_names::REQUEST_IMAGING => self.score_imaging_action(index, call),
            other => {
                self.expect_trace("score_tool_call")?;
                debug!(tool = other, index, "tool call not scored");
                Ok(())
            }
        }
    }

    /// Physical examination should be the very first action.
    pub fn score_physical_exam(&mut self, index: usize) -> Result<(), EvalError> {
        self.expect_trace("score_physical_exam")?;

        self.scores.late_physical_examination = 1;
        if index == 0 {
            self.scores.physical_examination = 1;
            self.explanations.physical =
                "CORRECT: Physical examination was performed as the first action".to_string();
        } else if self.scores.physical_examination == 0 {
            self.explanations.physical = format!(
                "PROTOCOL VIOLATION: Physical examination was performed at position {index} \
                 instead of as the first action"
            );
        }
        debug!(index, score = self.scores.physical_examination, "physical examination");
        Ok(())
    }

    /// Classify one lab request as correct (per category), unnecessary
    /// (neutral panel test) or unknown (dropped). A panel name expands to
    /// each of its tests.
    pub fn score_lab(&mut self, index: usize, call: &ToolCall) -> Result<(), EvalError> {
        self.expect_trace("score_lab")?;
        for test_id in lab_test_ids(index, call)? {
            self.record_lab(test_id);
        }
        Ok(())
    }

    fn record_lab(&mut self, test_id: LabTestId) {
        let category = self
            .guideline
            .required_lab_tests()
            .iter()
            .find(|c| c.tests.contains(&test_id));

        if let Some(category) = category {
            let recorded = self
                .answers
                .correct_laboratory_tests
                .entry(category.name.to_string())
                .or_default();
            if recorded.is_empty() {
                self.scores.laboratory_tests += 1;
            }
            recorded.push(test_id);
            debug!(test_id, category = category.name, "required lab test");
        } else if self.guideline.neutral_lab_tests().contains(&test_id) {
            self.answers.unnecessary_laboratory_tests.push(test_id);
            debug!(test_id, "neutral lab test");
        } else {
            debug!(test_id, "lab test not in any list");
        }
    }

    /// Grade one imaging request and file it as correct or unnecessary.
    pub fn score_imaging_action(&mut self, index: usize, call: &ToolCall) -> Result<(), EvalError> {
        self.expect_trace("score_imaging_action")?;
        let region = required_str(index, call, "region")?.trim().to_lowercase();
        let modality = required_str(index, call, "modality")?.trim().to_lowercase();

        let grade = self
            .guideline
            .score_imaging(&region, &modality, self.ground_truth);
        let valid = grade.is_valid();
        match grade {
            ImagingGrade::FirstCorrect {
                points,
                explanation,
            } => {
                if self.scores.imaging == 0 {
                    self.scores.imaging = points;
                    self.explanations.imaging = explanation;
                }
            }
            ImagingGrade::Cumulative {
                points,
                explanation,
            } => {
                self.scores.imaging += points;
                self.explanations.imaging = explanation;
            }
            ImagingGrade::Accepted => {}
            ImagingGrade::Rejected { explanation } => {
                if let Some(explanation) = explanation {
                    self.explanations.imaging = explanation;
                }
            }
        }

        let order = ImagingOrder { region, modality };
        if valid && !self.answers.correct_imaging.contains(&order) {
            debug!(
                region = %order.region,
                modality = %order.modality,
                score = self.scores.imaging,
                "correct imaging"
            );
            self.answers.correct_imaging.push(order);
        } else {
            debug!(
                region = %order.region,
                modality = %order.modality,
                valid,
                "unnecessary imaging"
            );
            self.answers.unnecessary_imaging.push(order);
        }
        Ok(())
    }

    /// Record the model's treatment plan and fill the requested/required
    /// maps from the guideline.
    pub fn score_treatment(&mut self, treatment: &[String]) -> Result<(), EvalError> {
        self.expect_stage(
            &[Stage::DiagnosisScored, Stage::ToolTraceWalked],
            "score_treatment",
        )?;
        self.answers.treatment = treatment.to_vec();

        let mut assessment = TreatmentAssessment {
            requested: std::mem::take(&mut self.answers.treatment_requested),
            required: std::mem::take(&mut self.answers.treatment_required),
        };
        let ctx = TreatmentContext::new(self.ground_truth, treatment);
        self.guideline.score_treatment(&ctx, &mut assessment);
        self.answers.treatment_requested = assessment.requested;
        self.answers.treatment_required = assessment.required;

        self.stage = Stage::TreatmentScored;
        Ok(())
    }

    /// Hand out the accumulated result. Only valid once, after treatment.
    pub fn finish(&mut self) -> Result<CaseResult, EvalError> {
        self.expect_stage(&[Stage::TreatmentScored], "finish")?;
        self.stage = Stage::Finalized;
        Ok(CaseResult {
            answers: std::mem::take(&mut self.answers),
            scores: std::mem::take(&mut self.scores),
            explanations: std::mem::take(&mut self.explanations),
        })
    }
}

fn first_alternative(
    alternatives: &[AltKeywords],
    text: &str,
) -> Option<(&'static str, &'static str)> {
    alternatives
        .iter()
        .find_map(|alt| alt.matching_modifier(text).map(|m| (alt.location, m)))
}

fn malformed(call: &ToolCall, index: usize, reason: impl Into<String>) -> EvalError {
    EvalError::MalformedToolCall {
        tool: call.name.clone(),
        index,
        reason: reason.into(),
    }
}

fn required_str<'c>(index: usize, call: &'c ToolCall, key: &str) -> Result<&'c str, EvalError> {
    match call.str_arg(key) {
        Some(value) => Ok(value),
        None if call.arg(key).is_some() => {
            Err(malformed(call, index, format!("'{key}' must be a string")))
        }
        None => Err(malformed(call, index, format!("missing '{key}'"))),
    }
}

/// `test_id` as a number, a numeric string or a known panel name.
fn lab_test_ids(index: usize, call: &ToolCall) -> Result<Vec<LabTestId>, EvalError> {
    let value = call
        .arg("test_id")
        .ok_or_else(|| malformed(call, index, "missing 'test_id'"))?;
    let parsed = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| LabTestId::try_from(n).ok())
            .map(|id| vec![id]),
        serde_json::Value::String(s) => match s.trim().parse::<LabTestId>() {
            Ok(id) => Some(vec![id]),
            Err(_) => lab_panel(s).map(<[LabTestId]>::to_vec),
        },
        _ => None,
    };
    parsed.ok_or_else(|| malformed(call, index, format!("invalid 'test_id': {value}")))
}

/// Scores every case of one pathology against its ground truth.
pub struct Evaluator {
    guideline: Box<dyn Guideline>,
    ground_truth: GroundTruth,
}

impl Evaluator {
    pub fn new(guideline: Box<dyn Guideline>, ground_truth: GroundTruth) -> Self {
        Self {
            guideline,
            ground_truth,
        }
    }

    pub fn pathology(&self) -> Pathology {
        self.guideline.pathology()
    }

    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    /// A fresh accumulator for stepping through a case by hand.
    pub fn begin(&self) -> CaseEvaluation<'_> {
        CaseEvaluation::new(self.guideline.as_ref(), &self.ground_truth)
    }

    /// Score an interactive run: diagnosis, every tool call in order, then
    /// treatment.
    pub fn evaluate_case(&self, run: &AgentRunResult) -> Result<CaseResult, EvalError> {
        let mut case = self.begin();
        case.score_diagnosis(&run.parsed_output.final_diagnosis)?;
        for (index, call) in run.tool_calls().enumerate() {
            case.score_tool_call(index, call)?;
        }
        case.score_treatment(&run.parsed_output.treatment)?;
        case.finish()
    }

    /// Score a full-information answer. Only the diagnosis is graded.
    pub fn evaluate_full_info(
        &self,
        output: &BenchmarkOutputFullInfo,
    ) -> Result<DiagnosisScores, EvalError> {
        let mut case = self.begin();
        case.score_diagnosis(&output.diagnosis)?;
        Ok(case.scores().diagnosis_scores())
    }

    pub fn evaluate(&self, output: &BenchmarkOutput) -> Result<Evaluation, EvalError> {
        match output {
            BenchmarkOutput::Agent(run) => self.evaluate_case(run).map(Evaluation::Agent),
            BenchmarkOutput::FullInfo(info) => {
                self.evaluate_full_info(info).map(Evaluation::FullInfo)
            }
        }
    }
}
