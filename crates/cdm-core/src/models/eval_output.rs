use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::agent_run::{BenchmarkOutputCdm, BenchmarkOutputFullInfo};
use super::ground_truth::GroundTruth;
use super::pathology::Pathology;
use super::scores::{CaseAnswers, CaseScores, DiagnosisScores};

/// Per-case evaluation record for an interactive run, one JSONL line each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvalOutput {
    pub hadm_id: i64,
    pub ground_truth: GroundTruth,
    pub pathology: Pathology,
    pub prediction: BenchmarkOutputCdm,
    /// Calls per tool name, plus `"total"`.
    pub tool_calls: BTreeMap<String, usize>,
    pub answers: CaseAnswers,
    pub scores: CaseScores,
}

/// Per-case evaluation record for the full-information baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvalOutputFullInfo {
    pub hadm_id: i64,
    pub ground_truth: GroundTruth,
    pub pathology: Pathology,
    pub prediction: BenchmarkOutputFullInfo,
    pub scores: DiagnosisScores,
}
