//! Scoring a set of recorded runs against a benchmark dataset.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use cdm_core::models::agent_run::BenchmarkOutput;
use cdm_core::models::case::HadmCase;
use cdm_core::models::eval_output::{EvalOutput, EvalOutputFullInfo};
use cdm_evaluators::benchmark::normalize_diagnosis;
use cdm_evaluators::{BenchmarkEvaluator, BenchmarkSummary, Evaluation, get_evaluator};

use crate::config::RunMode;
use crate::dataset::{load_cases, load_runs};
use crate::error::RunnerError;
use crate::results::ResultsWriter;

#[derive(Debug, Clone)]
pub struct ScoreOptions {
    pub cases_path: PathBuf,
    pub runs_path: PathBuf,
    pub out_path: PathBuf,
    pub mode: RunMode,
    pub num_cases: Option<usize>,
    pub summary_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub finished_at: jiff::Timestamp,
    pub mode: RunMode,
    pub evaluated: usize,
    /// Cases without a pathology, ground truth or recorded run.
    pub skipped: usize,
    /// Cases whose evaluation returned an error.
    pub failed: usize,
    pub benchmark: BenchmarkSummary,
}

/// One evaluated case, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoredCase {
    Agent(Box<EvalOutput>),
    FullInfo(Box<EvalOutputFullInfo>),
}

impl ScoredCase {
    /// The model's raw diagnosis.
    pub fn predicted_diagnosis(&self) -> &str {
        match self {
            ScoredCase::Agent(out) => &out.prediction.final_diagnosis,
            ScoredCase::FullInfo(out) => &out.prediction.diagnosis,
        }
    }

    fn write_to(&self, writer: &mut ResultsWriter) -> Result<(), RunnerError> {
        match self {
            ScoredCase::Agent(out) => writer.write(out.as_ref()),
            ScoredCase::FullInfo(out) => writer.write(out.as_ref()),
        }
    }
}

fn output_mode(output: &BenchmarkOutput) -> RunMode {
    match output {
        BenchmarkOutput::Agent(_) => RunMode::Agent,
        BenchmarkOutput::FullInfo(_) => RunMode::FullInfo,
    }
}

/// Evaluate one case's recorded output. `Ok(None)` means the case cannot be
/// scored (no pathology or ground truth) and should be skipped.
pub fn score_case(
    case: &HadmCase,
    output: &BenchmarkOutput,
    mode: RunMode,
) -> Result<Option<ScoredCase>, RunnerError> {
    let (pathology, ground_truth) = match (case.require_pathology(), case.require_ground_truth())
    {
        (Ok(pathology), Ok(ground_truth)) => (pathology, ground_truth),
        (Err(e), _) | (_, Err(e)) => {
            debug!(hadm_id = case.hadm_id, error = %e, "case cannot be scored");
            return Ok(None);
        }
    };

    let mismatch = || RunnerError::ModeMismatch {
        hadm_id: case.hadm_id,
        expected: mode.as_str(),
    };
    if output_mode(output) != mode {
        return Err(mismatch());
    }

    let evaluator = get_evaluator(pathology, ground_truth.clone());
    let scored = match (output, evaluator.evaluate(output)?) {
        (BenchmarkOutput::Agent(run), Evaluation::Agent(result)) => {
            ScoredCase::Agent(Box::new(EvalOutput {
                hadm_id: case.hadm_id,
                ground_truth: ground_truth.clone(),
                pathology,
                prediction: run.parsed_output.clone(),
                tool_calls: run.tool_call_counts(),
                answers: result.answers,
                scores: result.scores,
            }))
        }
        (BenchmarkOutput::FullInfo(info), Evaluation::FullInfo(scores)) => {
            ScoredCase::FullInfo(Box::new(EvalOutputFullInfo {
                hadm_id: case.hadm_id,
                ground_truth: ground_truth.clone(),
                pathology,
                prediction: info.clone(),
                scores,
            }))
        }
        _ => return Err(mismatch()),
    };
    Ok(Some(scored))
}

/// Score every case that has a recorded run, write the per-case results
/// and fold the aggregate accuracy. The results file is truncated first.
/// A failing case is logged and left out of the aggregate.
///
/// The aggregate compares class labels literally, so the prediction is
/// reduced to its class label before it is recorded.
pub fn score_runs(options: &ScoreOptions) -> Result<RunSummary, RunnerError> {
    let dataset = load_cases(&options.cases_path, options.num_cases)?;
    let runs = load_runs(&options.runs_path)?;
    let mut writer = ResultsWriter::create(&options.out_path)?;
    let mut benchmark = BenchmarkEvaluator::new();
    let run_id = Uuid::new_v4();
    let (mut skipped, mut failed) = (0, 0);

    info!(%run_id, mode = options.mode.as_str(), cases = dataset.len(), "scoring started");

    for case in &dataset {
        let Some(output) = runs.get(&case.hadm_id) else {
            warn!(hadm_id = case.hadm_id, "no recorded run, skipped");
            skipped += 1;
            continue;
        };

        match score_case(case, output, options.mode) {
            Ok(Some(scored)) => {
                scored.write_to(&mut writer)?;
                let ground_truth = case
                    .ground_truth
                    .as_ref()
                    .map(|gt| gt.primary_diagnosis.join(", "));
                let predicted = normalize_diagnosis(scored.predicted_diagnosis());
                benchmark.record(ground_truth.as_deref(), Some(predicted));
            }
            Ok(None) => {
                warn!(hadm_id = case.hadm_id, "missing pathology or ground truth, skipped");
                skipped += 1;
            }
            Err(e) => {
                error!(hadm_id = case.hadm_id, error = %e, "evaluation failed");
                failed += 1;
            }
        }
    }

    let summary = RunSummary {
        run_id,
        finished_at: jiff::Timestamp::now(),
        mode: options.mode,
        evaluated: writer.written(),
        skipped,
        failed,
        benchmark: benchmark.summary(),
    };
    info!(
        %run_id,
        evaluated = summary.evaluated,
        skipped,
        failed,
        accuracy = summary.benchmark.accuracy,
        out = %writer.path().display(),
        "scoring finished"
    );

    if let Some(path) = &options.summary_path {
        write_summary(&summary, path)?;
    }
    Ok(summary)
}

pub fn write_summary(summary: &RunSummary, path: &Path) -> Result<(), RunnerError> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json).map_err(|e| RunnerError::io(path, e))
}
