//! Loading benchmark cases and pre-recorded model runs.

use std::collections::BTreeMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cdm_core::models::agent_run::BenchmarkOutput;
use cdm_core::models::case::BenchmarkDataset;

use crate::error::RunnerError;

/// One line of a runs file: the model output for one admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedRun {
    pub hadm_id: i64,
    pub output: BenchmarkOutput,
}

/// Read a dataset file, keeping at most `num_cases` cases.
pub fn load_cases(path: &Path, num_cases: Option<usize>) -> Result<BenchmarkDataset, RunnerError> {
    let contents = std::fs::read_to_string(path).map_err(|e| RunnerError::io(path, e))?;
    let mut dataset: BenchmarkDataset = serde_json::from_str(&contents)?;
    if let Some(n) = num_cases {
        dataset.truncate(n);
    }
    info!(path = %path.display(), cases = dataset.len(), "loaded benchmark cases");
    Ok(dataset)
}

/// Read a JSONL runs file into a map keyed by `hadm_id`. Blank lines are
/// skipped; a later run for the same admission replaces an earlier one.
pub fn load_runs(path: &Path) -> Result<BTreeMap<i64, BenchmarkOutput>, RunnerError> {
    let file = std::fs::File::open(path).map_err(|e| RunnerError::io(path, e))?;
    let mut runs = BTreeMap::new();

    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| RunnerError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let run: RecordedRun =
            serde_json::from_str(&line).map_err(|source| RunnerError::InvalidLine {
                path: path.to_path_buf(),
                line: i + 1,
                source,
            })?;
        if runs.insert(run.hadm_id, run.output).is_some() {
            warn!(hadm_id = run.hadm_id, "duplicate run, keeping the last one");
        }
    }

    info!(path = %path.display(), runs = runs.len(), "loaded recorded runs");
    Ok(runs)
}
