use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::ground_truth::GroundTruth;
use super::pathology::Pathology;
use crate::error::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Demographics {
    pub age: u32,
    pub gender: String,
}

/// One hospital admission, as extracted from the admission records.
///
/// Only the fields the evaluator needs are typed; lab, microbiology and
/// radiology detail belong to the tool layer and are ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HadmCase {
    pub hadm_id: i64,
    #[serde(default)]
    pub pathology: Option<Pathology>,
    #[serde(default)]
    pub demographics: Option<Demographics>,
    #[serde(default)]
    pub patient_history: Option<String>,
    #[serde(default)]
    pub physical_exam_text: Option<String>,
    #[serde(default)]
    pub ground_truth: Option<GroundTruth>,
}

impl HadmCase {
    pub fn require_pathology(&self) -> Result<Pathology, CoreError> {
        self.pathology
            .ok_or_else(|| CoreError::MissingField(format!("pathology (hadm_id {})", self.hadm_id)))
    }

    pub fn require_ground_truth(&self) -> Result<&GroundTruth, CoreError> {
        self.ground_truth.as_ref().ok_or_else(|| {
            CoreError::MissingField(format!("ground_truth (hadm_id {})", self.hadm_id))
        })
    }
}

/// Root of a benchmark dataset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BenchmarkDataset {
    #[serde(default)]
    pub cases: Vec<HadmCase>,
}

impl BenchmarkDataset {
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Keep only the first `n` cases.
    pub fn truncate(&mut self, n: usize) {
        self.cases.truncate(n);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HadmCase> {
        self.cases.iter()
    }
}

impl<'a> IntoIterator for &'a BenchmarkDataset {
    type Item = &'a HadmCase;
    type IntoIter = std::slice::Iter<'a, HadmCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}
