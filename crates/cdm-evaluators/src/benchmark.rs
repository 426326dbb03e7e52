//! Corpus-level diagnosis accuracy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use cdm_core::Pathology;

/// Class assigned to diagnoses that match none of the pathology stems.
pub const OTHER_DIAGNOSIS: &str = "other";

/// Stems tested in this order; the first contained stem decides the class.
const DIAGNOSIS_STEMS: [(&str, Pathology); 4] = [
    ("appendicit", Pathology::Appendicitis),
    ("cholecyst", Pathology::Cholecystitis),
    ("diverticul", Pathology::Diverticulitis),
    ("pancreat", Pathology::Pancreatitis),
];

/// Map free text onto one of the four pathology names, or `"other"`.
pub fn normalize_diagnosis(text: &str) -> &'static str {
    let lowered = text.to_lowercase();
    DIAGNOSIS_STEMS
        .iter()
        .find(|(stem, _)| lowered.contains(stem))
        .map_or(OTHER_DIAGNOSIS, |(_, pathology)| pathology.as_str())
}

/// Literal comparison. The prediction is expected to already be a class
/// name; it is deliberately not normalised here.
pub fn diagnoses_match(normalized_ground_truth: &str, predicted: &str) -> bool {
    normalized_ground_truth == predicted
}

fn allowed(diagnosis: &str) -> Option<Pathology> {
    Pathology::ALL.into_iter().find(|p| p.as_str() == diagnosis)
}

fn accuracy(correct: usize, cases: usize) -> f64 {
    if cases == 0 {
        0.0
    } else {
        correct as f64 / cases as f64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisTally {
    pub cases: usize,
    pub correct: usize,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BenchmarkSummary {
    pub processed_cases: usize,
    pub correct: usize,
    /// Predictions outside the four pathology names.
    pub unknown: usize,
    pub accuracy: f64,
    /// Every pathology, including those with no cases.
    pub per_diagnosis: BTreeMap<String, DiagnosisTally>,
}

/// Running totals over many cases. Fed one [`record`](Self::record) per
/// case; cases that failed to evaluate should not be recorded.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkEvaluator {
    processed: usize,
    correct: usize,
    unknown: usize,
    per_class: BTreeMap<Pathology, (usize, usize)>,
}

impl BenchmarkEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in one case. Returns the normalised ground truth and whether the
    /// prediction matched it.
    pub fn record(
        &mut self,
        ground_truth: Option<&str>,
        predicted: Option<&str>,
    ) -> (&'static str, bool) {
        let normalized = normalize_diagnosis(ground_truth.unwrap_or_default());
        let predicted = predicted.unwrap_or_default();
        let is_correct = diagnoses_match(normalized, predicted);

        self.processed += 1;
        if is_correct {
            self.correct += 1;
        }
        if allowed(predicted).is_none() {
            self.unknown += 1;
        }
        if let Some(class) = allowed(normalized) {
            let (cases, correct) = self.per_class.entry(class).or_default();
            *cases += 1;
            if is_correct {
                *correct += 1;
            }
        }

        (normalized, is_correct)
    }

    pub fn processed_cases(&self) -> usize {
        self.processed
    }

    pub fn summary(&self) -> BenchmarkSummary {
        let per_diagnosis = Pathology::ALL
            .into_iter()
            .map(|p| {
                let (cases, correct) = self.per_class.get(&p).copied().unwrap_or_default();
                let tally = DiagnosisTally {
                    cases,
                    correct,
                    accuracy: accuracy(correct, cases),
                };
                (p.as_str().to_string(), tally)
            })
            .collect();

        BenchmarkSummary {
            processed_cases: self.processed,
            correct: self.correct,
            unknown: self.unknown,
            accuracy: accuracy(self.correct, self.processed),
            per_diagnosis,
        }
    }
}
