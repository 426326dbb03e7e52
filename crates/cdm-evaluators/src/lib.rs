//! cdm-evaluators
//!
//! Deterministic scoring of model output against pathology-specific
//! clinical guidelines. Pure computation over in-memory records; no I/O.

pub mod benchmark;
pub mod error;
pub mod evaluator;
pub mod fuzzy;
pub mod guideline;
pub mod keywords;
pub mod mappings;
pub mod pathologies;
pub mod procedures;

use std::str::FromStr;

use cdm_core::Pathology;
use cdm_core::models::ground_truth::GroundTruth;

pub use benchmark::{BenchmarkEvaluator, BenchmarkSummary};
pub use error::EvalError;
pub use evaluator::{CaseEvaluation, CaseResult, Evaluation, Evaluator, Stage};
pub use guideline::Guideline;

/// Return all registered guidelines.
pub fn all_guidelines() -> Vec<Box<dyn Guideline>> {
    vec![
        Box::new(pathologies::Appendicitis),
        Box::new(pathologies::Cholecystitis),
        Box::new(pathologies::Diverticulitis),
        Box::new(pathologies::Pancreatitis),
    ]
}

/// The guideline for a pathology.
pub fn get_guideline(pathology: Pathology) -> Box<dyn Guideline> {
    match pathology {
        Pathology::Appendicitis => Box::new(pathologies::Appendicitis),
        Pathology::Cholecystitis => Box::new(pathologies::Cholecystitis),
        Pathology::Diverticulitis => Box::new(pathologies::Diverticulitis),
        Pathology::Pancreatitis => Box::new(pathologies::Pancreatitis),
    }
}

pub fn get_evaluator(pathology: Pathology, ground_truth: GroundTruth) -> Evaluator {
    Evaluator::new(get_guideline(pathology), ground_truth)
}

/// Like [`get_evaluator`], for a pathology given by name.
pub fn get_evaluator_by_name(
    pathology: &str,
    ground_truth: GroundTruth,
) -> Result<Evaluator, EvalError> {
    let pathology = Pathology::from_str(pathology)
        .map_err(|_| EvalError::UnknownPathology(pathology.to_string()))?;
    Ok(get_evaluator(pathology, ground_truth))
}
