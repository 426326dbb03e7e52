//! Pathology-specific clinical guideline policy.
//!
//! A [`Guideline`] holds everything that differs between pathologies: the
//! alternate disease names, which labs are required, the imaging
//! preference ladder and the treatment rules. The shared scoring state
//! machine lives in [`crate::evaluator`] and consults the guideline at each
//! step.

use std::collections::BTreeSet;

use cdm_core::Pathology;
use cdm_core::models::ground_truth::GroundTruth;
use cdm_core::models::scores::{LabTestId, Procedure, TreatmentFlags};

use crate::keywords::keyword_present_in_any;
use crate::procedures::{
    AltKeywords, alt_procedure_checker, any_code_in, procedure_checker, procedure_icd_codes,
};

/// A named group of clinically equivalent lab tests. Ordering any one test
/// of the group covers the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabCategory {
    pub name: &'static str,
    pub tests: &'static [LabTestId],
}

impl LabCategory {
    pub const fn new(name: &'static str, tests: &'static [LabTestId]) -> Self {
        Self { name, tests }
    }
}

/// Union of `panels` minus every test already required by `required`.
pub fn neutral_lab_tests(
    panels: &[&[LabTestId]],
    required: &[LabCategory],
) -> BTreeSet<LabTestId> {
    let required: BTreeSet<LabTestId> = required
        .iter()
        .flat_map(|c| c.tests.iter().copied())
        .collect();
    let broad: BTreeSet<LabTestId> = panels.iter().flat_map(|p| p.iter().copied()).collect();
    broad.difference(&required).copied().collect()
}

/// How a guideline judges one imaging request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagingGrade {
    /// Valid order. `points` are recorded only if no imaging score exists
    /// yet, so the first correct order wins.
    FirstCorrect { points: u32, explanation: String },
    /// Valid order whose `points` add to the existing imaging score.
    Cumulative { points: u32, explanation: String },
    /// Valid order that leaves the score untouched.
    Accepted,
    /// Invalid order.
    Rejected { explanation: Option<String> },
}

impl ImagingGrade {
    pub fn is_valid(&self) -> bool {
        !matches!(self, ImagingGrade::Rejected { .. })
    }

    pub(crate) fn incorrect_region() -> Self {
        ImagingGrade::Rejected {
            explanation: Some("INCORRECT REGION: Only abdomen should be imaged".to_string()),
        }
    }
}

/// Inputs available to treatment scoring.
pub struct TreatmentContext<'a> {
    pub ground_truth: &'a GroundTruth,
    /// The model's free-text treatment plan.
    pub treatment: &'a [String],
    icd_codes: BTreeSet<String>,
    titles: Vec<&'a str>,
}

impl<'a> TreatmentContext<'a> {
    pub fn new(ground_truth: &'a GroundTruth, treatment: &'a [String]) -> Self {
        Self {
            ground_truth,
            treatment,
            icd_codes: procedure_icd_codes(&ground_truth.treatments),
            titles: ground_truth.treatment_titles(),
        }
    }

    /// Keyword is positive somewhere in the model's treatment plan.
    pub fn requested(&self, keyword: &str) -> bool {
        keyword_present_in_any(self.treatment, keyword)
    }

    /// Any procedure name, or any alternate phrasing, appears in the plan.
    pub fn requested_procedure(&self, names: &[&str], alternatives: &[AltKeywords]) -> bool {
        procedure_checker(names, self.treatment)
            || alt_procedure_checker(alternatives, self.treatment)
    }

    /// Any of the ground-truth procedure codes is in one of `tables`.
    pub fn coded(&self, tables: &[&[&str]]) -> bool {
        any_code_in(&self.icd_codes, tables)
    }

    /// Any procedure name is positive in a ground-truth treatment title.
    pub fn performed(&self, names: &[&str]) -> bool {
        procedure_checker(names, &self.titles)
    }

    /// Keyword is positive in the ground-truth diagnosis list.
    pub fn diagnosis_mentions(&self, keyword: &str) -> bool {
        keyword_present_in_any(&self.ground_truth.primary_diagnosis, keyword)
    }
}

/// Requested/required treatment maps for one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreatmentAssessment {
    pub requested: TreatmentFlags,
    pub required: TreatmentFlags,
}

/// Pathology-specific scoring policy.
pub trait Guideline: Send + Sync {
    fn pathology(&self) -> Pathology;

    /// Exact alternate names, e.g. "gangrenous appendix".
    fn alternative_names(&self) -> &[AltKeywords];

    /// Looser, disease-adjacent names that only earn a gracious match.
    fn gracious_alternative_names(&self) -> &[AltKeywords] {
        &[]
    }

    /// Required lab categories, in lookup order.
    fn required_lab_tests(&self) -> &[LabCategory];

    /// Broad-panel tests that are neither required nor unknown.
    fn neutral_lab_tests(&self) -> &BTreeSet<LabTestId>;

    /// Tracked treatments and whether each is required before the ground
    /// truth is consulted.
    fn treatment_defaults(&self) -> &[(Procedure, bool)];

    fn score_imaging(
        &self,
        region: &str,
        modality: &str,
        ground_truth: &GroundTruth,
    ) -> ImagingGrade;

    fn score_treatment(&self, ctx: &TreatmentContext<'_>, assessment: &mut TreatmentAssessment);

    /// Fresh requested/required maps for this pathology.
    fn initial_treatment(&self) -> TreatmentAssessment {
        let required = TreatmentFlags::new(self.treatment_defaults().iter().copied());
        TreatmentAssessment {
            requested: required.cleared(),
            required,
        }
    }
}

/// Supportive care: fluids or analgesia.
pub(crate) fn supportive_care_requested(ctx: &TreatmentContext<'_>) -> bool {
    ctx.requested("fluid") || ctx.requested("analgesi") || ctx.requested("pain")
}
