use std::collections::BTreeSet;
use std::sync::LazyLock;

use cdm_core::Pathology;
use cdm_core::models::ground_truth::GroundTruth;
use cdm_core::models::scores::{LabTestId, Procedure};

use crate::guideline::{
    Guideline, ImagingGrade, LabCategory, TreatmentAssessment, TreatmentContext,
    neutral_lab_tests, supportive_care_requested,
};
use crate::mappings::{
    ALTERNATE_CHOLECYSTECTOMY_KEYWORDS, CHOLECYSTECTOMY_PROCEDURES_ICD9,
    CHOLECYSTECTOMY_PROCEDURES_ICD10, CHOLECYSTECTOMY_PROCEDURES_KEYWORDS, COMPLETE_BLOOD_COUNT,
    INFLAMMATION_LAB_TESTS, RENAL_FUNCTION_PANEL, URINALYSIS,
};
use crate::procedures::AltKeywords;

/// Acute cholecystitis. Ultrasound or HIDA first; liver and gallbladder
/// chemistry count as separate required categories.
pub struct Cholecystitis;

const ALTERNATIVE_NAMES: &[AltKeywords] = &[AltKeywords::new(
    "gallbladder",
    &["gangren", "infect", "inflam", "abscess", "necros", "perf"],
)];

const REQUIRED_LAB_TESTS: &[LabCategory] = &[
    LabCategory::new("Inflammation", INFLAMMATION_LAB_TESTS),
    // ALT, AST
    LabCategory::new("Liver", &[50861, 50878]),
    // bilirubin, GGT
    LabCategory::new("Gallbladder", &[50883, 50927]),
];

static NEUTRAL_LAB_TESTS: LazyLock<BTreeSet<LabTestId>> = LazyLock::new(|| {
    neutral_lab_tests(
        &[COMPLETE_BLOOD_COUNT, RENAL_FUNCTION_PANEL, URINALYSIS],
        REQUIRED_LAB_TESTS,
    )
});

impl Guideline for Cholecystitis {
    fn pathology(&self) -> Pathology {
        Pathology::Cholecystitis
    }

    fn alternative_names(&self) -> &[AltKeywords] {
        ALTERNATIVE_NAMES
    }

    fn required_lab_tests(&self) -> &[LabCategory] {
        REQUIRED_LAB_TESTS
    }

    fn neutral_lab_tests(&self) -> &BTreeSet<LabTestId> {
        &NEUTRAL_LAB_TESTS
    }

    fn treatment_defaults(&self) -> &[(Procedure, bool)] {
        &[
            (Procedure::Cholecystectomy, false),
            (Procedure::Antibiotics, true),
            (Procedure::Support, true),
        ]
    }

    fn score_imaging(&self, region: &str, modality: &str, _: &GroundTruth) -> ImagingGrade {
        if region != "abdomen" {
            return ImagingGrade::incorrect_region();
        }
        match modality {
            "ultrasound" | "us" | "hida" => ImagingGrade::FirstCorrect {
                points: 2,
                explanation: format!(
                    "CORRECT: Preferred imaging modality was ordered ({modality}) in the correct order"
                ),
            },
            "mri" | "eus" => ImagingGrade::FirstCorrect {
                points: 1,
                explanation: format!(
                    "ACCEPTABLE: {modality} is acceptable but should not be done before US/HIDA"
                ),
            },
            _ => ImagingGrade::Rejected {
                explanation: Some(
                    "INCORRECT MODALITY: None of US/HIDA/MRI/EUS imaging were ordered".to_string(),
                ),
            },
        }
    }

    fn score_treatment(&self, ctx: &TreatmentContext<'_>, assessment: &mut TreatmentAssessment) {
        if ctx.coded(&[CHOLECYSTECTOMY_PROCEDURES_ICD10, CHOLECYSTECTOMY_PROCEDURES_ICD9])
            || ctx.performed(CHOLECYSTECTOMY_PROCEDURES_KEYWORDS)
        {
            assessment.required.mark(Procedure::Cholecystectomy);
        }

        if ctx.requested_procedure(
            CHOLECYSTECTOMY_PROCEDURES_KEYWORDS,
            ALTERNATE_CHOLECYSTECTOMY_KEYWORDS,
        ) {
            assessment.requested.mark(Procedure::Cholecystectomy);
        }

        if supportive_care_requested(ctx) {
            assessment.requested.mark(Procedure::Support);
        }

        if ctx.requested("antibiotic") {
            assessment.requested.mark(Procedure::Antibiotics);
        }
    }
}
