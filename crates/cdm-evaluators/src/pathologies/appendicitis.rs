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
    ALTERNATE_APPENDECTOMY_KEYWORDS, APPENDECTOMY_PROCEDURES_ICD9, APPENDECTOMY_PROCEDURES_ICD10,
    APPENDECTOMY_PROCEDURES_KEYWORDS, COMPLETE_BLOOD_COUNT, INFLAMMATION_LAB_TESTS,
    LIVER_FUNCTION_PANEL, RENAL_FUNCTION_PANEL, URINALYSIS,
};
use crate::procedures::AltKeywords;

/// Acute appendicitis. Ultrasound first, CT or MRI acceptable; surgery is
/// judged against the coded appendectomy, antibiotics and supportive care
/// are always expected.
pub struct Appendicitis;

const ALTERNATIVE_NAMES: &[AltKeywords] = &[AltKeywords::new(
    "appendi",
    &["gangren", "infect", "inflam", "abscess", "rupture", "necros", "perf"],
)];

const REQUIRED_LAB_TESTS: &[LabCategory] =
    &[LabCategory::new("Inflammation", INFLAMMATION_LAB_TESTS)];

static NEUTRAL_LAB_TESTS: LazyLock<BTreeSet<LabTestId>> = LazyLock::new(|| {
    neutral_lab_tests(
        &[
            COMPLETE_BLOOD_COUNT,
            LIVER_FUNCTION_PANEL,
            RENAL_FUNCTION_PANEL,
            URINALYSIS,
        ],
        REQUIRED_LAB_TESTS,
    )
});

impl Guideline for Appendicitis {
    fn pathology(&self) -> Pathology {
        Pathology::Appendicitis
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
            (Procedure::Appendectomy, false),
            (Procedure::Antibiotics, true),
            (Procedure::Support, true),
        ]
    }

    fn score_imaging(&self, region: &str, modality: &str, _: &GroundTruth) -> ImagingGrade {
        if region != "abdomen" {
            return ImagingGrade::incorrect_region();
        }
        match modality {
            "ultrasound" | "us" => ImagingGrade::FirstCorrect {
                points: 2,
                explanation: "CORRECT: Preferred imaging modality was ordered (Ultrasound) in the correct order".to_string(),
            },
            "ct" => ImagingGrade::FirstCorrect {
                points: 1,
                explanation: "ACCEPTABLE: CT is acceptable but should not be done before US"
                    .to_string(),
            },
            // Preferred over CT in pregnancy.
            "mri" => ImagingGrade::FirstCorrect {
                points: 1,
                explanation: "ACCEPTABLE: MRI is acceptable but should not be done before US (preferred to CT for pregnant patients)".to_string(),
            },
            _ => ImagingGrade::Rejected {
                explanation: Some(
                    "INCORRECT MODALITY: None of US/MRI/CT imaging were ordered".to_string(),
                ),
            },
        }
    }

    fn score_treatment(&self, ctx: &TreatmentContext<'_>, assessment: &mut TreatmentAssessment) {
        if ctx.coded(&[APPENDECTOMY_PROCEDURES_ICD10, APPENDECTOMY_PROCEDURES_ICD9])
            || ctx.performed(APPENDECTOMY_PROCEDURES_KEYWORDS)
        {
            assessment.required.mark(Procedure::Appendectomy);
        }

        if ctx.requested_procedure(APPENDECTOMY_PROCEDURES_KEYWORDS, ALTERNATE_APPENDECTOMY_KEYWORDS) {
            assessment.requested.mark(Procedure::Appendectomy);
        }

        if ctx.requested("antibiotic") {
            assessment.requested.mark(Procedure::Antibiotics);
        }

        if supportive_care_requested(ctx) {
            assessment.requested.mark(Procedure::Support);
        }
    }
}
