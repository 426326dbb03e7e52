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
    ALTERNATE_COLECTOMY_KEYWORDS, COLECTOMY_PROCEDURES_ICD9, COLECTOMY_PROCEDURES_ICD10,
    COLECTOMY_PROCEDURES_KEYWORDS, COMPLETE_BLOOD_COUNT, DRAINAGE_LOCATIONS_DIVERTICULITIS,
    DRAINAGE_PROCEDURES_ALL_ICD10, DRAINAGE_PROCEDURES_ICD9, DRAINAGE_PROCEDURES_KEYWORDS,
    INFLAMMATION_LAB_TESTS, LIVER_FUNCTION_PANEL, RENAL_FUNCTION_PANEL, URINALYSIS,
    drainage_alternatives,
};
use crate::procedures::AltKeywords;

/// Acute diverticulitis. CT is preferred over ultrasound (the reverse of
/// appendicitis); colonoscopy follow-up is always expected, drainage and
/// colectomy only when the admission actually involved them.
pub struct Diverticulitis;

const ALTERNATIVE_NAMES: &[AltKeywords] = &[AltKeywords::new(
    "diverticul",
    &["infect", "inflam", "abscess", "rupture", "perf"],
)];

const GRACIOUS_ALTERNATIVE_NAMES: &[AltKeywords] = &[
    AltKeywords::new("acute colonic", &["perfor"]),
    AltKeywords::new("sigmoid", &["perfor"]),
    AltKeywords::new("sigmoid", &["colitis"]),
];

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

static DRAINAGE_ALTERNATIVES: LazyLock<Vec<AltKeywords>> =
    LazyLock::new(|| drainage_alternatives(DRAINAGE_LOCATIONS_DIVERTICULITIS));

impl Guideline for Diverticulitis {
    fn pathology(&self) -> Pathology {
        Pathology::Diverticulitis
    }

    fn alternative_names(&self) -> &[AltKeywords] {
        ALTERNATIVE_NAMES
    }

    fn gracious_alternative_names(&self) -> &[AltKeywords] {
        GRACIOUS_ALTERNATIVE_NAMES
    }

    fn required_lab_tests(&self) -> &[LabCategory] {
        REQUIRED_LAB_TESTS
    }

    fn neutral_lab_tests(&self) -> &BTreeSet<LabTestId> {
        &NEUTRAL_LAB_TESTS
    }

    fn treatment_defaults(&self) -> &[(Procedure, bool)] {
        &[
            (Procedure::Colonoscopy, true),
            (Procedure::Antibiotics, true),
            (Procedure::Support, true),
            (Procedure::Drainage, false),
            (Procedure::Colectomy, false),
        ]
    }

    fn score_imaging(&self, region: &str, modality: &str, _: &GroundTruth) -> ImagingGrade {
        if region != "abdomen" {
            return ImagingGrade::incorrect_region();
        }
        match modality {
            "ct" => ImagingGrade::FirstCorrect {
                points: 2,
                explanation: "CORRECT: Preferred imaging modality was ordered (CT) in the correct order"
                    .to_string(),
            },
            "ultrasound" | "us" | "mri" => ImagingGrade::FirstCorrect {
                points: 1,
                explanation: format!(
                    "ACCEPTABLE: {modality} is acceptable but should not be done before CT"
                ),
            },
            _ => ImagingGrade::Rejected {
                explanation: Some(
                    "INCORRECT MODALITY: None of US/MRI/CT imaging were ordered".to_string(),
                ),
            },
        }
    }

    fn score_treatment(&self, ctx: &TreatmentContext<'_>, assessment: &mut TreatmentAssessment) {
        if ctx.requested("colonoscopy") {
            assessment.requested.mark(Procedure::Colonoscopy);
        }

        if ctx.requested("antibiotic") {
            assessment.requested.mark(Procedure::Antibiotics);
        }

        if supportive_care_requested(ctx) {
            assessment.requested.mark(Procedure::Support);
        }

        if ctx.coded(&[DRAINAGE_PROCEDURES_ICD9, DRAINAGE_PROCEDURES_ALL_ICD10])
            || (ctx.performed(DRAINAGE_PROCEDURES_KEYWORDS)
                && ctx.performed(DRAINAGE_LOCATIONS_DIVERTICULITIS))
        {
            assessment.required.mark(Procedure::Drainage);
        }

        if ctx.requested_procedure(&[], &DRAINAGE_ALTERNATIVES) {
            assessment.requested.mark(Procedure::Drainage);
        }

        if ctx.coded(&[COLECTOMY_PROCEDURES_ICD9, COLECTOMY_PROCEDURES_ICD10])
            || ctx.performed(COLECTOMY_PROCEDURES_KEYWORDS)
        {
            assessment.required.mark(Procedure::Colectomy);
        }

        if ctx.requested_procedure(COLECTOMY_PROCEDURES_KEYWORDS, ALTERNATE_COLECTOMY_KEYWORDS) {
            assessment.requested.mark(Procedure::Colectomy);
        }
    }
}
