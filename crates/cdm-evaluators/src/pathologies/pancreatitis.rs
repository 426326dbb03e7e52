use std::collections::BTreeSet;
use std::sync::LazyLock;

use cdm_core::Pathology;
use cdm_core::models::ground_truth::GroundTruth;
use cdm_core::models::scores::{LabTestId, Procedure};

use crate::guideline::{
    Guideline, ImagingGrade, LabCategory, TreatmentAssessment, TreatmentContext,
    neutral_lab_tests,
};
use crate::keywords::keyword_present_in_any;
use crate::mappings::{
    ALTERNATE_CHOLECYSTECTOMY_KEYWORDS, CHOLECYSTECTOMY_PROCEDURES_KEYWORDS, COMPLETE_BLOOD_COUNT,
    DRAINAGE_LOCATIONS_PANCREATITIS, DRAINAGE_PROCEDURES_ALL_ICD10, DRAINAGE_PROCEDURES_ICD9,
    DRAINAGE_PROCEDURES_KEYWORDS, DRAINAGE_PROCEDURES_PANCREATITIS_ICD10, ERCP_PROCEDURES_ICD9,
    ERCP_PROCEDURES_ICD10, ERCP_PROCEDURES_KEYWORDS, INFLAMMATION_LAB_TESTS, LIVER_FUNCTION_PANEL,
    RENAL_FUNCTION_PANEL, URINALYSIS, drainage_alternatives,
};
use crate::procedures::AltKeywords;

/// Acute pancreatitis.
///
/// Biliary pancreatitis changes the picture: endoscopic ultrasound becomes
/// a scoring order and a cholecystectomy becomes part of the expected
/// treatment.
pub struct Pancreatitis;

const ALTERNATIVE_NAMES: &[AltKeywords] = &[AltKeywords::new(
    "pancrea",
    &["gangren", "infect", "inflam", "abscess", "necros"],
)];

const REQUIRED_LAB_TESTS: &[LabCategory] = &[
    LabCategory::new("Inflammation", INFLAMMATION_LAB_TESTS),
    // amylase, lipase
    LabCategory::new("Pancreas", &[50867, 50956]),
    // Ranson / BISAP style severity markers
    LabCategory::new(
        "Seriousness",
        &[
            51480, 50810, 51221, 51638, 51006, 52647, 51000, 50893, 50824, 52623, 50983, 52610,
            50971, 50822,
        ],
    ),
];

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
    LazyLock::new(|| drainage_alternatives(DRAINAGE_LOCATIONS_PANCREATITIS));

fn is_biliary(ground_truth: &GroundTruth) -> bool {
    keyword_present_in_any(&ground_truth.primary_diagnosis, "biliary")
}

impl Guideline for Pancreatitis {
    fn pathology(&self) -> Pathology {
        Pathology::Pancreatitis
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
            (Procedure::Support, true),
            (Procedure::Drainage, false),
            (Procedure::Ercp, false),
            (Procedure::Cholecystectomy, false),
        ]
    }

    fn score_imaging(
        &self,
        region: &str,
        modality: &str,
        ground_truth: &GroundTruth,
    ) -> ImagingGrade {
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
            // Adds to the current score instead of first-correct-wins.
            "eus" if is_biliary(ground_truth) => ImagingGrade::Cumulative {
                points: 1,
                explanation: "CORRECT: EUS was ordered for biliary pancreatitis".to_string(),
            },
            "eus" => ImagingGrade::Accepted,
            // Other modalities leave the explanation untouched.
            _ => ImagingGrade::Rejected { explanation: None },
        }
    }

    fn score_treatment(&self, ctx: &TreatmentContext<'_>, assessment: &mut TreatmentAssessment) {
        if ctx.requested("fluid")
            && (ctx.requested("analgesi") || ctx.requested("pain"))
            && ctx.requested("monitor")
        {
            assessment.requested.mark(Procedure::Support);
        }

        if ctx.coded(&[
            DRAINAGE_PROCEDURES_PANCREATITIS_ICD10,
            DRAINAGE_PROCEDURES_ALL_ICD10,
            DRAINAGE_PROCEDURES_ICD9,
        ]) || (ctx.performed(DRAINAGE_PROCEDURES_KEYWORDS)
            && ctx.performed(DRAINAGE_LOCATIONS_PANCREATITIS))
        {
            assessment.required.mark(Procedure::Drainage);
        }

        if ctx.requested_procedure(&[], &DRAINAGE_ALTERNATIVES) {
            assessment.requested.mark(Procedure::Drainage);
        }

        if ctx.diagnosis_mentions("biliary") {
            assessment.required.mark(Procedure::Cholecystectomy);
            if ctx.requested_procedure(
                CHOLECYSTECTOMY_PROCEDURES_KEYWORDS,
                ALTERNATE_CHOLECYSTECTOMY_KEYWORDS,
            ) {
                assessment.requested.mark(Procedure::Cholecystectomy);
            }
        }

        if ctx.coded(&[ERCP_PROCEDURES_ICD10, ERCP_PROCEDURES_ICD9])
            || ctx.performed(ERCP_PROCEDURES_KEYWORDS)
        {
            assessment.required.mark(Procedure::Ercp);
        }

        if ctx.requested_procedure(ERCP_PROCEDURES_KEYWORDS, &[]) {
            assessment.requested.mark(Procedure::Ercp);
        }
    }
}
