use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// MIMIC lab item identifier.
pub type LabTestId = u32;

/// Treatments tracked in the requested/required maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Procedure {
    Appendectomy,
    Cholecystectomy,
    Colonoscopy,
    Colectomy,
    Drainage,
    #[serde(rename = "ERCP")]
    Ercp,
    Antibiotics,
    Support,
}

impl Procedure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Procedure::Appendectomy => "Appendectomy",
            Procedure::Cholecystectomy => "Cholecystectomy",
            Procedure::Colonoscopy => "Colonoscopy",
            Procedure::Colectomy => "Colectomy",
            Procedure::Drainage => "Drainage",
            Procedure::Ercp => "ERCP",
            Procedure::Antibiotics => "Antibiotics",
            Procedure::Support => "Support",
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Treatment name to flag map with a key set fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreatmentFlags(BTreeMap<Procedure, bool>);

impl TreatmentFlags {
    pub fn new(entries: impl IntoIterator<Item = (Procedure, bool)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Same keys as `self`, all unset.
    pub fn cleared(&self) -> Self {
        Self(self.0.keys().map(|p| (*p, false)).collect())
    }

    /// Set an existing flag. Returns false (and changes nothing) when the
    /// procedure is not tracked for this pathology.
    pub fn mark(&mut self, procedure: Procedure) -> bool {
        match self.0.get_mut(&procedure) {
            Some(flag) => {
                *flag = true;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, procedure: Procedure) -> Option<bool> {
        self.0.get(&procedure).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = Procedure> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Procedure, bool)> + '_ {
        self.0.iter().map(|(p, f)| (*p, *f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One imaging request, case-folded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ImagingOrder {
    pub region: String,
    pub modality: String,
}

/// What the model asked for, bucketed by the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseAnswers {
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
    #[serde(rename = "Treatment")]
    pub treatment: Vec<String>,
    #[serde(rename = "Correct Laboratory Tests")]
    pub correct_laboratory_tests: BTreeMap<String, Vec<LabTestId>>,
    #[serde(rename = "Unnecessary Laboratory Tests")]
    pub unnecessary_laboratory_tests: Vec<LabTestId>,
    #[serde(rename = "Correct Imaging")]
    pub correct_imaging: Vec<ImagingOrder>,
    #[serde(rename = "Unnecessary Imaging")]
    pub unnecessary_imaging: Vec<ImagingOrder>,
    #[serde(rename = "Treatment Requested")]
    #[ts(type = "Record<string, boolean>")]
    pub treatment_requested: TreatmentFlags,
    #[serde(rename = "Treatment Required")]
    #[ts(type = "Record<string, boolean>")]
    pub treatment_required: TreatmentFlags,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseScores {
    #[serde(rename = "Late Physical Examination")]
    pub late_physical_examination: u32,
    #[serde(rename = "Physical Examination")]
    pub physical_examination: u32,
    #[serde(rename = "Laboratory Tests")]
    pub laboratory_tests: u32,
    #[serde(rename = "Imaging")]
    pub imaging: u32,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: u32,
    #[serde(rename = "Gracious Diagnosis")]
    pub gracious_diagnosis: u32,
}

impl CaseScores {
    pub fn diagnosis_scores(&self) -> DiagnosisScores {
        DiagnosisScores {
            diagnosis: self.diagnosis,
            gracious_diagnosis: self.gracious_diagnosis,
        }
    }
}

/// Scores produced in full-information mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiagnosisScores {
    #[serde(rename = "Diagnosis")]
    pub diagnosis: u32,
    #[serde(rename = "Gracious Diagnosis")]
    pub gracious_diagnosis: u32,
}

/// Free-text rationale for audit; never used for scoring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CaseExplanations {
    #[serde(rename = "Imaging")]
    pub imaging: String,
    #[serde(rename = "Physical")]
    pub physical: String,
    #[serde(rename = "Diagnosis")]
    pub diagnosis: String,
}
