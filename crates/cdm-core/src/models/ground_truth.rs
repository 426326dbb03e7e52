use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A treatment or procedure performed during the admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Treatment {
    pub title: String,
    #[serde(default)]
    pub icd_code: Option<String>,
    /// True when the entry came from a structured ICD9/ICD10 procedure code
    /// rather than free text.
    #[serde(default)]
    pub is_coded: bool,
}

impl Treatment {
    pub fn free_text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icd_code: None,
            is_coded: false,
        }
    }

    pub fn coded(title: impl Into<String>, icd_code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icd_code: Some(icd_code.into()),
            is_coded: true,
        }
    }
}

/// The clinically verified reference a case is scored against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GroundTruth {
    #[serde(default)]
    pub primary_diagnosis: Vec<String>,
    #[serde(default)]
    pub treatments: Vec<Treatment>,
}

impl GroundTruth {
    /// Titles of all ground-truth treatments, in record order.
    pub fn treatment_titles(&self) -> Vec<&str> {
        self.treatments.iter().map(|t| t.title.as_str()).collect()
    }
}
