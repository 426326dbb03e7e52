use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The abdominal pathologies covered by the benchmark.
///
/// Declaration order is the canonical reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Pathology {
    Appendicitis,
    Cholecystitis,
    Diverticulitis,
    Pancreatitis,
}

impl Pathology {
    pub const ALL: [Pathology; 4] = [
        Pathology::Appendicitis,
        Pathology::Cholecystitis,
        Pathology::Diverticulitis,
        Pathology::Pancreatitis,
    ];

    /// Canonical lower-case disease name, as used for fuzzy diagnosis matching.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pathology::Appendicitis => "appendicitis",
            Pathology::Cholecystitis => "cholecystitis",
            Pathology::Diverticulitis => "diverticulitis",
            Pathology::Pancreatitis => "pancreatitis",
        }
    }
}

impl fmt::Display for Pathology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pathology {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Pathology::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownPathology(s.to_string()))
    }
}
