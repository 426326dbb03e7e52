//! Procedure and treatment matchers built on [`crate::keywords`].

use std::collections::BTreeSet;

use cdm_core::models::ground_truth::Treatment;

use crate::keywords::{keyword_present, keyword_present_in_any};

/// An alternate phrasing of a procedure or diagnosis: a location term that
/// must co-occur with at least one modifier, e.g. "appendix" + "removal"
/// standing in for "appendectomy".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AltKeywords {
    pub location: &'static str,
    pub modifiers: &'static [&'static str],
}

impl AltKeywords {
    pub const fn new(location: &'static str, modifiers: &'static [&'static str]) -> Self {
        Self {
            location,
            modifiers,
        }
    }

    /// The first modifier that is positive in `text` together with the
    /// location, if any.
    pub fn matching_modifier(&self, text: &str) -> Option<&'static str> {
        if !keyword_present(text, self.location) {
            return None;
        }
        self.modifiers
            .iter()
            .copied()
            .find(|m| keyword_present(text, m))
    }
}

/// True when any candidate procedure name is positive in any of `texts`.
pub fn procedure_checker<S: AsRef<str>>(candidates: &[&str], texts: &[S]) -> bool {
    candidates
        .iter()
        .any(|candidate| keyword_present_in_any(texts, candidate))
}

/// True when, within a single sentence of any of `texts`, some entry's
/// location and one of its modifiers are both positive.
///
/// Sentences are split on `.` so that a location in one sentence and a
/// modifier in the next do not combine.
pub fn alt_procedure_checker<S: AsRef<str>>(alternatives: &[AltKeywords], texts: &[S]) -> bool {
    texts
        .iter()
        .flat_map(|t| t.as_ref().split('.'))
        .any(|sentence| {
            alternatives
                .iter()
                .any(|alt| alt.matching_modifier(sentence).is_some())
        })
}

/// Canonical form of an ICD code for table lookups: trimmed, upper-case,
/// without dots ("47.01" and "4701" compare equal).
pub fn normalize_icd_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| *c != '.')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Normalised ICD codes of all coded ground-truth treatments.
pub fn procedure_icd_codes(treatments: &[Treatment]) -> BTreeSet<String> {
    treatments
        .iter()
        .filter_map(|t| t.icd_code.as_deref())
        .map(normalize_icd_code)
        .filter(|c| !c.is_empty())
        .collect()
}

/// True when any of `codes` appears in any of the given code tables.
pub fn any_code_in(codes: &BTreeSet<String>, tables: &[&[&str]]) -> bool {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .any(|code| codes.contains(*code))
}
