//! Per-pathology score averages over a results file.
//!
//! Works on raw JSON so agent and full-information results, and result
//! files written by older versions, can be reported alike: every numeric
//! entry under `scores` is averaged, plus the lengths of the unnecessary
//! lab and imaging lists under `answers`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use cdm_core::Pathology;

use crate::error::RunnerError;
use crate::results::read_results;

/// Answer lists whose length is reported as a score.
const COUNTED_ANSWERS: [&str; 2] = ["Unnecessary Laboratory Tests", "Unnecessary Imaging"];

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreReport {
    /// field -> pathology -> mean value.
    pub averages: BTreeMap<String, BTreeMap<Pathology, f64>>,
    /// field -> pathology -> number of records contributing.
    pub counts: BTreeMap<String, BTreeMap<Pathology, usize>>,
}

impl ScoreReport {
    pub fn average(&self, field: &str, pathology: Pathology) -> Option<f64> {
        self.averages.get(field)?.get(&pathology).copied()
    }

    pub fn count(&self, field: &str, pathology: Pathology) -> usize {
        self.counts
            .get(field)
            .and_then(|c| c.get(&pathology))
            .copied()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}

#[derive(Default)]
struct Accumulator {
    sums: BTreeMap<String, BTreeMap<Pathology, (f64, usize)>>,
}

impl Accumulator {
    fn add(&mut self, field: &str, pathology: Pathology, value: f64) {
        let (sum, n) = self
            .sums
            .entry(field.to_string())
            .or_default()
            .entry(pathology)
            .or_default();
        *sum += value;
        *n += 1;
    }

    fn finish(self) -> ScoreReport {
        let mut report = ScoreReport::default();
        for (field, per_pathology) in self.sums {
            for (pathology, (sum, n)) in per_pathology {
                report
                    .averages
                    .entry(field.clone())
                    .or_default()
                    .insert(pathology, sum / n as f64);
                report
                    .counts
                    .entry(field.clone())
                    .or_default()
                    .insert(pathology, n);
            }
        }
        report
    }
}

/// Average every score field per pathology. Records without a recognised
/// pathology are skipped.
pub fn score_report(records: &[Value]) -> ScoreReport {
    let mut acc = Accumulator::default();

    for record in records {
        let Some(pathology) = record
            .get("pathology")
            .and_then(Value::as_str)
            .and_then(|p| p.parse::<Pathology>().ok())
        else {
            tracing::warn!(hadm_id = ?record.get("hadm_id"), "result without pathology, skipped");
            continue;
        };

        if let Some(scores) = record.get("scores").and_then(Value::as_object) {
            for (field, value) in scores {
                if let Some(value) = value.as_f64() {
                    acc.add(field, pathology, value);
                }
            }
        }

        if let Some(answers) = record.get("answers").and_then(Value::as_object) {
            for field in COUNTED_ANSWERS {
                if let Some(list) = answers.get(field).and_then(Value::as_array) {
                    acc.add(field, pathology, list.len() as f64);
                }
            }
        }
    }

    acc.finish()
}

pub fn load_report(path: &Path) -> Result<ScoreReport, RunnerError> {
    let records: Vec<Value> = read_results(path)?;
    Ok(score_report(&records))
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<32}", "")?;
        for pathology in Pathology::ALL {
            write!(f, "{:>16}", pathology.as_str())?;
        }
        writeln!(f)?;

        for (field, per_pathology) in &self.averages {
            write!(f, "{field:<32}")?;
            for pathology in Pathology::ALL {
                match per_pathology.get(&pathology) {
                    Some(avg) => {
                        let n = self.count(field, pathology);
                        write!(f, "{:>16}", format!("{avg:.3} (n={n})"))?;
                    }
                    None => write!(f, "{:>16}", "-")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
