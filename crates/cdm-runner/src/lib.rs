//! cdm-runner
//!
//! Batch scoring of recorded model runs: loads a benchmark dataset and a
//! JSONL file of runs, evaluates each case, writes per-case results and
//! reports corpus-level accuracy and per-pathology score averages.

pub mod config;
pub mod dataset;
pub mod error;
pub mod report;
pub mod results;
pub mod run;

pub use config::{RunMode, RunnerConfig};
pub use error::RunnerError;
pub use run::{RunSummary, ScoreOptions, score_runs};
