//! cdm-core
//!
//! Pure domain types for the clinical decision-making benchmark: cases,
//! ground truth, recorded model runs and per-case evaluation records.
//! No scoring logic lives here; this is the shared vocabulary of the
//! evaluator and the runner.

pub mod error;
pub mod models;

pub use error::CoreError;
pub use models::pathology::Pathology;
