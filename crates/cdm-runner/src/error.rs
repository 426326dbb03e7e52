use std::path::PathBuf;

use thiserror::Error;

use cdm_core::CoreError;
use cdm_evaluators::EvalError;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid JSON in {} at line {line}: {source}", .path.display())]
    InvalidLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("no config directory found")]
    NoConfigDir,

    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("hadm_id {hadm_id}: expected {expected} output")]
    ModeMismatch { hadm_id: i64, expected: &'static str },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl RunnerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RunnerError::Io {
            path: path.into(),
            source,
        }
    }
}
