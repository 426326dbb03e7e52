use thiserror::Error;

use crate::evaluator::Stage;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no evaluator for pathology: {0}")]
    UnknownPathology(String),

    #[error("malformed '{tool}' call at position {index}: {reason}")]
    MalformedToolCall {
        tool: String,
        index: usize,
        reason: String,
    },

    #[error("'{operation}' is not allowed once the evaluation is {stage:?}")]
    OutOfOrder {
        stage: Stage,
        operation: &'static str,
    },
}
