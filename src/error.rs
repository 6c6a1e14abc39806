use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{equation::EvaluationError, render::RenderError};

/// Why a request produced no analysis.
///
/// A constant or all-NaN function is not an error; it is reported as
/// [`Category::ConstantOrInvalid`](crate::Category::ConstantOrInvalid).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Function string is empty.")]
    EmptyInput,

    #[error("Error evaluating function: {0}")]
    Evaluation(#[from] EvaluationError),

    #[error("Invalid request payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("Error rendering plot: {0}")]
    Render(#[from] RenderError),
}

/// The `errorKind` reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    EmptyInput,
    EvaluationError,
    InvalidPayload,
    RenderError,
    /// The response itself could not be encoded.
    Internal,
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::EmptyInput => ErrorKind::EmptyInput,
            AnalysisError::Evaluation(_) => ErrorKind::EvaluationError,
            AnalysisError::InvalidPayload(_) => ErrorKind::InvalidPayload,
            AnalysisError::Render(_) => ErrorKind::RenderError,
        }
    }

    /// HTTP status code: client mistakes are 400, rendering failures 500.
    pub fn status(&self) -> u16 {
        match self {
            AnalysisError::EmptyInput
            | AnalysisError::Evaluation(_)
            | AnalysisError::InvalidPayload(_) => 400,
            AnalysisError::Render(_) => 500,
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
