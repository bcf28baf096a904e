use rebac_types::CaveatContextError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("request caveat context should have less than {limit} bytes but had {size}")]
    CaveatContextTooLarge { limit: usize, size: usize },
    #[error("caveat context encoding failed: {0}")]
    ContextEncoding(#[from] CaveatContextError),
    #[error("bulk check planning was cancelled")]
    Cancelled,
}

/// How an API surface should report a planning failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The request payload is at fault; reported as a bad request.
    InvalidArgument,
    /// The caller went away before planning started.
    Cancelled,
    Internal,
}

impl StatusClass {
    pub fn http_status(self) -> u16 {
        match self {
            StatusClass::InvalidArgument => 400,
            StatusClass::Cancelled => 499,
            StatusClass::Internal => 500,
        }
    }
}

impl PlanError {
    pub fn status(&self) -> StatusClass {
        match self {
            PlanError::CaveatContextTooLarge { .. } => StatusClass::InvalidArgument,
            PlanError::Cancelled => StatusClass::Cancelled,
            PlanError::ContextEncoding(_) => StatusClass::Internal,
        }
    }
}
