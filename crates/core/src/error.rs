use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No matching destinations found for this input.")]
    NoMatchingDestinations,

    #[error("invalid planner config: {0}")]
    Config(String),
}

impl PlanError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type PlanResult<T> = Result<T, PlanError>;
