use thiserror::Error;

pub type SeqFlowResult<T> = Result<T, SeqFlowError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeqFlowError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("empty sequence: {0}")]
    EmptySequence(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("pull limit of {limit} exceeded")]
    PullLimitExceeded { limit: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SeqFlowError {
    pub fn empty(op: &str) -> Self {
        SeqFlowError::EmptySequence(format!("{op} requires at least one element"))
    }

    pub fn not_found(op: &str) -> Self {
        SeqFlowError::NotFound(format!("{op} matched no element"))
    }
}
