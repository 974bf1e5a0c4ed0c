pub type MotionResult<T> = Result<T, MotionError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    #[error("unknown variant: {0}")]
    UnknownVariant(String),

    #[error("invalid timing: {0}")]
    InvalidTiming(String),

    #[error("invalid variant: {0}")]
    InvalidVariant(String),
}

impl MotionError {
    pub fn unknown_variant(name: impl Into<String>) -> Self {
        Self::UnknownVariant(name.into())
    }

    pub fn invalid_timing(msg: impl Into<String>) -> Self {
        Self::InvalidTiming(msg.into())
    }

    pub fn invalid_variant(msg: impl Into<String>) -> Self {
        Self::InvalidVariant(msg.into())
    }
}
