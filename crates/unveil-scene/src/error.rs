use unveil_motion::MotionError;

pub type SceneResult<T> = Result<T, SceneError>;

/// Errors raised while building requests or addressing the stage.
///
/// Runtime recovery (unknown variants, stale callbacks) never produces an
/// error; see [`Diagnostic`](crate::events::Diagnostic).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("invalid root margin: {0:?}")]
    InvalidRootMargin(String),

    #[error("threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    #[error("element is not mounted: {0}")]
    UnknownElement(String),

    #[error("invalid stagger group: {0}")]
    InvalidGroup(String),

    #[error(transparent)]
    Motion(#[from] MotionError),
}
