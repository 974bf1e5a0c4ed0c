use serde::{Deserialize, Serialize};

use crate::style::StyleDelta;
use crate::timing::{StaggerTiming, Timing};

/// Start, end and exit states of a reveal plus its timing.
///
/// Descriptors are immutable once built; the catalog hands out shared
/// references and callers clone when they need to apply overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionDescriptor {
    pub initial: StyleDelta,
    pub animate: StyleDelta,
    pub exit: StyleDelta,
    pub timing: Timing,
    /// Child spacing when the descriptor belongs to a stagger container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<StaggerTiming>,
}

impl MotionDescriptor {
    pub fn new(initial: StyleDelta, animate: StyleDelta, exit: StyleDelta, timing: Timing) -> Self {
        Self {
            initial,
            animate,
            exit,
            timing,
            stagger: None,
        }
    }

    pub fn with_stagger(mut self, stagger: StaggerTiming) -> Self {
        self.stagger = Some(stagger);
        self
    }

    /// Whether entering changes anything visible.
    pub fn is_visual(&self) -> bool {
        self.initial.differs_from(&self.animate)
    }

    /// Copy with the caller's delay/duration overrides applied.
    pub fn with_overrides(&self, delay_ms: Option<f32>, duration_ms: Option<f32>) -> Self {
        Self {
            timing: self.timing.with_overrides(delay_ms, duration_ms),
            ..self.clone()
        }
    }
}
