//! Per-element reveal state machine.
//!
//! ```text
//!            visible                 tween finished
//!   Idle ───────────────→ Entering ─────────────────→ Settled   (terminal when trigger_once)
//!    ▲                                                   │
//!    │ tween finished                        invisible   │ (!trigger_once)
//!    └───────────────────── Exiting ←────────────────────┘
//! ```
//!
//! Visibility changes that arrive mid-tween are only recorded; the stage acts
//! on them once the tween finishes, so no phase is ever skipped and an
//! element never runs two tweens at once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Entering,
    Settled,
    Exiting,
}

impl Phase {
    /// Whether `self → next` is an edge of the state machine.
    ///
    /// Any phase may return to `Idle` through an explicit reset.
    pub fn can_transition_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Idle, Phase::Entering)
                | (Phase::Entering, Phase::Settled)
                | (Phase::Settled, Phase::Exiting)
                | (Phase::Exiting, Phase::Idle)
        )
    }

    /// A tween is in flight.
    pub fn is_transitioning(self) -> bool {
        matches!(self, Phase::Entering | Phase::Exiting)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Phase::Idle => "idle",
            Phase::Entering => "entering",
            Phase::Settled => "settled",
            Phase::Exiting => "exiting",
        })
    }
}

/// Runtime state owned by one element binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementAnimationState {
    pub phase: Phase,
    /// Most recent visibility reported for the element.
    pub last_visibility: bool,
}

impl ElementAnimationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move along a state machine edge. Returns the previous phase, or
    /// `None` (leaving the state untouched) if the edge does not exist.
    pub fn advance(&mut self, next: Phase) -> Option<Phase> {
        if !self.phase.can_transition_to(next) {
            return None;
        }
        let previous = self.phase;
        self.phase = next;
        Some(previous)
    }

    /// Explicit reset back to `Idle`, from any phase.
    pub fn reset(&mut self) -> Phase {
        let previous = self.phase;
        self.phase = Phase::Idle;
        self.last_visibility = false;
        previous
    }
}
