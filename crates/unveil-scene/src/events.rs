//! Stage notifications: phase transitions and recovery diagnostics.
//!
//! Phase events are queued and drained by the host after each tick.
//! Diagnostics are delivered immediately to an optional hook and logged at
//! `debug`; they never change what the stage does.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::engine::TweenId;
use crate::state::Phase;

/// An element moved from one phase to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEvent {
    pub element_id: String,
    pub from: Phase,
    pub to: Phase,
}

impl PhaseEvent {
    pub fn new(element_id: impl Into<String>, from: Phase, to: Phase) -> Self {
        Self {
            element_id: element_id.into(),
            from,
            to,
        }
    }
}

/// A recovery the stage performed silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The requested variant is not in the catalog; the default was used.
    UnknownVariant {
        element_id: String,
        requested: String,
        fallback: String,
    },
    /// A callback arrived for an element that is no longer mounted, or a
    /// completion for a tween the element has since replaced. It was
    /// dropped. `tween_id` is `None` for visibility callbacks.
    StaleElementReference {
        element_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tween_id: Option<TweenId>,
    },
}

impl Diagnostic {
    pub fn element_id(&self) -> &str {
        match self {
            Self::UnknownVariant { element_id, .. }
            | Self::StaleElementReference { element_id, .. } => element_id,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariant {
                element_id,
                requested,
                fallback,
            } => write!(
                f,
                "{element_id}: unknown variant {requested:?}, using {fallback}"
            ),
            Self::StaleElementReference {
                element_id,
                tween_id: Some(tween_id),
            } => write!(f, "{element_id}: dropped stale completion of tween {}", tween_id.0),
            Self::StaleElementReference {
                element_id,
                tween_id: None,
            } => write!(f, "{element_id}: dropped callback for unmounted element"),
        }
    }
}

/// Queue for phase events collected during ticks.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PhaseEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PhaseEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<PhaseEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PhaseEvent> + '_ {
        self.events.drain(..)
    }

    /// Drop everything queued for `element_id`.
    pub fn discard_element(&mut self, element_id: &str) {
        self.events.retain(|e| e.element_id != element_id);
    }

    pub fn events_for_element(&self, element_id: &str) -> Vec<&PhaseEvent> {
        self.events
            .iter()
            .filter(|e| e.element_id == element_id)
            .collect()
    }
}
