//! Tween engine: the style/animation primitive the stage drives.
//!
//! The engine interpolates an element's [`StyleDelta`] over time. Each
//! element has at most one tween in flight; starting a new one cancels the
//! previous tween and continues from wherever the element currently is.
//!
//! ```text
//! MotionEngine
//!   ├── tweens:  element → ActiveTween (from, to, timing, elapsed)
//!   ├── resting: element → last settled style
//!   └── events:  Started / Finished / Cancelled, in the order they happened
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use unveil_motion::{StyleDelta, Timing};

/// Unique identifier for a tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub u64);

impl TweenId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TweenId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TweenState {
    /// Waiting out its delay.
    Pending,
    Running,
    Finished,
    Cancelled,
}

/// An in-flight interpolation for one element.
#[derive(Debug, Clone)]
pub struct ActiveTween {
    pub id: TweenId,
    pub element_id: String,
    pub from: StyleDelta,
    pub to: StyleDelta,
    pub timing: Timing,
    pub elapsed_ms: f32,
    pub state: TweenState,
}

impl ActiveTween {
    pub fn new(element_id: String, from: StyleDelta, to: StyleDelta, timing: Timing) -> Self {
        Self {
            id: TweenId::new(),
            element_id,
            from,
            to,
            timing,
            elapsed_ms: 0.0,
            state: if timing.delay_ms > 0.0 {
                TweenState::Pending
            } else {
                TweenState::Running
            },
        }
    }

    /// Linear progress through the active (post-delay) part, `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let active = (self.elapsed_ms - self.timing.delay_ms).max(0.0);
        if self.timing.duration_ms > 0.0 {
            (active / self.timing.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn current_style(&self) -> StyleDelta {
        match self.state {
            TweenState::Pending => self.from,
            TweenState::Finished => self.to,
            TweenState::Running | TweenState::Cancelled => {
                let eased = self.timing.easing.evaluate(self.progress());
                self.from.interpolate(&self.to, eased)
            }
        }
    }

    /// Advance by `delta_ms`. Returns `true` while the tween is still active.
    ///
    /// The delay and the duration are checked in the same step, so a tween
    /// finishes on the first update at or past `delay + duration`.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.timing.delay_ms {
            self.state = TweenState::Running;
        }
        if self.state == TweenState::Running && self.elapsed_ms >= self.timing.total_ms() {
            self.state = TweenState::Finished;
        }
        self.is_active()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, TweenState::Pending | TweenState::Running)
    }
}

/// Tween lifecycle notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TweenEvent {
    Started { tween_id: TweenId, element_id: String },
    Finished { tween_id: TweenId, element_id: String },
    /// Replaced by a newer tween or stopped explicitly.
    Cancelled { tween_id: TweenId, element_id: String },
}

impl TweenEvent {
    pub fn element_id(&self) -> &str {
        match self {
            Self::Started { element_id, .. }
            | Self::Finished { element_id, .. }
            | Self::Cancelled { element_id, .. } => element_id,
        }
    }

    pub fn tween_id(&self) -> TweenId {
        match self {
            Self::Started { tween_id, .. }
            | Self::Finished { tween_id, .. }
            | Self::Cancelled { tween_id, .. } => *tween_id,
        }
    }
}

#[derive(Debug, Default)]
pub struct MotionEngine {
    tweens: BTreeMap<String, ActiveTween>,
    resting: BTreeMap<String, StyleDelta>,
    events: VecDeque<TweenEvent>,
}

impl MotionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `element_id` from its current style to `to`.
    pub fn animate(&mut self, element_id: &str, to: StyleDelta, timing: Timing) -> TweenId {
        let from = self.current_style(element_id).unwrap_or_default();
        self.cancel(element_id);

        let tween = ActiveTween::new(element_id.to_string(), from, to, timing);
        let id = tween.id;
        self.events.push_back(TweenEvent::Started {
            tween_id: id,
            element_id: element_id.to_string(),
        });
        self.tweens.insert(element_id.to_string(), tween);
        id
    }

    /// Jump to `style` immediately, cancelling any tween.
    pub fn set_style(&mut self, element_id: &str, style: StyleDelta) {
        self.cancel(element_id);
        self.resting.insert(element_id.to_string(), style);
    }

    pub fn current_style(&self, element_id: &str) -> Option<StyleDelta> {
        self.tweens
            .get(element_id)
            .map(ActiveTween::current_style)
            .or_else(|| self.resting.get(element_id).copied())
    }

    /// Stop the element's tween where it is.
    pub fn cancel(&mut self, element_id: &str) -> Option<TweenId> {
        let mut tween = self.tweens.remove(element_id)?;
        tween.state = TweenState::Cancelled;
        self.resting
            .insert(element_id.to_string(), tween.current_style());
        self.events.push_back(TweenEvent::Cancelled {
            tween_id: tween.id,
            element_id: tween.element_id,
        });
        Some(tween.id)
    }

    /// Forget the element entirely. Queued events for it are discarded and
    /// nothing further is emitted.
    pub fn remove(&mut self, element_id: &str) {
        self.tweens.remove(element_id);
        self.resting.remove(element_id);
        self.events.retain(|e| e.element_id() != element_id);
    }

    /// Advance every tween by `delta_ms`.
    pub fn update(&mut self, delta_ms: f32) {
        if self.tweens.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        for (element_id, tween) in self.tweens.iter_mut() {
            if !tween.update(delta_ms) {
                finished.push(element_id.clone());
            }
        }

        for element_id in finished {
            if let Some(tween) = self.tweens.remove(&element_id) {
                self.resting.insert(element_id.clone(), tween.to);
                self.events.push_back(TweenEvent::Finished {
                    tween_id: tween.id,
                    element_id,
                });
            }
        }
    }

    pub fn tween(&self, element_id: &str) -> Option<&ActiveTween> {
        self.tweens.get(element_id)
    }

    pub fn is_animating(&self, element_id: &str) -> bool {
        self.tweens.contains_key(element_id)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn drain_events(&mut self) -> Vec<TweenEvent> {
        self.events.drain(..).collect()
    }
}
