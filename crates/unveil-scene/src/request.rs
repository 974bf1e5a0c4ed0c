//! Per-element animation configuration.
//!
//! A request is fixed for the lifetime of a mount. To change anything,
//! mount a new request on the same element; the stage replaces the whole
//! binding.

use serde::{Deserialize, Serialize};
use unveil_motion::{StaggerTiming, Variant};

use crate::error::{SceneError, SceneResult};
use crate::visibility::RootMargin;

fn default_threshold() -> f32 {
    0.1
}

fn default_trigger_once() -> bool {
    true
}

/// Stagger settings of a group parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaggerSpec {
    /// Delay between consecutive children.
    pub stagger_delay_ms: f32,
    /// Delay before the first child.
    #[serde(default)]
    pub group_delay_ms: f32,
}

impl From<StaggerTiming> for StaggerSpec {
    fn from(timing: StaggerTiming) -> Self {
        Self {
            stagger_delay_ms: timing.stagger_delay_ms,
            group_delay_ms: timing.group_delay_ms,
        }
    }
}

impl From<StaggerSpec> for StaggerTiming {
    fn from(spec: StaggerSpec) -> Self {
        StaggerTiming::new(spec.stagger_delay_ms, spec.group_delay_ms)
    }
}

/// How one element should reveal.
///
/// # Example JSON
///
/// ```json
/// {
///   "variant": "fadeInUp",
///   "delay_ms": 150,
///   "threshold": 0.2,
///   "root_margin": "-50px",
///   "trigger_once": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub variant: Variant,

    /// Replaces the catalog delay when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<f32>,

    /// Replaces the catalog duration when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f32>,

    /// Fraction of the element that must be visible, `[0, 1]`.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    #[serde(default)]
    pub root_margin: RootMargin,

    /// Animate only the first entrance.
    #[serde(default = "default_trigger_once")]
    pub trigger_once: bool,

    /// Present on group parents; children are offset by it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<StaggerSpec>,
}

impl AnimationRequest {
    pub fn new(variant: impl Into<Variant>) -> Self {
        Self {
            variant: variant.into(),
            delay_ms: None,
            duration_ms: None,
            threshold: default_threshold(),
            root_margin: RootMargin::default(),
            trigger_once: default_trigger_once(),
            stagger: None,
        }
    }

    pub fn named(name: &str) -> Self {
        Self::new(Variant::named(name))
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = Some(delay_ms);
        self
    }

    pub fn with_duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    pub fn trigger_once(mut self, once: bool) -> Self {
        self.trigger_once = once;
        self
    }

    pub fn with_stagger(mut self, stagger_delay_ms: f32, group_delay_ms: f32) -> Self {
        self.stagger = Some(StaggerSpec {
            stagger_delay_ms,
            group_delay_ms,
        });
        self
    }

    pub fn is_staggered(&self) -> bool {
        self.stagger.is_some()
    }

    pub fn validate(&self) -> SceneResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SceneError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

impl From<Variant> for AnimationRequest {
    fn from(variant: Variant) -> Self {
        Self::new(variant)
    }
}
