//! Style deltas: the numeric visual properties a reveal animates.
//!
//! A [`StyleDelta`] only names the properties it cares about. Interpolating
//! between two deltas treats a missing property as its identity value, so
//! `{opacity: 0}` → `{}` fades to fully opaque.

use serde::{Deserialize, Serialize};

/// Identity opacity (fully opaque).
pub const IDENTITY_OPACITY: f32 = 1.0;
/// Identity scale ratio.
pub const IDENTITY_SCALE: f32 = 1.0;

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// CSS `inset()` clip rectangle, each edge in percent of the element box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClipInset {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl ClipInset {
    /// No clipping.
    pub const NONE: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            top: lerp(self.top, to.top, t),
            right: lerp(self.right, to.right, t),
            bottom: lerp(self.bottom, to.bottom, t),
            left: lerp(self.left, to.left, t),
        }
    }
}

impl std::fmt::Display for ClipInset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "inset({}% {}% {}% {}%)",
            self.top, self.right, self.bottom, self.left
        )
    }
}

/// A set of animated style targets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Horizontal translation in px.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Vertical translation in px.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipInset>,
}

impl StyleDelta {
    /// An empty delta (identity).
    pub const fn new() -> Self {
        Self {
            opacity: None,
            x: None,
            y: None,
            scale: None,
            clip: None,
        }
    }

    pub const fn opacity(mut self, value: f32) -> Self {
        self.opacity = Some(value);
        self
    }

    pub const fn x(mut self, value: f32) -> Self {
        self.x = Some(value);
        self
    }

    pub const fn y(mut self, value: f32) -> Self {
        self.y = Some(value);
        self
    }

    pub const fn scale(mut self, value: f32) -> Self {
        self.scale = Some(value);
        self
    }

    pub const fn clip(mut self, value: ClipInset) -> Self {
        self.clip = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.opacity.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.scale.is_none()
            && self.clip.is_none()
    }

    /// True when at least one property resolves to a different value.
    ///
    /// Missing properties compare as their identity value.
    pub fn differs_from(&self, other: &Self) -> bool {
        self.resolved() != other.resolved()
    }

    /// Every property filled in, identity values where absent.
    pub fn resolved(&self) -> Self {
        Self {
            opacity: Some(self.opacity.unwrap_or(IDENTITY_OPACITY)),
            x: Some(self.x.unwrap_or(0.0)),
            y: Some(self.y.unwrap_or(0.0)),
            scale: Some(self.scale.unwrap_or(IDENTITY_SCALE)),
            clip: Some(self.clip.unwrap_or(ClipInset::NONE)),
        }
    }

    /// Interpolate towards `to` at eased progress `t`.
    ///
    /// Properties named by either side are present in the result.
    pub fn interpolate(&self, to: &Self, t: f32) -> Self {
        fn channel(from: Option<f32>, to: Option<f32>, identity: f32, t: f32) -> Option<f32> {
            match (from, to) {
                (None, None) => None,
                (from, to) => Some(lerp(
                    from.unwrap_or(identity),
                    to.unwrap_or(identity),
                    t,
                )),
            }
        }

        Self {
            opacity: channel(self.opacity, to.opacity, IDENTITY_OPACITY, t),
            x: channel(self.x, to.x, 0.0, t),
            y: channel(self.y, to.y, 0.0, t),
            scale: channel(self.scale, to.scale, IDENTITY_SCALE, t),
            clip: match (self.clip, to.clip) {
                (None, None) => None,
                (from, to) => Some(
                    from.unwrap_or(ClipInset::NONE)
                        .interpolate(&to.unwrap_or(ClipInset::NONE), t),
                ),
            },
        }
    }

    /// Opacity must stay within `[0, 1]` and scale must be non-negative.
    pub fn is_valid(&self) -> bool {
        let finite = |v: Option<f32>| v.is_none_or(f32::is_finite);
        self.opacity.is_none_or(|o| (0.0..=1.0).contains(&o))
            && self.scale.is_none_or(|s| s >= 0.0)
            && finite(self.x)
            && finite(self.y)
    }
}
