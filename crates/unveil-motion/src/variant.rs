//! How a caller names the motion it wants: a catalog entry or a synthesized
//! directional reveal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::descriptor::MotionDescriptor;
use crate::style::StyleDelta;
use crate::timing::Timing;

/// Direction of motion for synthesized reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Offset (x, y) the element starts from so that it travels `distance`
    /// px in this direction to reach its resting place.
    pub fn start_offset(self, distance: f32) -> (f32, f32) {
        match self {
            Self::Up => (0.0, distance),
            Self::Down => (0.0, -distance),
            Self::Left => (distance, 0.0),
            Self::Right => (-distance, 0.0),
        }
    }

    fn offset_style(self, distance: f32) -> StyleDelta {
        let (x, y) = self.start_offset(distance);
        match self {
            Self::Left | Self::Right => StyleDelta::new().x(x),
            Self::Up | Self::Down => StyleDelta::new().y(y),
        }
    }

    /// Opacity plus a directional offset of `distance` px.
    ///
    /// The exit leg keeps travelling the same way, so it mirrors the start
    /// offset.
    pub fn fade_descriptor(self, distance: f32, timing: Timing) -> MotionDescriptor {
        let start = self.offset_style(distance);
        let rest = self.offset_style(0.0);
        let leave = self.offset_style(-distance);
        MotionDescriptor::new(
            StyleDelta { opacity: Some(0.0), ..start },
            StyleDelta { opacity: Some(1.0), ..rest },
            StyleDelta { opacity: Some(0.0), ..leave },
            timing,
        )
    }

    /// Pure offset slide, no opacity change.
    pub fn slide_descriptor(self, distance: f32, timing: Timing) -> MotionDescriptor {
        MotionDescriptor::new(
            self.offset_style(distance),
            self.offset_style(0.0),
            self.offset_style(-distance),
            timing,
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

fn default_distance() -> f32 {
    30.0
}

/// Requested motion.
///
/// Serialised untagged so page files can write either `"fadeInUp"` or
/// `{"direction": "left", "distance_px": 50}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variant {
    Named(String),
    Custom {
        direction: Direction,
        #[serde(default = "default_distance")]
        distance_px: f32,
    },
}

impl Variant {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn custom(direction: Direction, distance_px: f32) -> Self {
        Self::Custom {
            direction,
            distance_px,
        }
    }
}

impl From<&str> for Variant {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Custom {
                direction,
                distance_px,
            } => write!(f, "custom({direction}, {distance_px}px)"),
        }
    }
}
