//! Motion primitives for scroll-triggered reveal animations.
//!
//! This crate is pure data: it knows what a reveal looks like, not when it
//! runs.
//!
//! - **Easing**: CSS-compatible timing curves plus the named presets
//! - **Styles**: the numeric properties a reveal animates (opacity, offset, scale, clip)
//! - **Timing**: per-leg timing and the preset table grouped by duration class
//! - **Catalog**: named variants (`fadeInUp`, `heroEntrance`, ...) and custom
//!   directional synthesis
//!
//! # Architecture
//!
//! ```text
//! TimingPresets ──→ VariantCatalog::new ──→ name → MotionDescriptor
//!                                    └──→ Variant::Custom → synthesized MotionDescriptor
//! ```

pub mod catalog;
pub mod descriptor;
pub mod easing;
pub mod error;
pub mod style;
pub mod timing;
pub mod variant;

pub use catalog::{DEFAULT_VARIANT, FADE_DISTANCE_PX, SLIDE_DISTANCE_PX, VariantCatalog};
pub use descriptor::MotionDescriptor;
pub use easing::{EasingFunction, StepPosition};
pub use error::{MotionError, MotionResult};
pub use style::{ClipInset, StyleDelta};
pub use timing::{StaggerTiming, Timing, TimingClass, TimingPresets};
pub use variant::{Direction, Variant};
