//! Scroll-triggered reveal orchestration.
//!
//! Elements are mounted on a [`Stage`] with an [`AnimationRequest`]. The stage
//! observes them through a [`VisibilityDetector`], runs the reveal state
//! machine for each one and drives a [`MotionEngine`] that interpolates
//! their styles.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use unveil_motion::{TimingPresets, VariantCatalog};
//! use unveil_scene::{AnimationRequest, Phase, Rect, Stage, Viewport};
//!
//! let catalog = Arc::new(VariantCatalog::new(&TimingPresets::default()));
//! let mut stage = Stage::new(catalog);
//! stage.mount("hero", AnimationRequest::named("heroEntrance")).unwrap();
//!
//! let mut viewport = Viewport::new(1280.0, 800.0);
//! viewport.insert("hero", Rect::new(0.0, 100.0, 1280.0, 400.0));
//!
//! for _ in 0..120 {
//!     stage.tick(16.0, &viewport);
//! }
//! assert_eq!(stage.phase("hero"), Some(Phase::Settled));
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod request;
pub mod stage;
pub mod stagger;
pub mod state;
pub mod visibility;
pub mod wrappers;

pub use engine::{ActiveTween, MotionEngine, TweenEvent, TweenId, TweenState};
pub use error::{SceneError, SceneResult};
pub use events::{Diagnostic, EventQueue, PhaseEvent};
pub use request::{AnimationRequest, StaggerSpec};
pub use stage::Stage;
pub use stagger::StaggerGroup;
pub use state::{ElementAnimationState, Phase};
pub use visibility::{
    IntersectionSource, MarginLength, Observation, ObservationId, Rect, RootMargin,
    Viewport, VisibilityChange, VisibilityDetector, is_visible,
};
pub use wrappers::Wrapper;
