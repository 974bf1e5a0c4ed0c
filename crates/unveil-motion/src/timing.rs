//! Timing descriptors and the preset table the catalog is built from.
//!
//! [`TimingPresets`] is the process-wide timing configuration: build it once
//! at startup (defaults or `unveil.toml`) and hand it to
//! [`VariantCatalog::new`](crate::catalog::VariantCatalog::new) by reference.

use serde::{Deserialize, Serialize};

use crate::easing::EasingFunction;
use crate::error::{MotionError, MotionResult};

/// Duration, delay and easing of one animation leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub duration_ms: f32,
    #[serde(default)]
    pub delay_ms: f32,
    #[serde(default)]
    pub easing: EasingFunction,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration_ms: 600.0,
            delay_ms: 0.0,
            easing: EasingFunction::SMOOTH,
        }
    }
}

impl Timing {
    pub fn new(duration_ms: f32, easing: EasingFunction) -> Self {
        Self {
            duration_ms,
            delay_ms: 0.0,
            easing,
        }
    }

    pub fn with_delay(mut self, delay_ms: f32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn with_duration(mut self, duration_ms: f32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Apply caller overrides; each provided value replaces only its own field.
    pub fn with_overrides(self, delay_ms: Option<f32>, duration_ms: Option<f32>) -> Self {
        Self {
            duration_ms: duration_ms.unwrap_or(self.duration_ms),
            delay_ms: delay_ms.unwrap_or(self.delay_ms),
            easing: self.easing,
        }
    }

    /// Delay plus duration.
    pub fn total_ms(&self) -> f32 {
        self.delay_ms + self.duration_ms
    }

    pub fn validate(&self) -> MotionResult<()> {
        if !(self.duration_ms.is_finite() && self.duration_ms >= 0.0) {
            return Err(MotionError::invalid_timing(format!(
                "duration must be a non-negative number of ms, got {}",
                self.duration_ms
            )));
        }
        if !(self.delay_ms.is_finite() && self.delay_ms >= 0.0) {
            return Err(MotionError::invalid_timing(format!(
                "delay must be a non-negative number of ms, got {}",
                self.delay_ms
            )));
        }
        if !self.easing.is_valid() {
            return Err(MotionError::invalid_timing(format!(
                "easing control points out of range: {:?}",
                self.easing
            )));
        }
        Ok(())
    }
}

/// Duration class a catalog entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingClass {
    Standard,
    Cinematic,
    Dramatic,
    Hero,
}

/// Spacing between consecutive children of a stagger group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaggerTiming {
    /// Delay between consecutive children.
    pub stagger_delay_ms: f32,
    /// Delay before the first child.
    pub group_delay_ms: f32,
}

impl Default for StaggerTiming {
    fn default() -> Self {
        Self {
            stagger_delay_ms: 100.0,
            group_delay_ms: 200.0,
        }
    }
}

impl StaggerTiming {
    pub fn new(stagger_delay_ms: f32, group_delay_ms: f32) -> Self {
        Self {
            stagger_delay_ms,
            group_delay_ms,
        }
    }

    /// Entrance delay of the child at `index`.
    pub fn child_delay(&self, index: usize) -> f32 {
        self.group_delay_ms + index as f32 * self.stagger_delay_ms
    }
}

/// Timing presets per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingPresets {
    pub standard: Timing,
    pub cinematic: Timing,
    pub dramatic: Timing,
    pub hero: Timing,
    pub stagger: StaggerTiming,
}

impl Default for TimingPresets {
    fn default() -> Self {
        Self {
            standard: Timing::new(600.0, EasingFunction::SMOOTH),
            cinematic: Timing::new(1000.0, EasingFunction::CINEMATIC),
            dramatic: Timing::new(1200.0, EasingFunction::DRAMATIC),
            hero: Timing::new(1500.0, EasingFunction::CINEMATIC),
            stagger: StaggerTiming::default(),
        }
    }
}

impl TimingPresets {
    pub fn get(&self, class: TimingClass) -> Timing {
        match class {
            TimingClass::Standard => self.standard,
            TimingClass::Cinematic => self.cinematic,
            TimingClass::Dramatic => self.dramatic,
            TimingClass::Hero => self.hero,
        }
    }

    pub fn validate(&self) -> MotionResult<()> {
        for (name, timing) in [
            ("standard", &self.standard),
            ("cinematic", &self.cinematic),
            ("dramatic", &self.dramatic),
            ("hero", &self.hero),
        ] {
            timing
                .validate()
                .map_err(|e| MotionError::invalid_timing(format!("{name}: {e}")))?;
        }
        let stagger = &self.stagger;
        let usable = |ms: f32| ms.is_finite() && ms >= 0.0;
        if !(usable(stagger.stagger_delay_ms) && usable(stagger.group_delay_ms)) {
            return Err(MotionError::invalid_timing(
                "stagger delays must be non-negative numbers of ms",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_only_provided_fields() {
        let base = Timing::new(600.0, EasingFunction::SMOOTH).with_delay(50.0);

        let delayed = base.with_overrides(Some(300.0), None);
        assert_eq!(delayed.delay_ms, 300.0);
        assert_eq!(delayed.duration_ms, 600.0);
        assert_eq!(delayed.easing, EasingFunction::SMOOTH);

        let longer = base.with_overrides(None, Some(900.0));
        assert_eq!(longer.delay_ms, 50.0);
        assert_eq!(longer.duration_ms, 900.0);

        assert_eq!(base.with_overrides(None, None), base);
    }

    #[test]
    fn hero_is_the_longest_class() {
        let presets = TimingPresets::default();
        let hero = presets.get(TimingClass::Hero).duration_ms;
        for class in [
            TimingClass::Standard,
            TimingClass::Cinematic,
            TimingClass::Dramatic,
        ] {
            assert!(presets.get(class).duration_ms < hero);
        }
    }

    #[test]
    fn stagger_child_delay_is_linear() {
        let stagger = StaggerTiming::new(100.0, 50.0);
        assert_eq!(stagger.child_delay(0), 50.0);
        assert_eq!(stagger.child_delay(3), 350.0);
    }

    #[test]
    fn negative_values_fail_validation() {
        assert!(Timing::new(-1.0, EasingFunction::Linear).validate().is_err());
        assert!(
            Timing::new(100.0, EasingFunction::Linear)
                .with_delay(-5.0)
                .validate()
                .is_err()
        );

        let mut presets = TimingPresets::default();
        assert!(presets.validate().is_ok());
        presets.dramatic.duration_ms = f32::NAN;
        let err = presets.validate().unwrap_err();
        assert!(err.to_string().contains("dramatic"));
    }

    #[test]
    fn unbounded_stagger_fails_validation() {
        let mut presets = TimingPresets::default();
        presets.stagger.stagger_delay_ms = f32::INFINITY;
        assert!(presets.validate().is_err());

        let mut presets = TimingPresets::default();
        presets.stagger.group_delay_ms = f32::NAN;
        assert!(presets.validate().is_err());
    }

    #[test]
    fn partial_presets_deserialize_over_defaults() {
        let presets: TimingPresets =
            serde_json::from_str(r#"{"hero":{"duration_ms":2000.0}}"#).unwrap();
        assert_eq!(presets.hero.duration_ms, 2000.0);
        assert_eq!(presets.hero.easing, EasingFunction::SMOOTH);
        assert_eq!(presets.standard, TimingPresets::default().standard);
    }
}
