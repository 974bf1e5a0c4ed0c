//! Named reveal variants.
//!
//! The catalog is a read-only table built once from [`TimingPresets`]. It is
//! `Send + Sync` and can be shared across any number of stages through an
//! `Arc`.
//!
//! ```
//! use unveil_motion::{VariantCatalog, DEFAULT_VARIANT};
//!
//! let catalog = VariantCatalog::default();
//! let scale_in = catalog.resolve("scaleIn").unwrap();
//! assert_eq!(scale_in.animate.scale, Some(1.0));
//!
//! // unknown names degrade to the default entry
//! assert_eq!(catalog.resolve_or_default("wobble"), catalog.resolve(DEFAULT_VARIANT).unwrap());
//! ```

use std::collections::BTreeMap;

use crate::descriptor::MotionDescriptor;
use crate::error::{MotionError, MotionResult};
use crate::style::{ClipInset, StyleDelta};
use crate::timing::{TimingClass, TimingPresets};
use crate::variant::{Direction, Variant};

/// Entry used when a requested name is not in the catalog.
pub const DEFAULT_VARIANT: &str = "fadeInUp";

/// Offset of the `fadeIn*` and `scaleInUp` entries.
pub const FADE_DISTANCE_PX: f32 = 30.0;
/// Offset of the `slideIn*` entries.
pub const SLIDE_DISTANCE_PX: f32 = 100.0;

const DIRECTIONS: [(&str, Direction); 4] = [
    ("Up", Direction::Up),
    ("Down", Direction::Down),
    ("Left", Direction::Left),
    ("Right", Direction::Right),
];

#[derive(Debug, Clone)]
pub struct VariantCatalog {
    entries: BTreeMap<String, MotionDescriptor>,
    presets: TimingPresets,
}

impl Default for VariantCatalog {
    fn default() -> Self {
        Self::new(&TimingPresets::default())
    }
}

impl VariantCatalog {
    pub fn new(presets: &TimingPresets) -> Self {
        let standard = presets.get(TimingClass::Standard);
        let cinematic = presets.get(TimingClass::Cinematic);
        let dramatic = presets.get(TimingClass::Dramatic);
        let hero = presets.get(TimingClass::Hero);

        let mut entries = BTreeMap::new();
        let mut add = |name: String, descriptor: MotionDescriptor| {
            entries.insert(name, descriptor);
        };

        add(
            "fadeIn".into(),
            MotionDescriptor::new(
                StyleDelta::new().opacity(0.0),
                StyleDelta::new().opacity(1.0),
                StyleDelta::new().opacity(0.0),
                standard,
            ),
        );
        for (suffix, direction) in DIRECTIONS {
            add(
                format!("fadeIn{suffix}"),
                direction.fade_descriptor(FADE_DISTANCE_PX, standard),
            );
            add(
                format!("slideIn{suffix}"),
                direction.slide_descriptor(SLIDE_DISTANCE_PX, cinematic),
            );
        }

        add(
            "scaleIn".into(),
            MotionDescriptor::new(
                StyleDelta::new().scale(0.8).opacity(0.0),
                StyleDelta::new().scale(1.0).opacity(1.0),
                StyleDelta::new().scale(0.8).opacity(0.0),
                standard,
            ),
        );
        add(
            "scaleInUp".into(),
            MotionDescriptor::new(
                StyleDelta::new().scale(0.8).opacity(0.0).y(FADE_DISTANCE_PX),
                StyleDelta::new().scale(1.0).opacity(1.0).y(0.0),
                StyleDelta::new().scale(0.8).opacity(0.0).y(-FADE_DISTANCE_PX),
                standard,
            ),
        );

        for (name, scale, rise, timing) in [
            ("cinematicEntrance", 0.9, 60.0, dramatic),
            ("dramaticReveal", 0.95, 80.0, dramatic),
            ("heroEntrance", 0.85, 100.0, hero),
        ] {
            add(
                name.into(),
                MotionDescriptor::new(
                    StyleDelta::new().opacity(0.0).scale(scale).y(rise),
                    StyleDelta::new().opacity(1.0).scale(1.0).y(0.0),
                    StyleDelta::new().opacity(0.0).scale(scale).y(-rise),
                    timing,
                ),
            );
        }

        add(
            "textReveal".into(),
            MotionDescriptor::new(
                StyleDelta::new().clip(ClipInset::new(0.0, 100.0, 0.0, 0.0)),
                StyleDelta::new().clip(ClipInset::NONE),
                StyleDelta::new().clip(ClipInset::new(0.0, 0.0, 0.0, 100.0)),
                cinematic,
            ),
        );

        add(
            "staggerContainer".into(),
            MotionDescriptor::new(
                StyleDelta::new(),
                StyleDelta::new(),
                StyleDelta::new(),
                standard,
            )
            .with_stagger(presets.stagger),
        );

        Self {
            entries,
            presets: presets.clone(),
        }
    }

    /// Look up a named entry.
    pub fn resolve(&self, name: &str) -> MotionResult<&MotionDescriptor> {
        self.entries
            .get(name)
            .ok_or_else(|| MotionError::unknown_variant(name))
    }

    /// Look up a named entry, falling back to [`DEFAULT_VARIANT`].
    pub fn resolve_or_default(&self, name: &str) -> &MotionDescriptor {
        self.resolve(name).unwrap_or_else(|_| self.default_descriptor())
    }

    /// Named lookup, or synthesis for [`Variant::Custom`] with standard timing.
    pub fn resolve_variant(&self, variant: &Variant) -> MotionResult<MotionDescriptor> {
        match variant {
            Variant::Named(name) => self.resolve(name).cloned(),
            Variant::Custom {
                direction,
                distance_px,
            } => {
                if !distance_px.is_finite() {
                    return Err(MotionError::invalid_variant(format!(
                        "distance_px must be finite, got {distance_px}"
                    )));
                }
                Ok(direction.fade_descriptor(*distance_px, self.presets.standard))
            }
        }
    }

    pub fn default_descriptor(&self) -> &MotionDescriptor {
        &self.entries[DEFAULT_VARIANT]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn presets(&self) -> &TimingPresets {
        &self.presets
    }
}
