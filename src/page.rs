//! Page layout files replayed by the runner.
//!
//! # Example JSON
//!
//! ```json
//! {
//!   "elements": [
//!     { "id": "hero", "rect": { "x": 0, "y": 80, "width": 1280, "height": 520 },
//!       "variant": "heroEntrance" },
//!     { "id": "cards", "rect": { "x": 0, "y": 1100, "width": 1280, "height": 400 },
//!       "variant": "staggerContainer",
//!       "stagger": { "stagger_delay_ms": 100, "group_delay_ms": 50 },
//!       "children": [
//!         { "id": "card-1", "rect": { "x": 40, "y": 1100, "width": 380, "height": 400 },
//!           "variant": "fadeInUp" }
//!       ] }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use serde::{Deserialize, Serialize};
use unveil_motion::Variant;
use unveil_scene::{AnimationRequest, Rect, RootMargin, Stage, StaggerSpec, Viewport};

/// Request fields a page element may leave out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestDefaults {
    pub threshold: f32,
    pub root_margin: RootMargin,
    pub trigger_once: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub id: String,
    pub rect: Rect,
    pub variant: Variant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_margin: Option<RootMargin>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_once: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<StaggerSpec>,
    /// Staggered children, in reveal order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn is_group(&self) -> bool {
        self.stagger.is_some() || !self.children.is_empty()
    }

    pub fn request(&self, defaults: &RequestDefaults) -> AnimationRequest {
        AnimationRequest {
            variant: self.variant.clone(),
            delay_ms: self.delay_ms,
            duration_ms: self.duration_ms,
            threshold: self.threshold.unwrap_or(defaults.threshold),
            root_margin: self.root_margin.unwrap_or(defaults.root_margin),
            trigger_once: self.trigger_once.unwrap_or(defaults.trigger_once),
            stagger: self.stagger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    pub elements: Vec<ElementSpec>,
}

impl Page {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read page '{}'", path.display()))?;
        let page: Page = serde_json::from_str(&text)
            .with_context(|| format!("parse page '{}'", path.display()))?;
        page.validate()?;
        Ok(page)
    }

    /// Every element id must be unique and groups may not nest.
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::BTreeSet::new();
        for element in &self.elements {
            for id in std::iter::once(&element.id).chain(element.children.iter().map(|c| &c.id)) {
                if !seen.insert(id.as_str()) {
                    bail!("duplicate element id '{id}'");
                }
            }
            if let Some(child) = element.children.iter().find(|c| c.is_group()) {
                bail!("'{}' is a stagger group nested in '{}'", child.id, element.id);
            }
        }
        Ok(())
    }

    /// Place every element, children included.
    pub fn layout(&self, viewport: &mut Viewport) {
        for element in &self.elements {
            viewport.insert(element.id.clone(), element.rect);
            for child in &element.children {
                viewport.insert(child.id.clone(), child.rect);
            }
        }
    }

    pub fn mount(&self, stage: &mut Stage, defaults: &RequestDefaults) -> Result<()> {
        for element in &self.elements {
            let request = element.request(defaults);
            if element.is_group() {
                let children = element
                    .children
                    .iter()
                    .map(|child| (child.id.clone(), child.request(defaults)));
                stage
                    .mount_group(element.id.clone(), request, children)
                    .with_context(|| format!("mount group '{}'", element.id))?;
            } else {
                stage
                    .mount(element.id.clone(), request)
                    .with_context(|| format!("mount '{}'", element.id))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> RequestDefaults {
        RequestDefaults {
            threshold: 0.25,
            root_margin: RootMargin::ZERO,
            trigger_once: false,
        }
    }

    const PAGE: &str = r#"{
        "elements": [
            { "id": "hero", "rect": { "x": 0, "y": 0, "width": 100, "height": 100 },
              "variant": "fadeIn", "threshold": 0.5 },
            { "id": "list", "rect": { "x": 0, "y": 200, "width": 100, "height": 100 },
              "variant": "staggerContainer",
              "children": [
                { "id": "a", "rect": { "x": 0, "y": 200, "width": 50, "height": 50 },
                  "variant": { "direction": "left", "distance_px": 40 } }
              ] }
        ]
    }"#;

    #[test]
    fn element_fields_override_defaults() {
        let page: Page = serde_json::from_str(PAGE).unwrap();
        let hero = page.elements[0].request(&defaults());
        assert_eq!(hero.threshold, 0.5);
        assert_eq!(hero.root_margin, RootMargin::ZERO);
        assert!(!hero.trigger_once);
        assert!(page.elements[1].is_group());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut page: Page = serde_json::from_str(PAGE).unwrap();
        page.elements[1].children[0].id = "hero".into();
        let err = page.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate element id 'hero'"));
    }

    #[test]
    fn nested_groups_are_rejected() {
        let mut page: Page = serde_json::from_str(PAGE).unwrap();
        let nested = page.elements[1].clone();
        page.elements[1].children[0] = ElementSpec {
            id: "inner".into(),
            ..nested
        };
        page.elements[1].children[0].children[0].id = "inner-a".into();
        assert!(page.validate().is_err());
    }
}
