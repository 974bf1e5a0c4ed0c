//! Visibility detection for reveal triggers.
//!
//! The platform supplies raw intersection ratios through
//! [`IntersectionSource`]; [`VisibilityDetector`] turns them into boolean
//! visibility changes per observation. Observations are RAII guards: the
//! registration lives exactly as long as the [`Observation`] value.
//!
//! ```text
//! IntersectionSource ──ratio──→ VisibilityDetector::poll ──→ VisibilityChange { element_id, visible }
//!                                        ▲
//!                          Observation (drop = release)
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// Axis-aligned rectangle in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Overlap with `other`, `None` when they do not touch.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < x || bottom < y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginLength {
    Px(f32),
    /// Percent of the root's width (left/right) or height (top/bottom).
    Percent(f32),
}

impl MarginLength {
    fn resolve(self, basis: f32) -> f32 {
        match self {
            Self::Px(px) => px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for MarginLength {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SceneError::InvalidRootMargin(s.to_string());
        if let Some(num) = s.strip_suffix("px") {
            num.parse().map(Self::Px).map_err(|_| invalid())
        } else if let Some(num) = s.strip_suffix('%') {
            num.parse().map(Self::Percent).map_err(|_| invalid())
        } else if s == "0" {
            Ok(Self::Px(0.0))
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Growth (positive) or shrink (negative) of the viewport before testing
/// intersection, in CSS margin shorthand order: top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    /// `-100px`: reveals fire slightly before an element is fully on screen
    /// but not while it only grazes the viewport edge.
    fn default() -> Self {
        Self::uniform(MarginLength::Px(-100.0))
    }
}

impl RootMargin {
    pub const ZERO: Self = Self::uniform(MarginLength::Px(0.0));

    pub const fn uniform(value: MarginLength) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Apply to `root`; the result may be empty when the margin over-shrinks.
    pub fn apply(&self, root: &Rect) -> Rect {
        let top = self.top.resolve(root.height);
        let right = self.right.resolve(root.width);
        let bottom = self.bottom.resolve(root.height);
        let left = self.left.resolve(root.width);
        Rect::new(
            root.x - left,
            root.y - top,
            root.width + left + right,
            root.height + top + bottom,
        )
    }
}

impl FromStr for RootMargin {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<MarginLength>, _>>()?;
        let [top, right, bottom, left] = match parts.as_slice() {
            [all] => [*all; 4],
            [vertical, horizontal] => [*vertical, *horizontal, *vertical, *horizontal],
            [top, horizontal, bottom] => [*top, *horizontal, *bottom, *horizontal],
            [top, right, bottom, left] => [*top, *right, *bottom, *left],
            _ => return Err(SceneError::InvalidRootMargin(s.to_string())),
        };
        Ok(Self {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl TryFrom<String> for RootMargin {
    type Error = SceneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.top == self.right && self.right == self.bottom && self.bottom == self.left {
            write!(f, "{}", self.top)
        } else {
            write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
        }
    }
}

/// Platform intersection primitive.
pub trait IntersectionSource {
    /// Fraction of the element's area inside the margin-adjusted root, in
    /// `[0, 1]`. `None` when the element is not attached.
    fn intersection_ratio(&self, element_id: &str, root_margin: &RootMargin) -> Option<f32>;
}

/// Geometric viewport over a scrolled page.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
    elements: HashMap<String, Rect>,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, element_id: impl Into<String>, rect: Rect) {
        self.elements.insert(element_id.into(), rect);
    }

    pub fn remove(&mut self, element_id: &str) -> Option<Rect> {
        self.elements.remove(element_id)
    }

    pub fn element(&self, element_id: &str) -> Option<&Rect> {
        self.elements.get(element_id)
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.max(0.0);
    }

    /// Visible page region.
    pub fn root(&self) -> Rect {
        Rect::new(self.scroll_x, self.scroll_y, self.width, self.height)
    }

    /// Bottom edge of the lowest element.
    pub fn content_height(&self) -> f32 {
        self.elements
            .values()
            .map(Rect::bottom)
            .fold(0.0, f32::max)
    }
}

impl IntersectionSource for Viewport {
    fn intersection_ratio(&self, element_id: &str, root_margin: &RootMargin) -> Option<f32> {
        let rect = self.elements.get(element_id)?;
        let root = root_margin.apply(&self.root());
        if root.width <= 0.0 || root.height <= 0.0 {
            return Some(0.0);
        }
        let Some(overlap) = rect.intersect(&root) else {
            return Some(0.0);
        };
        let area = rect.area();
        if area <= 0.0 {
            // zero-area elements count as fully visible once inside the root
            return Some(1.0);
        }
        Some((overlap.area() / area).clamp(0.0, 1.0))
    }
}

/// Visibility rule shared by all observations: any overlap for threshold 0,
/// otherwise the ratio must reach the threshold.
pub fn is_visible(ratio: f32, threshold: f32) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObservationId(u64);

#[derive(Debug)]
struct ObservationEntry {
    element_id: String,
    threshold: f32,
    root_margin: RootMargin,
    last: Option<bool>,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    entries: BTreeMap<ObservationId, ObservationEntry>,
}

/// A visibility edge (or the first reading) for one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityChange {
    pub observation: ObservationId,
    pub element_id: String,
    pub visible: bool,
}

/// Tracks observations and reports visibility changes.
///
/// The detector has no notion of animation intent: it keeps reporting edges
/// for as long as an observation is alive.
#[derive(Debug, Default)]
pub struct VisibilityDetector {
    registry: Rc<RefCell<Registry>>,
}

impl VisibilityDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start observing `element_id`. The observation ends when the returned
    /// guard is dropped or released.
    pub fn observe(
        &self,
        element_id: impl Into<String>,
        threshold: f32,
        root_margin: RootMargin,
    ) -> Observation {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = ObservationId(registry.next_id);
        registry.entries.insert(
            id,
            ObservationEntry {
                element_id: element_id.into(),
                threshold,
                root_margin,
                last: None,
            },
        );
        Observation {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Sample every live observation.
    ///
    /// The first reading of an observation is always reported; after that
    /// only changes are. Detached elements produce nothing.
    pub fn poll(&self, source: &dyn IntersectionSource) -> Vec<VisibilityChange> {
        let mut registry = self.registry.borrow_mut();
        let mut changes = Vec::new();
        for (id, entry) in registry.entries.iter_mut() {
            let Some(ratio) = source.intersection_ratio(&entry.element_id, &entry.root_margin)
            else {
                continue;
            };
            let visible = is_visible(ratio, entry.threshold);
            if entry.last != Some(visible) {
                entry.last = Some(visible);
                changes.push(VisibilityChange {
                    observation: *id,
                    element_id: entry.element_id.clone(),
                    visible,
                });
            }
        }
        changes
    }

    /// Forget the last reading so the next poll reports the current state.
    pub fn restart(&self, observation: &Observation) {
        if let Some(entry) = self.registry.borrow_mut().entries.get_mut(&observation.id) {
            entry.last = None;
        }
    }

    /// Number of observations currently registered.
    pub fn active_observations(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

/// Live registration with a [`VisibilityDetector`]; deregisters on drop.
#[derive(Debug)]
pub struct Observation {
    id: ObservationId,
    registry: Weak<RefCell<Registry>>,
}

impl Observation {
    pub fn id(&self) -> ObservationId {
        self.id
    }

    /// End the observation now.
    pub fn release(self) {}
}

impl Drop for Observation {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().entries.remove(&self.id);
        }
    }
}
