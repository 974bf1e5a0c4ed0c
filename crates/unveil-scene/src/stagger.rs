//! Stagger groups: ordered children revealed one after another.

use unveil_motion::StaggerTiming;

/// Children of a stagger parent with their entrance delays.
///
/// Delays are computed once when the group is built and only read
/// afterwards; reordering or re-rendering the page does not shift them.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggerGroup {
    timing: StaggerTiming,
    children: Vec<(String, f32)>,
}

impl StaggerGroup {
    pub fn new<I, S>(timing: StaggerTiming, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let children = children
            .into_iter()
            .enumerate()
            .map(|(index, id)| (id.into(), timing.child_delay(index)))
            .collect();
        Self { timing, children }
    }

    pub fn timing(&self) -> StaggerTiming {
        self.timing
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child ids in reveal order.
    pub fn children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(id, _)| id.as_str())
    }

    pub fn delay_of(&self, child_id: &str) -> Option<f32> {
        self.children
            .iter()
            .find(|(id, _)| id == child_id)
            .map(|(_, delay)| *delay)
    }

    pub fn index_of(&self, child_id: &str) -> Option<usize> {
        self.children.iter().position(|(id, _)| id == child_id)
    }

    pub fn contains(&self, child_id: &str) -> bool {
        self.index_of(child_id).is_some()
    }

    /// Drop a child; remaining delays are kept as they were.
    pub fn remove(&mut self, child_id: &str) -> bool {
        let before = self.children.len();
        self.children.retain(|(id, _)| id != child_id);
        self.children.len() != before
    }
}
