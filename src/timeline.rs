//! Headless scroll replay.
//!
//! Scrolls a [`Viewport`] down the page at a fixed speed, ticking the stage
//! once per frame, and records every phase change with the time and scroll
//! position it happened at.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use unveil_scene::{Phase, Stage, Viewport};

/// Upper bound on the frames spent waiting for tweens after scrolling stops.
const SETTLE_LIMIT_MS: f32 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub time_ms: f32,
    pub scroll_y: f32,
    pub element_id: String,
    pub from: Phase,
    pub to: Phase,
}

impl fmt::Display for TimelineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>9.1}ms  scroll {:>6.0}  {:<20} {} -> {}",
            self.time_ms, self.scroll_y, self.element_id, self.from, self.to
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    pub entries: Vec<TimelineEntry>,
    /// Phase of every mounted element when the replay ended.
    pub final_phases: BTreeMap<String, Phase>,
    pub frames: u64,
    pub duration_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPlan {
    pub frame_ms: f32,
    pub scroll_speed: f32,
    pub scroll_back: bool,
}

pub struct Simulation<'a> {
    stage: &'a mut Stage,
    viewport: &'a mut Viewport,
    plan: ScrollPlan,
    timeline: Timeline,
}

impl<'a> Simulation<'a> {
    pub fn new(stage: &'a mut Stage, viewport: &'a mut Viewport, plan: ScrollPlan) -> Self {
        Self {
            stage,
            viewport,
            plan,
            timeline: Timeline::default(),
        }
    }

    pub fn run(mut self) -> Timeline {
        let bottom = (self.viewport.content_height() - self.viewport.height).max(0.0);
        tracing::debug!(bottom, ?self.plan, "starting scroll replay");

        self.scroll_to(bottom);
        self.settle();
        if self.plan.scroll_back {
            self.scroll_to(0.0);
            self.settle();
        }

        self.timeline.final_phases = self
            .stage
            .mounted()
            .filter_map(|id| Some((id.to_string(), self.stage.phase(id)?)))
            .collect();
        self.timeline
    }

    /// Steps towards `target`, stopping early once a step no longer moves
    /// the viewport.
    fn scroll_to(&mut self, target: f32) {
        let step = self.plan.scroll_speed;
        if !(step.is_finite() && step > 0.0) {
            tracing::debug!(step, "scroll speed cannot move the viewport");
            self.frame();
            return;
        }
        loop {
            let y = self.viewport.scroll_y;
            let remaining = target - y;
            if remaining.abs() <= f32::EPSILON {
                self.frame();
                break;
            }
            self.viewport.scroll_to(y + remaining.clamp(-step, step));
            self.frame();
            if self.viewport.scroll_y == y {
                tracing::debug!(scroll_y = y, target, "scroll stalled");
                break;
            }
        }
    }

    fn settle(&mut self) {
        let mut waited = 0.0;
        while self.stage.active_tweens() > 0 && waited < SETTLE_LIMIT_MS {
            self.frame();
            waited += self.plan.frame_ms;
        }
    }

    fn frame(&mut self) {
        self.stage.tick(self.plan.frame_ms, &*self.viewport);
        self.timeline.frames += 1;
        self.timeline.duration_ms += self.plan.frame_ms;

        let time_ms = self.timeline.duration_ms;
        let scroll_y = self.viewport.scroll_y;
        self.timeline
            .entries
            .extend(self.stage.drain_events().into_iter().map(|event| TimelineEntry {
                time_ms,
                scroll_y,
                element_id: event.element_id,
                from: event.from,
                to: event.to,
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use unveil_motion::{TimingPresets, VariantCatalog};
    use unveil_scene::{AnimationRequest, Rect};

    fn plan(scroll_back: bool) -> ScrollPlan {
        ScrollPlan {
            frame_ms: 16.0,
            scroll_speed: 40.0,
            scroll_back,
        }
    }

    fn setup(trigger_once: bool) -> (Stage, Viewport) {
        let mut stage = Stage::new(Arc::new(VariantCatalog::new(&TimingPresets::default())));
        let mut viewport = Viewport::new(1280.0, 800.0);
        for (id, y) in [("top", 100.0), ("middle", 1400.0), ("bottom", 2600.0)] {
            viewport.insert(id, Rect::new(0.0, y, 1280.0, 300.0));
            stage
                .mount(id, AnimationRequest::named("fadeInUp").trigger_once(trigger_once))
                .unwrap();
        }
        (stage, viewport)
    }

    #[test]
    fn every_element_settles_in_page_order() {
        let (mut stage, mut viewport) = setup(true);
        let timeline = Simulation::new(&mut stage, &mut viewport, plan(false)).run();

        let entering: Vec<_> = timeline
            .entries
            .iter()
            .filter(|e| e.to == Phase::Entering)
            .map(|e| e.element_id.as_str())
            .collect();
        assert_eq!(entering, ["top", "middle", "bottom"]);
        assert!(timeline.final_phases.values().all(|p| *p == Phase::Settled));
        assert_eq!(viewport.scroll_y, 2100.0);
    }

    #[test]
    fn stalled_scroll_still_finishes() {
        let (mut stage, mut viewport) = setup(true);
        for scroll_speed in [0.0, -40.0, f32::NAN] {
            let plan = ScrollPlan {
                scroll_speed,
                ..plan(false)
            };
            let timeline = Simulation::new(&mut stage, &mut viewport, plan).run();

            assert_eq!(viewport.scroll_y, 0.0);
            assert_eq!(timeline.final_phases["top"], Phase::Settled);
            assert_eq!(timeline.final_phases["bottom"], Phase::Idle);
        }
    }

    #[test]
    fn sub_epsilon_steps_stop_once_the_viewport_stops_moving() {
        let (mut stage, mut viewport) = setup(true);
        viewport.scroll_to(1500.0);
        let plan = ScrollPlan {
            scroll_speed: 1e-6,
            ..plan(false)
        };
        let timeline = Simulation::new(&mut stage, &mut viewport, plan).run();

        assert_eq!(viewport.scroll_y, 1500.0);
        assert_eq!(timeline.final_phases["middle"], Phase::Settled);
    }

    #[test]
    fn scrolling_back_exits_repeat_reveals() {
        let (mut stage, mut viewport) = setup(false);
        let timeline = Simulation::new(&mut stage, &mut viewport, plan(true)).run();

        assert_eq!(viewport.scroll_y, 0.0);
        assert_eq!(timeline.final_phases["top"], Phase::Settled);
        assert_eq!(timeline.final_phases["bottom"], Phase::Idle);
        assert!(
            timeline
                .entries
                .iter()
                .any(|e| e.element_id == "bottom" && e.to == Phase::Exiting)
        );
    }
}
