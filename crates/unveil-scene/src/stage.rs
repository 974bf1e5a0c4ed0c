//! Page-level reveal orchestrator.
//!
//! A [`Stage`] owns one binding per mounted element. Each binding holds the
//! descriptor resolved at mount time, the element's [`ElementAnimationState`],
//! the tween it is waiting on and the RAII [`Observation`] that keeps the
//! element registered with the detector.
//!
//! ```text
//! host loop ── tick(dt, viewport) ──▶ detector.poll ──▶ visibility changes
//!                                   └▶ engine.update ──▶ tween completions
//!                                                           │
//!                    PhaseEvent queue ◀── state machine ◀───┘
//! ```
//!
//! Stagger groups bind the parent to the detector and drive the children
//! from the parent's visibility; the parent itself is never animated.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};
use unveil_motion::{
    DEFAULT_VARIANT, MotionDescriptor, MotionError, StaggerTiming, StyleDelta, VariantCatalog,
};

use crate::engine::{MotionEngine, TweenEvent, TweenId};
use crate::error::{SceneError, SceneResult};
use crate::events::{Diagnostic, EventQueue, PhaseEvent};
use crate::request::AnimationRequest;
use crate::stagger::StaggerGroup;
use crate::state::{ElementAnimationState, Phase};
use crate::visibility::{IntersectionSource, Observation, VisibilityDetector};
use crate::wrappers::Wrapper;

type DiagnosticHook = Box<dyn FnMut(&Diagnostic)>;

#[derive(Debug)]
enum Role {
    Single,
    Parent(StaggerGroup),
    Child { parent: String },
}

#[derive(Debug)]
struct Binding {
    request: AnimationRequest,
    descriptor: MotionDescriptor,
    state: ElementAnimationState,
    /// Tween whose completion advances the state machine.
    pending: Option<TweenId>,
    /// `None` for group children, which follow their parent.
    observation: Option<Observation>,
    role: Role,
}

pub struct Stage {
    catalog: Arc<VariantCatalog>,
    detector: VisibilityDetector,
    engine: MotionEngine,
    bindings: BTreeMap<String, Binding>,
    events: EventQueue,
    diagnostic_hook: Option<DiagnosticHook>,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("bindings", &self.bindings.len())
            .field("observations", &self.detector.active_observations())
            .field("active_tweens", &self.engine.active_count())
            .field("queued_events", &self.events.len())
            .finish()
    }
}

impl Stage {
    pub fn new(catalog: Arc<VariantCatalog>) -> Self {
        Self {
            catalog,
            detector: VisibilityDetector::new(),
            engine: MotionEngine::new(),
            bindings: BTreeMap::new(),
            events: EventQueue::new(),
            diagnostic_hook: None,
        }
    }

    /// Receive every silent recovery as it happens.
    pub fn with_diagnostic_hook(mut self, hook: impl FnMut(&Diagnostic) + 'static) -> Self {
        self.set_diagnostic_hook(hook);
        self
    }

    pub fn set_diagnostic_hook(&mut self, hook: impl FnMut(&Diagnostic) + 'static) {
        self.diagnostic_hook = Some(Box::new(hook));
    }

    pub fn catalog(&self) -> &VariantCatalog {
        &self.catalog
    }

    // ---- mounting ----

    /// Bind `element_id` to `request`, replacing any earlier binding.
    ///
    /// The element is put in its initial style right away and starts being
    /// observed; nothing animates until it is reported visible.
    pub fn mount(&mut self, element_id: impl Into<String>, request: AnimationRequest) -> SceneResult<()> {
        let element_id = element_id.into();
        request.validate()?;
        let descriptor = self
            .resolve(&element_id, &request)?
            .with_overrides(request.delay_ms, request.duration_ms);
        descriptor.timing.validate()?;

        self.unmount(&element_id);
        self.engine.set_style(&element_id, descriptor.initial);
        let observation = self.detector.observe(
            element_id.clone(),
            request.threshold,
            request.root_margin,
        );
        debug!(element_id = %element_id, variant = %request.variant, "mounted");
        self.bindings.insert(
            element_id,
            Binding {
                request,
                descriptor,
                state: ElementAnimationState::new(),
                pending: None,
                observation: Some(observation),
                role: Role::Single,
            },
        );
        Ok(())
    }

    /// Mount a stagger parent and its ordered children.
    ///
    /// Only the parent is observed. Child `i` enters `group_delay + i *
    /// stagger_delay` ms after the parent becomes visible, plus its own
    /// delay override if it has one. The parent's `trigger_once` governs the
    /// whole group.
    pub fn mount_group<I, S>(
        &mut self,
        parent_id: impl Into<String>,
        request: AnimationRequest,
        children: I,
    ) -> SceneResult<()>
    where
        I: IntoIterator<Item = (S, AnimationRequest)>,
        S: Into<String>,
    {
        let parent_id = parent_id.into();
        request.validate()?;
        let children: Vec<(String, AnimationRequest)> = children
            .into_iter()
            .map(|(id, child)| (id.into(), child))
            .collect();
        let mut seen = BTreeSet::new();
        for (child_id, child) in &children {
            if *child_id == parent_id {
                return Err(SceneError::InvalidGroup(format!(
                    "'{parent_id}' cannot be a child of itself"
                )));
            }
            if !seen.insert(child_id.as_str()) {
                return Err(SceneError::InvalidGroup(format!(
                    "child '{child_id}' appears twice in '{parent_id}'"
                )));
            }
            child.validate()?;
        }

        let descriptor = self
            .resolve(&parent_id, &request)?
            .with_overrides(request.delay_ms, request.duration_ms);
        let stagger = request
            .stagger
            .map(StaggerTiming::from)
            .or(descriptor.stagger)
            .unwrap_or(self.catalog.presets().stagger);
        let group = StaggerGroup::new(stagger, children.iter().map(|(id, _)| id.clone()));

        let mut resolved = Vec::with_capacity(children.len());
        for (child_id, child_request) in children {
            let offset = group.delay_of(&child_id).unwrap_or_default();
            let child_descriptor = self.resolve(&child_id, &child_request)?.with_overrides(
                Some(offset + child_request.delay_ms.unwrap_or(0.0)),
                child_request.duration_ms,
            );
            child_descriptor.timing.validate()?;
            resolved.push((child_id, child_request, child_descriptor));
        }

        self.unmount(&parent_id);
        for (child_id, mut child_request, child_descriptor) in resolved {
            self.unmount(&child_id);
            child_request.trigger_once = request.trigger_once;
            self.engine.set_style(&child_id, child_descriptor.initial);
            self.bindings.insert(
                child_id,
                Binding {
                    request: child_request,
                    descriptor: child_descriptor,
                    state: ElementAnimationState::new(),
                    pending: None,
                    observation: None,
                    role: Role::Child {
                        parent: parent_id.clone(),
                    },
                },
            );
        }

        let observation = self.detector.observe(
            parent_id.clone(),
            request.threshold,
            request.root_margin,
        );
        debug!(element_id = %parent_id, children = group.len(), "mounted stagger group");
        self.bindings.insert(
            parent_id,
            Binding {
                request,
                descriptor,
                state: ElementAnimationState::new(),
                pending: None,
                observation: Some(observation),
                role: Role::Parent(group),
            },
        );
        Ok(())
    }

    /// Mount one of the named entry points with its default request.
    pub fn mount_wrapped(&mut self, element_id: impl Into<String>, wrapper: Wrapper) -> SceneResult<()> {
        self.mount(element_id, wrapper.request())
    }

    /// Drop the element's binding. Its tween is cancelled, its observation
    /// released and nothing is reported for it afterwards. Unmounting a
    /// group parent unmounts its children.
    pub fn unmount(&mut self, element_id: &str) -> bool {
        let Some(binding) = self.bindings.remove(element_id) else {
            return false;
        };
        self.engine.remove(element_id);
        self.events.discard_element(element_id);
        if let Some(observation) = binding.observation {
            observation.release();
        }

        match binding.role {
            Role::Single => {}
            Role::Parent(group) => {
                for child in group.children() {
                    self.unmount(child);
                }
            }
            Role::Child { parent } => {
                if let Some(Binding {
                    role: Role::Parent(group),
                    ..
                }) = self.bindings.get_mut(&parent)
                {
                    group.remove(element_id);
                }
                self.check_group(&parent);
            }
        }
        debug!(element_id, "unmounted");
        true
    }

    /// Back to `Idle` with the initial style, observing afresh.
    pub fn reset(&mut self, element_id: &str) -> SceneResult<()> {
        let binding = self
            .bindings
            .get_mut(element_id)
            .ok_or_else(|| SceneError::UnknownElement(element_id.to_string()))?;

        binding.pending = None;
        let from = binding.state.reset();
        if let Some(observation) = &binding.observation {
            self.detector.restart(observation);
        }
        let children: Vec<String> = match &binding.role {
            Role::Parent(group) => group.children().map(str::to_owned).collect(),
            Role::Single | Role::Child { .. } => {
                self.engine.set_style(element_id, binding.descriptor.initial);
                Vec::new()
            }
        };
        if from != Phase::Idle {
            self.events.push(PhaseEvent::new(element_id, from, Phase::Idle));
        }
        for child in children {
            self.reset(&child)?;
        }
        Ok(())
    }

    // ---- driving ----

    /// Report a visibility change directly, for hosts that observe
    /// elements themselves.
    pub fn set_visibility(&mut self, element_id: &str, visible: bool) {
        let Some(binding) = self.bindings.get_mut(element_id) else {
            self.report(Diagnostic::StaleElementReference {
                element_id: element_id.to_string(),
                tween_id: None,
            });
            return;
        };
        if let Role::Child { parent } = &binding.role {
            trace!(element_id, %parent, "ignoring visibility of group child");
            return;
        }
        binding.state.last_visibility = visible;
        self.drive(element_id);
    }

    /// Poll visibility, advance tweens by `delta_ms` and apply completions.
    pub fn tick(&mut self, delta_ms: f32, source: &dyn IntersectionSource) {
        for change in self.detector.poll(source) {
            self.set_visibility(&change.element_id, change.visible);
        }

        self.engine.update(delta_ms);
        for event in self.engine.drain_events() {
            if let TweenEvent::Finished {
                tween_id,
                element_id,
            } = event
            {
                self.finish_tween(&element_id, tween_id);
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<PhaseEvent> {
        self.events.drain().collect()
    }

    // ---- queries ----

    pub fn is_mounted(&self, element_id: &str) -> bool {
        self.bindings.contains_key(element_id)
    }

    pub fn mounted(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn phase(&self, element_id: &str) -> Option<Phase> {
        self.bindings.get(element_id).map(|b| b.state.phase)
    }

    pub fn state(&self, element_id: &str) -> Option<ElementAnimationState> {
        self.bindings.get(element_id).map(|b| b.state)
    }

    /// Descriptor resolved at mount time, overrides applied.
    pub fn descriptor(&self, element_id: &str) -> Option<&MotionDescriptor> {
        self.bindings.get(element_id).map(|b| &b.descriptor)
    }

    pub fn current_style(&self, element_id: &str) -> Option<StyleDelta> {
        self.engine.current_style(element_id)
    }

    /// Delay before the element's entrance tween starts.
    pub fn entrance_delay(&self, element_id: &str) -> Option<f32> {
        self.descriptor(element_id).map(|d| d.timing.delay_ms)
    }

    pub fn group(&self, parent_id: &str) -> Option<&StaggerGroup> {
        match &self.bindings.get(parent_id)?.role {
            Role::Parent(group) => Some(group),
            Role::Single | Role::Child { .. } => None,
        }
    }

    /// Live detector registrations.
    pub fn active_observations(&self) -> usize {
        self.detector.active_observations()
    }

    pub fn is_animating(&self, element_id: &str) -> bool {
        self.engine.is_animating(element_id)
    }

    /// Tweens in flight across the page, delayed ones included.
    pub fn active_tweens(&self) -> usize {
        self.engine.active_count()
    }

    // ---- internals ----

    /// Unknown names degrade to the default variant; malformed custom
    /// variants are errors.
    fn resolve(&mut self, element_id: &str, request: &AnimationRequest) -> SceneResult<MotionDescriptor> {
        match self.catalog.resolve_variant(&request.variant) {
            Ok(descriptor) => Ok(descriptor),
            Err(MotionError::UnknownVariant(_)) => {
                let fallback = self.catalog.default_descriptor().clone();
                self.report(Diagnostic::UnknownVariant {
                    element_id: element_id.to_string(),
                    requested: request.variant.to_string(),
                    fallback: DEFAULT_VARIANT.to_string(),
                });
                Ok(fallback)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        debug!(element_id = diagnostic.element_id(), "{diagnostic}");
        if let Some(hook) = self.diagnostic_hook.as_mut() {
            hook(&diagnostic);
        }
    }

    /// Move along one state machine edge and queue the event.
    fn transition(&mut self, element_id: &str, to: Phase) -> bool {
        let Some(binding) = self.bindings.get_mut(element_id) else {
            return false;
        };
        let Some(from) = binding.state.advance(to) else {
            return false;
        };
        trace!(element_id, %from, %to, "phase");
        self.events.push(PhaseEvent::new(element_id, from, to));
        true
    }

    /// Act on the recorded visibility if the element is at rest.
    fn drive(&mut self, element_id: &str) {
        let Some(binding) = self.bindings.get(element_id) else {
            return;
        };
        let state = binding.state;
        match state.phase {
            Phase::Idle if state.last_visibility => self.enter(element_id),
            Phase::Settled if !state.last_visibility && !binding.request.trigger_once => {
                self.exit(element_id)
            }
            _ => {}
        }
    }

    fn enter(&mut self, element_id: &str) {
        if !self.transition(element_id, Phase::Entering) {
            return;
        }
        let Some(binding) = self.bindings.get_mut(element_id) else {
            return;
        };
        match &binding.role {
            Role::Parent(group) => {
                let children: Vec<String> = group.children().map(str::to_owned).collect();
                self.follow_parent(&children, true);
                self.check_group(element_id);
            }
            Role::Single | Role::Child { .. } => {
                let tween = self.engine.animate(
                    element_id,
                    binding.descriptor.animate,
                    binding.descriptor.timing,
                );
                binding.pending = Some(tween);
            }
        }
    }

    fn exit(&mut self, element_id: &str) {
        if !self.transition(element_id, Phase::Exiting) {
            return;
        }
        let Some(binding) = self.bindings.get_mut(element_id) else {
            return;
        };
        match &binding.role {
            Role::Parent(group) => {
                let children: Vec<String> = group.children().map(str::to_owned).collect();
                self.follow_parent(&children, false);
                self.check_group(element_id);
            }
            Role::Single | Role::Child { .. } => {
                // exits never wait out the entrance delay
                let timing = binding.descriptor.timing.with_delay(0.0);
                let tween = self
                    .engine
                    .animate(element_id, binding.descriptor.exit, timing);
                binding.pending = Some(tween);
            }
        }
    }

    fn follow_parent(&mut self, children: &[String], visible: bool) {
        for child in children {
            if let Some(binding) = self.bindings.get_mut(child) {
                binding.state.last_visibility = visible;
                self.drive(child);
            }
        }
    }

    fn finish_tween(&mut self, element_id: &str, tween_id: TweenId) {
        let stale = Diagnostic::StaleElementReference {
            element_id: element_id.to_string(),
            tween_id: Some(tween_id),
        };
        let Some(binding) = self.bindings.get_mut(element_id) else {
            self.report(stale);
            return;
        };
        if binding.pending != Some(tween_id) {
            self.report(stale);
            return;
        }
        binding.pending = None;

        let next = match binding.state.phase {
            Phase::Entering => Phase::Settled,
            Phase::Exiting => Phase::Idle,
            Phase::Idle | Phase::Settled => return,
        };
        let parent = match &binding.role {
            Role::Child { parent } => Some(parent.clone()),
            Role::Single | Role::Parent(_) => None,
        };

        self.transition(element_id, next);
        self.drive(element_id);
        if let Some(parent) = parent {
            self.check_group(&parent);
        }
    }

    /// Settle (or idle) a group parent once all of its children have.
    fn check_group(&mut self, parent_id: &str) {
        let Some(binding) = self.bindings.get(parent_id) else {
            return;
        };
        let Role::Parent(group) = &binding.role else {
            return;
        };
        let target = match binding.state.phase {
            Phase::Entering => Phase::Settled,
            Phase::Exiting => Phase::Idle,
            Phase::Idle | Phase::Settled => return,
        };
        let done = group.children().all(|child| {
            self.bindings
                .get(child)
                .is_none_or(|b| b.state.phase == target)
        });
        if done && self.transition(parent_id, target) {
            self.drive(parent_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use unveil_motion::TimingPresets;

    fn stage() -> Stage {
        Stage::new(Arc::new(VariantCatalog::new(&TimingPresets::default())))
    }

    #[test]
    fn mount_applies_initial_style() {
        let mut stage = stage();
        stage.mount("card", AnimationRequest::named("fadeInUp")).unwrap();
        assert_eq!(stage.phase("card"), Some(Phase::Idle));
        assert_eq!(
            stage.current_style("card"),
            Some(stage.descriptor("card").unwrap().initial)
        );
        assert_eq!(stage.active_observations(), 1);
    }

    #[test]
    fn remount_replaces_binding() {
        let mut stage = stage();
        stage.mount("card", AnimationRequest::named("fadeIn")).unwrap();
        stage.set_visibility("card", true);
        stage
            .mount("card", AnimationRequest::named("scaleIn").with_delay(40.0))
            .unwrap();
        assert_eq!(stage.phase("card"), Some(Phase::Idle));
        assert_eq!(stage.entrance_delay("card"), Some(40.0));
        assert_eq!(stage.active_observations(), 1);
        assert!(stage.drain_events().is_empty());
    }

    #[test]
    fn invalid_request_is_rejected_without_side_effects() {
        let mut stage = stage();
        let err = stage
            .mount("card", AnimationRequest::named("fadeIn").with_duration(-1.0))
            .unwrap_err();
        assert!(matches!(err, SceneError::Motion(_)));
        assert!(!stage.is_mounted("card"));
        assert_eq!(stage.active_observations(), 0);
    }

    #[test]
    fn completion_for_replaced_tween_is_stale() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut stage = stage().with_diagnostic_hook(move |d| sink.borrow_mut().push(d.clone()));

        stage.mount("card", AnimationRequest::named("fadeIn")).unwrap();
        stage.set_visibility("card", true);
        stage.finish_tween("card", TweenId(u64::MAX));

        assert_eq!(stage.phase("card"), Some(Phase::Entering));
        assert_eq!(
            *seen.borrow(),
            vec![Diagnostic::StaleElementReference {
                element_id: "card".into(),
                tween_id: Some(TweenId(u64::MAX)),
            }]
        );
    }

    #[test]
    fn reset_returns_to_initial_style() {
        let mut stage = stage();
        stage.mount("card", AnimationRequest::named("fadeInLeft")).unwrap();
        stage.set_visibility("card", true);
        stage.tick(1000.0, &crate::visibility::Viewport::new(100.0, 100.0));
        assert_eq!(stage.phase("card"), Some(Phase::Settled));

        stage.drain_events();
        stage.reset("card").unwrap();
        assert_eq!(stage.phase("card"), Some(Phase::Idle));
        assert!(!stage.state("card").unwrap().last_visibility);
        assert_eq!(
            stage.current_style("card"),
            Some(stage.descriptor("card").unwrap().initial)
        );
        assert_eq!(
            stage.drain_events(),
            vec![PhaseEvent::new("card", Phase::Settled, Phase::Idle)]
        );
        assert!(matches!(
            stage.reset("missing"),
            Err(SceneError::UnknownElement(_))
        ));
    }

    #[test]
    fn empty_group_settles_immediately() {
        let mut stage = stage();
        stage
            .mount_group(
                "list",
                AnimationRequest::named("staggerContainer"),
                Vec::<(String, AnimationRequest)>::new(),
            )
            .unwrap();
        stage.set_visibility("list", true);
        assert_eq!(stage.phase("list"), Some(Phase::Settled));
    }
}
