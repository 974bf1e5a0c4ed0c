use std::sync::Arc;

use anyhow::Result;
use unveil_motion::{TimingPresets, VariantCatalog};
use unveil_scene::{AnimationRequest, Phase, Rect, RootMargin, Stage, Viewport};

const FRAME_MS: f32 = 16.0;

fn page() -> Viewport {
    let mut viewport = Viewport::new(1280.0, 800.0);
    viewport.insert("hero", Rect::new(0.0, 100.0, 1280.0, 400.0));
    viewport.insert("features", Rect::new(0.0, 1200.0, 1280.0, 300.0));
    viewport.insert("footer", Rect::new(0.0, 2400.0, 1280.0, 300.0));
    viewport
}

fn stage() -> Stage {
    Stage::new(Arc::new(VariantCatalog::new(&TimingPresets::default())))
}

fn frames(stage: &mut Stage, viewport: &Viewport, count: usize) {
    for _ in 0..count {
        stage.tick(FRAME_MS, viewport);
    }
}

#[test]
fn scrolling_reveals_elements_in_page_order() -> Result<()> {
    let mut viewport = page();
    let mut stage = stage();
    stage.mount("hero", AnimationRequest::named("heroEntrance"))?;
    stage.mount("features", AnimationRequest::named("fadeInUp"))?;
    stage.mount("footer", AnimationRequest::named("fadeIn"))?;

    frames(&mut stage, &viewport, 1);
    assert_eq!(stage.phase("hero"), Some(Phase::Entering));
    assert_eq!(stage.phase("features"), Some(Phase::Idle));

    viewport.scroll_to(800.0);
    frames(&mut stage, &viewport, 1);
    assert_eq!(stage.phase("features"), Some(Phase::Entering));
    assert_eq!(stage.phase("footer"), Some(Phase::Idle));

    viewport.scroll_to(2000.0);
    frames(&mut stage, &viewport, 120);
    for id in ["hero", "features", "footer"] {
        assert_eq!(stage.phase(id), Some(Phase::Settled), "{id}");
    }
    Ok(())
}

#[test]
fn repeat_reveal_replays_when_scrolling_back() -> Result<()> {
    let mut viewport = page();
    let mut stage = stage();
    stage.mount(
        "features",
        AnimationRequest::named("slideInLeft").trigger_once(false),
    )?;

    viewport.scroll_to(800.0);
    frames(&mut stage, &viewport, 80);
    assert_eq!(stage.phase("features"), Some(Phase::Settled));

    viewport.scroll_to(0.0);
    frames(&mut stage, &viewport, 80);
    assert_eq!(stage.phase("features"), Some(Phase::Idle));

    viewport.scroll_to(800.0);
    frames(&mut stage, &viewport, 1);
    assert_eq!(stage.phase("features"), Some(Phase::Entering));
    Ok(())
}

#[test]
fn root_margin_delays_the_trigger() -> Result<()> {
    let mut viewport = page();
    let mut stage = stage();
    stage.mount(
        "eager",
        AnimationRequest::named("fadeIn").with_root_margin(RootMargin::ZERO),
    )?;
    stage.mount("biased", AnimationRequest::named("fadeIn"))?;
    viewport.insert("eager", Rect::new(0.0, 850.0, 1280.0, 100.0));
    viewport.insert("biased", Rect::new(0.0, 850.0, 1280.0, 100.0));

    // both sit in the bottom 100px of the viewport after this scroll
    viewport.scroll_to(150.0);
    frames(&mut stage, &viewport, 1);
    assert_eq!(stage.phase("eager"), Some(Phase::Entering));
    assert_eq!(stage.phase("biased"), Some(Phase::Idle));
    Ok(())
}

#[test]
fn observations_are_released_on_every_exit_path() -> Result<()> {
    let viewport = page();
    let mut stage = stage();

    stage.mount("hero", AnimationRequest::named("fadeIn"))?;
    stage.mount("features", AnimationRequest::named("fadeIn"))?;
    stage.mount_group(
        "list",
        AnimationRequest::named("staggerContainer"),
        [("a", AnimationRequest::named("fadeIn"))],
    )?;
    assert_eq!(stage.active_observations(), 3);

    // remount replaces, never adds
    stage.mount("hero", AnimationRequest::named("scaleIn"))?;
    assert_eq!(stage.active_observations(), 3);

    frames(&mut stage, &viewport, 10);
    stage.unmount("hero");
    stage.unmount("list");
    assert_eq!(stage.active_observations(), 1);

    Ok(())
}

#[test]
fn reset_replays_a_settled_element() -> Result<()> {
    let viewport = page();
    let mut stage = stage();
    stage.mount("hero", AnimationRequest::named("fadeInDown"))?;

    frames(&mut stage, &viewport, 60);
    assert_eq!(stage.phase("hero"), Some(Phase::Settled));

    stage.reset("hero")?;
    assert_eq!(stage.phase("hero"), Some(Phase::Idle));

    // the detector reports the element's current visibility again
    frames(&mut stage, &viewport, 1);
    assert_eq!(stage.phase("hero"), Some(Phase::Entering));
    Ok(())
}
