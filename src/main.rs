use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use unveil_config::UnveilConfig;
use unveil_motion::VariantCatalog;
use unveil_scene::{RootMargin, Stage, Viewport};

mod page;
mod timeline;

use page::{Page, RequestDefaults};
use timeline::{ScrollPlan, Simulation};

#[derive(Parser, Debug)]
#[command(name = "unveil", version, about = "Replay the scroll reveals of a page layout")]
struct Cli {
    /// Page layout JSON.
    page: PathBuf,

    /// Config file. Defaults to ./unveil.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Scroll distance per frame in px.
    #[arg(long)]
    scroll_speed: Option<f32>,

    /// Scroll back to the top after reaching the bottom.
    #[arg(long, default_value_t = false)]
    scroll_back: bool,

    /// Print the timeline as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<UnveilConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = UnveilConfig::load_from_file(path)
                .with_context(|| format!("load config '{}'", path.display()))?;
            config.merge_with_env();
            config
        }
        None => UnveilConfig::load(),
    };
    if let Some(fps) = cli.fps {
        config.simulation.fps = fps;
    }
    if let Some(speed) = cli.scroll_speed {
        config.simulation.scroll_speed = speed;
    }
    if cli.scroll_back {
        config.simulation.scroll_back = true;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let _ = env_logger::try_init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let root_margin: RootMargin = config
        .observer
        .root_margin
        .parse()
        .with_context(|| format!("observer.root_margin '{}'", config.observer.root_margin))?;
    let defaults = RequestDefaults {
        threshold: config.observer.threshold,
        root_margin,
        trigger_once: config.observer.trigger_once,
    };

    let page = Page::from_path(&cli.page)?;
    let catalog = Arc::new(VariantCatalog::new(&config.timing));
    let mut stage = Stage::new(catalog);
    if config.diagnostics.warn_on_fallback {
        stage.set_diagnostic_hook(|diagnostic| tracing::warn!("{diagnostic}"));
    }
    page.mount(&mut stage, &defaults)?;

    let mut viewport = Viewport::new(
        config.simulation.viewport_width,
        config.simulation.viewport_height,
    );
    page.layout(&mut viewport);

    let plan = ScrollPlan {
        frame_ms: config.frame_ms(),
        scroll_speed: config.simulation.scroll_speed,
        scroll_back: config.simulation.scroll_back,
    };
    let timeline = Simulation::new(&mut stage, &mut viewport, plan).run();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&timeline)?);
        return Ok(());
    }

    for entry in &timeline.entries {
        println!("{entry}");
    }
    println!(
        "\n{} frames, {:.1}ms simulated",
        timeline.frames, timeline.duration_ms
    );
    for (element_id, phase) in &timeline.final_phases {
        println!("  {element_id:<20} {phase}");
    }
    Ok(())
}
