/// Example program to print the loaded configuration
///
/// Run with: cargo run -p unveil-config --example print_config

fn main() {
    let config = unveil_config::UnveilConfig::load();

    println!("=== Unveil Configuration ===\n");

    println!("Observer Settings:");
    println!("  Threshold: {}", config.observer.threshold);
    println!("  Root Margin: {}", config.observer.root_margin);
    println!("  Trigger Once: {}", config.observer.trigger_once);
    println!();

    println!("Timing Presets:");
    println!("  Standard: {:?}", config.timing.standard);
    println!("  Cinematic: {:?}", config.timing.cinematic);
    println!("  Dramatic: {:?}", config.timing.dramatic);
    println!("  Hero: {:?}", config.timing.hero);
    println!("  Stagger: {:?}", config.timing.stagger);
    println!();

    println!("Simulation Settings:");
    println!(
        "  Viewport: {}x{}",
        config.simulation.viewport_width, config.simulation.viewport_height
    );
    println!("  FPS: {}", config.simulation.fps);
    println!("  Scroll Speed: {}px/tick", config.simulation.scroll_speed);
    println!();

    if let Err(e) = config.validate() {
        eprintln!("Configuration is invalid: {}", e);
    }

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
