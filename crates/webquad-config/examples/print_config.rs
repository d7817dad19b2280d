/// Example program to print the loaded configuration
///
/// Run with: cargo run -p webquad-config --example print_config

fn main() {
    let config = webquad_config::WebQuadConfig::load();

    println!("=== WebQuad Configuration ===\n");

    println!("Browser Settings:");
    println!("  Frame Rate: {}", config.browser.windowless_frame_rate);
    println!("  Locales Dir: {:?}", config.browser.locales_dir);
    println!("  Resources Dir: {:?}", config.browser.resources_dir);
    println!("  Subprocess Path: {:?}", config.browser.subprocess_path);
    println!("  Disable GPU Compositing: {}", config.browser.disable_gpu_compositing);
    println!(
        "  Begin Frame Scheduling: {}",
        config.browser.enable_begin_frame_scheduling
    );
    println!("  Transparent Painting: {}", config.browser.transparent_painting);
    println!();

    println!("View Settings:");
    println!("  UI Scale: {}", config.view.ui_scale);
    println!();

    println!("Input Settings:");
    println!("  Mouse Routing: {}", config.input.mouse_routing);
    println!();

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
