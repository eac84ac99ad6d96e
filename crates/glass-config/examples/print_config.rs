/// Print the effective glass configuration (glass.toml + GLASS_* overrides)
///
/// Run with: cargo run -p glass-config --example print_config

fn main() {
    let config = glass_config::GlassConfig::load();

    println!("=== Glass Configuration ===\n");

    println!("Glass:");
    println!("  Refraction: {}", config.glass.refraction);
    println!("  Depth: {}", config.glass.depth);
    println!("  Frost: {}", config.glass.frost);
    println!("  Dispersion: {}", config.glass.dispersion);
    println!();

    println!("Capture:");
    println!("  Scale: {}", config.capture.scale);
    println!("  Image Timeout: {}ms", config.capture.image_timeout_ms);
    println!("  Ignore Attribute: {}", config.capture.ignore_attribute);
    println!("  Ignore Tags: {:?}", config.capture.ignore_tags);
    println!();

    println!("Presentation:");
    println!("  Reduced Motion: {}", config.presentation.reduced_motion);
    println!("  Border Radius: {}", config.presentation.border_radius);
    println!("  Plane Blur: {}", config.scene.plane.blur);
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
