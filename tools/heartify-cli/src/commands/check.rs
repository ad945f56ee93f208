//! Check fonts and configuration.

use std::path::Path;

use heartify_common::config::{config_file_path, AppConfig};
use heartify_common::error::HeartifyResult;
use heartify_display_model::NamePair;
use heartify_render_engine::{ExportLayout, FontSelection, FontStore};

pub fn run(config: &AppConfig, explicit_config: Option<&Path>) -> HeartifyResult<()> {
    println!("Heartify System Check");
    println!("{}", "=".repeat(50));

    let config_path = explicit_config
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);
    if config_path.is_file() {
        println!("[OK] Config file: {}", config_path.display());
    } else {
        println!("[INFO] No config file at {} (using defaults)", config_path.display());
    }
    println!("     Output directory: {}", config.output_dir.display());

    let scale = match config.validate() {
        Ok(()) => {
            println!("[OK] Scale factor: {}x", config.export.scale_factor);
            Some(config.export.scale_factor)
        }
        Err(e) => {
            println!("[WARN] {e}; exports will fail");
            None
        }
    };

    let selection = FontSelection::from(&config.export);
    let (regular, bold) = selection.resolve();
    match &regular {
        Some(path) => println!("[OK] Regular font: {}", path.display()),
        None => println!("[WARN] Regular font: not found"),
    }
    match &bold {
        Some(path) => println!("[OK] Bold font: {}", path.display()),
        None => println!("[WARN] Bold font: not found (regular face will be used)"),
    }

    println!();
    match FontStore::discover(&selection) {
        Ok(fonts) => {
            println!("Fonts load correctly.");
            if let Some((width, height)) = scale.and_then(|s| sample_size(&fonts, s)) {
                println!("A sample export would be {width}x{height} pixels.");
                println!("Heartify is ready.");
            }
        }
        Err(e) => {
            println!("Fonts could not be loaded: {e}");
            println!("Set --font, the config file's export.font_path, or $HEARTIFY_FONT.");
        }
    }

    Ok(())
}

/// Bitmap size of a sample export, `None` when it cannot be represented.
fn sample_size(fonts: &FontStore, scale: u32) -> Option<(u32, u32)> {
    let sample = NamePair::new("Romeo", "Juliet").ok()?;
    ExportLayout::compose(&sample, fonts).pixel_size(scale)
}
