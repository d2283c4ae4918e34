//! Console output utilities.

use std::path::Path;

use console::style;

use crate::config::{AssetSize, Config};

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     Photolib Downloader                               ║
║     Stable, collision-free photo library mirroring    ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(config: &Config, download_dir: &Path) {
    let naming = &config.naming;
    let manifest = config
        .download
        .manifest
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Manifest: {}", manifest);
    println!("  Directory: {}", download_dir.display());
    println!("  Folders: {} ({})", naming.folder_structure, naming.time_zone);
    println!("  File match policy: {}", naming.file_match_policy);
    if naming.skip_live_photos {
        println!("  Live photo videos: skipped");
    } else {
        println!("  Live photo videos: {}", naming.live_photo_name_policy);
    }
    if naming.size != AssetSize::Original || naming.live_photo_size != AssetSize::Original {
        println!(
            "  Sizes: {} (live photos: {}){}",
            naming.size,
            naming.live_photo_size,
            if naming.force_size { ", forced" } else { "" }
        );
    }
    println!("  Unicode: {}", naming.unicode);
    if config.download.dry_run {
        println!("  {}", style("Dry run: nothing will be downloaded").yellow());
    }
    if let Some(limit) = config.download.until_found {
        println!("  Stop after {} consecutive existing assets", limit);
    }
    println!();
}
