//! Statistics reporting.

use console::style;

use crate::download::RunState;

/// Print statistics for a finished (or interrupted) run.
pub fn print_run_stats(state: &RunState) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Run Statistics:").bold());
    println!("  Records read: {}", state.records);
    if state.planned > 0 {
        println!("  Would download: {}", state.planned);
    }
    println!(
        "  Downloaded: {} ({} files, {})",
        state.downloaded,
        state.files_downloaded,
        format_bytes(state.bytes_downloaded)
    );
    println!("  Skipped:    {} (already present)", state.skipped);
    if state.legacy > 0 {
        println!("  Legacy:     {} (under an older name)", state.legacy);
    }
    if state.duplicates > 0 {
        println!("  Duplicates: {}", state.duplicates);
    }
    if state.failed > 0 {
        println!("  Failed:     {}", style(state.failed).red());
    }
    if state.stopped_early {
        println!(
            "  {}",
            style("Stopped early after consecutive existing assets").yellow()
        );
    }
    if state.cancelled {
        println!("  {}", style("Run was cancelled").yellow());
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Human readable byte count.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
