//! Progress bar utilities.

use indicatif::{ProgressBar, ProgressStyle};

const DOWNLOAD_TEMPLATE: &str =
    "{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})";

/// Create a progress bar for a single file transfer.
pub fn create_download_bar(total: u64, name: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    // The template is a constant; fall back to the default style if it is ever rejected.
    let style = ProgressStyle::default_bar()
        .template(DOWNLOAD_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    bar.set_style(style);
    bar.set_message(name.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_bar_length_and_message() {
        let bar = create_download_bar(1024, "2024/01/IMG_1.MOV");
        assert_eq!(bar.length(), Some(1024));
        assert_eq!(bar.message(), "2024/01/IMG_1.MOV");
    }
}
