//! Startup banner.

use console::style;
use std::path::PathBuf;

const RULE_WIDTH: usize = 101;

/// What the banner reports about a running server.
#[derive(Debug, Clone)]
pub struct BannerInfo {
    /// Server display name
    pub name: String,
    /// Base URL of the web server
    pub url: String,
    /// Content roots, in lookup order
    pub roots: Vec<PathBuf>,
    /// Whether live reload is enabled
    pub livereload: bool,
}

/// Render the banner printed when the server starts.
pub fn banner(info: &BannerInfo) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let roots = info
        .roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(",");
    let reload = if info.livereload { "ON" } else { "OFF" };

    format!(
        "{rule}\n  {}\n  Serving {} -> {}\n  Live Reload: {}\n{rule}",
        style(&info.name).green().bold(),
        style(&info.url).green().bold(),
        roots,
        style(reload).green().bold(),
    )
}
