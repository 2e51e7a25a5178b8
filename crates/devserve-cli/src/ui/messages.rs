//! Status message functions for terminal output.

use owo_colors::{OwoColorize, Stream::Stderr, Style};

fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stderr, |t| t.style(style)).to_string()
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", paint("✓", Style::new().green().bold()), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", paint("ℹ", Style::new().blue().bold()), message);
}

/// Print a warning message to stderr.
///
/// ```no_run
/// devserve_cli::ui::warning("Port 8080 is busy, using port 8081 instead");
/// ```
pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        paint("⚠", Style::new().yellow().bold()),
        paint(message, Style::new().yellow())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_without_colors_is_plain() {
        owo_colors::set_override(false);
        assert_eq!(paint("✓", Style::new().green()), "✓");
        owo_colors::unset_override();
    }

    #[test]
    fn test_status_messages() {
        success("Success message");
        info("Info message");
        warning("Warning message");
    }
}
