//! Terminal UI: status lines and the startup banner.
//!
//! Status lines go to stderr so stdout stays clean for `devserve check`
//! output. Colors follow `NO_COLOR` / `FORCE_COLOR` and the terminal.
//!
//! ```no_run
//! use devserve_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Watching ./src");
//! ui::success("Server ready");
//! ```

mod banner;
mod messages;

pub use banner::{banner, BannerInfo};
pub use messages::{info, success, warning};

/// Decide once whether colored output is used, honouring `--no-color`.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && crate::logger::should_use_colors();
    owo_colors::set_override(enabled);
    console::set_colors_enabled_stderr(enabled);
    console::set_colors_enabled(enabled);
}
