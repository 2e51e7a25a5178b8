//! Miette diagnostic conversion for CLI errors.

use crate::error::{CliError, ConfigError};
use devserve_inject::InjectError;
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Inject(InjectError::TemplateLoad { path, source }) => miette::miette!(
            help = "Set livereload.errorPage to an existing file, or remove it to use the bundled overlay",
            "Failed to load error overlay template {}: {}",
            path.display(),
            source
        ),
        CliError::Server(msg) => miette::miette!(
            help = "Another process may be using the port; try --port or --livereload-port",
            "Server error: {}",
            msg
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert ConfigError to miette Report
pub fn config_error_to_miette(err: ConfigError) -> Report {
    match err {
        ConfigError::MissingField { field, hint } => {
            miette::miette!(help = hint, "Missing required field: {}", field)
        }
        ConfigError::InvalidValue { field, value, hint } => {
            miette::miette!(help = hint, "Invalid value for '{}': {}", field, value)
        }
        _ => miette::miette!("Configuration error: {}", err),
    }
}
