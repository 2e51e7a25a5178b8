//! Check command implementation.
//!
//! Validates configuration without starting the server.

use crate::cli::CheckArgs;
use crate::config::{ConfigOverrides, DevServeConfig};
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// With `--schema` the JSON schema of `devserve.config.json` is printed.
/// Otherwise the layered configuration is loaded, validated and printed as
/// JSON on stdout.
///
/// # Errors
///
/// Returns errors for unreadable or invalid configuration.
pub async fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        let schema = schemars::schema_for!(DevServeConfig);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        return Ok(());
    }

    ui::info("Checking configuration...");

    let config = DevServeConfig::load(&ConfigOverrides::default(), args.config.as_deref())?;
    config.validate()?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    if config.livereload.is_none() {
        ui::warning("Live reload is off; set livereload.watch to enable it");
    }
    ui::success("Configuration is valid!");
    Ok(())
}
