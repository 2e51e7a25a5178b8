//! Configuration system for devserve with multi-source loading.
//!
//! Merges settings from CLI args, environment variables, and config files.
//! Priority: CLI > Environment > File > Defaults

mod defaults;
mod loading;
mod tests;
mod validation;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

pub use defaults::*;
pub use loading::{ConfigOverrides, LiveReloadOverrides, CONFIG_FILE_NAME, ENV_PREFIX};
pub use validation::*;

/// devserve configuration - loaded from devserve.config.json, env or CLI args.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DevServeConfig {
    /// Display name shown in the startup banner
    #[serde(default = "default_name")]
    pub name: String,

    /// Content roots, searched in order for every request
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,

    /// Host the web server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the web server binds to
    #[schemars(range(min = 1))]
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path opened in the browser on start (e.g. "/")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,

    /// File served for directory requests
    #[serde(default = "default_index")]
    pub index: String,

    /// Log every request with the file it resolved to
    #[serde(default)]
    pub verbose: bool,

    /// Live reload settings. Absent means live reload is off.
    ///
    /// Accepts a watch path, a list of watch paths, or the full object.
    #[schemars(with = "Option<LiveReloadConfig>")]
    #[serde(
        default,
        deserialize_with = "deserialize_livereload",
        skip_serializing_if = "Option::is_none"
    )]
    pub livereload: Option<LiveReloadConfig>,
}

/// Live reload settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LiveReloadConfig {
    /// Paths watched for changes (required)
    #[serde(default)]
    pub watch: Vec<PathBuf>,

    /// Port of the live reload server
    #[schemars(range(min = 1))]
    #[serde(default = "default_livereload_port")]
    pub port: u16,

    /// Scheme of the reload client URL ("http" or "https"). The reload
    /// server itself speaks plain HTTP; use "https" behind a TLS proxy.
    #[serde(default = "default_livereload_protocol")]
    pub protocol: String,

    /// Explicit URL of the reload client script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// HTML template used for the build error overlay
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_page: Option<PathBuf>,

    /// Patterns excluded from watching. node_modules is always excluded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,

    /// Quiet period before a change is reported, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl LiveReloadConfig {
    /// Live reload watching `watch`, everything else defaulted.
    pub fn new(watch: Vec<PathBuf>) -> Self {
        Self {
            watch,
            port: default_livereload_port(),
            protocol: default_livereload_protocol(),
            src: None,
            error_page: None,
            exclusions: Vec::new(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LiveReloadSetting {
    Path(PathBuf),
    Paths(Vec<PathBuf>),
    Full(LiveReloadConfig),
}

fn deserialize_livereload<'de, D>(deserializer: D) -> Result<Option<LiveReloadConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let setting = Option::<LiveReloadSetting>::deserialize(deserializer)?;
    Ok(setting.map(|setting| match setting {
        LiveReloadSetting::Path(path) => LiveReloadConfig::new(vec![path]),
        LiveReloadSetting::Paths(paths) => LiveReloadConfig::new(paths),
        LiveReloadSetting::Full(config) => config,
    }))
}
