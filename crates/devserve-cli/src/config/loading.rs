use crate::cli::ServeArgs;
use crate::config::{
    default_host, default_index, default_name, default_port, default_roots, DevServeConfig,
};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Json, Serialized},
    value::Value,
    Figment,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "devserve.config.json";

/// Prefix of configuration environment variables (`DEVSERVE_PORT`,
/// `DEVSERVE_LIVERELOAD__PORT`, ...).
pub const ENV_PREFIX: &str = "DEVSERVE_";

/// Values given on the command line. Unset values are not serialized, so they
/// never shadow lower-priority sources.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub verbose: bool,
    #[serde(skip_serializing_if = "LiveReloadOverrides::is_empty")]
    pub livereload: LiveReloadOverrides,
}

/// Command-line values for the `livereload` section.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveReloadOverrides {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub watch: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_page: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclusions: Vec<String>,
}

impl LiveReloadOverrides {
    pub fn is_empty(&self) -> bool {
        self.watch.is_empty()
            && self.port.is_none()
            && self.protocol.is_none()
            && self.src.is_none()
            && self.error_page.is_none()
            && self.exclusions.is_empty()
    }
}

impl From<&ServeArgs> for ConfigOverrides {
    fn from(args: &ServeArgs) -> Self {
        Self {
            name: args.name.clone(),
            roots: args.roots.clone(),
            host: args.host.clone(),
            port: args.port,
            open: args.open.clone(),
            index: args.index.clone(),
            verbose: false,
            livereload: LiveReloadOverrides {
                watch: args.watch.clone(),
                port: args.livereload_port,
                protocol: args.livereload_protocol.clone(),
                src: args.livereload_src.clone(),
                error_page: args.error_page.clone(),
                exclusions: args.exclude.clone(),
            },
        }
    }
}

impl Default for DevServeConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            roots: default_roots(),
            host: default_host(),
            port: default_port(),
            open: None,
            index: default_index(),
            verbose: false,
            livereload: None,
        }
    }
}

impl DevServeConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI args > environment variables > config file > defaults
    pub fn load(overrides: &ConfigOverrides, config_path: Option<&Path>) -> Result<Self> {
        Self::figment(overrides, config_path)?
            .extract()
            .map_err(|e| ConfigError::Extract(e.to_string()).into())
    }

    /// Build the layered figment without extracting it.
    pub fn figment(overrides: &ConfigOverrides, config_path: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            tracing::debug!("Loading config from {}", path.display());
            figment = expand_livereload_shorthand(figment.merge(Json::file(path)));
        }

        // DEVSERVE_PORT, DEVSERVE_LIVERELOAD__PORT, ...
        let env = Env::prefixed(ENV_PREFIX).split("__");
        figment = expand_livereload_shorthand(figment.merge(env));

        Ok(figment.merge(Serialized::defaults(overrides)))
    }
}

/// Rewrite `"livereload": "src"` or `"livereload": ["src", ...]` into
/// `{ "watch": [...] }`. A later dict layer replaces a string or array value
/// outright, so the shorthand must be an object before overrides land on it.
fn expand_livereload_shorthand(figment: Figment) -> Figment {
    let watch = match figment.find_value("livereload") {
        Ok(path @ Value::String(..)) => vec![path],
        Ok(Value::Array(_, paths)) => paths,
        _ => return figment,
    };
    figment.merge(Serialized::default("livereload.watch", watch))
}
