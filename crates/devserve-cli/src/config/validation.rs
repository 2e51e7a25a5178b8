use crate::config::{DevServeConfig, LiveReloadConfig};
use crate::error::{ConfigError, Result};

/// Schemes accepted for the reload client URL.
pub const LIVERELOAD_PROTOCOLS: &[&str] = &["http", "https"];

/// Validate the index filename: a plain, non-empty file name.
pub fn validate_index(index: &str) -> Result<()> {
    crate::cli::parse_index(index).map(|_| ()).map_err(|hint| {
        ConfigError::InvalidValue {
            field: "index".to_string(),
            value: index.to_string(),
            hint,
        }
        .into()
    })
}

fn validate_port(field: &str, port: u16) -> Result<()> {
    if port == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: "0".to_string(),
            hint: "Use a port between 1 and 65535".to_string(),
        }
        .into());
    }
    Ok(())
}

impl DevServeConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            return Err(ConfigError::MissingField {
                field: "roots".to_string(),
                hint: "Provide at least one directory to serve".to_string(),
            }
            .into());
        }

        for root in &self.roots {
            if !root.is_dir() {
                return Err(ConfigError::InvalidValue {
                    field: "roots".to_string(),
                    value: root.display().to_string(),
                    hint: "Each root must be an existing directory".to_string(),
                }
                .into());
            }
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "host".to_string(),
                hint: "Use 127.0.0.1 to serve locally".to_string(),
            }
            .into());
        }

        validate_port("port", self.port)?;
        validate_index(&self.index)?;

        if let Some(livereload) = &self.livereload {
            livereload.validate()?;
            if livereload.port == self.port {
                return Err(ConfigError::InvalidValue {
                    field: "livereload.port".to_string(),
                    value: livereload.port.to_string(),
                    hint: "The live reload server needs a port of its own".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}

impl LiveReloadConfig {
    /// Validate the live reload section on its own.
    pub fn validate(&self) -> Result<()> {
        if self.watch.is_empty() {
            return Err(ConfigError::MissingField {
                field: "livereload.watch".to_string(),
                hint: "Live reload needs at least one path to watch (--watch PATH)".to_string(),
            }
            .into());
        }

        validate_port("livereload.port", self.port)?;

        if !LIVERELOAD_PROTOCOLS.contains(&self.protocol.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "livereload.protocol".to_string(),
                value: self.protocol.clone(),
                hint: "Use \"http\" or \"https\"".to_string(),
            }
            .into());
        }

        if let Some(page) = &self.error_page {
            if !page.is_file() {
                return Err(ConfigError::InvalidValue {
                    field: "livereload.errorPage".to_string(),
                    value: page.display().to_string(),
                    hint: "The error page must be an existing HTML file".to_string(),
                }
                .into());
            }
        }

        if let Some(src) = &self.src {
            if src.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "livereload.src".to_string(),
                    value: src.clone(),
                    hint: "Drop the option to use the bundled client".to_string(),
                }
                .into());
            }
        }

        Ok(())
    }
}
