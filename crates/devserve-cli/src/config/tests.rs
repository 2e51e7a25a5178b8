#[cfg(test)]
mod tests {
    use crate::config::*;
    use serial_test::serial;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_config(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_serialization() {
        let config = DevServeConfig {
            livereload: Some(LiveReloadConfig {
                error_page: Some(PathBuf::from("error.html")),
                ..LiveReloadConfig::new(vec![PathBuf::from("src")])
            }),
            ..DevServeConfig::default()
        };

        let json_val = serde_json::to_value(&config).unwrap();
        assert_eq!(json_val["livereload"]["errorPage"], "error.html");
        assert_eq!(json_val["livereload"]["debounceMs"], 100);
        assert!(json_val["livereload"].get("error_page").is_none());

        // skip_serializing_if
        let json_val = serde_json::to_value(DevServeConfig::default()).unwrap();
        assert!(json_val.get("open").is_none());
        assert!(json_val.get("livereload").is_none());

        let back: DevServeConfig = serde_json::from_value(serde_json::to_value(&config).unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_livereload_shorthands() {
        let config: DevServeConfig = serde_json::from_str(r#"{"livereload": "src"}"#).unwrap();
        assert_eq!(
            config.livereload,
            Some(LiveReloadConfig::new(vec![PathBuf::from("src")]))
        );

        let config: DevServeConfig =
            serde_json::from_str(r#"{"livereload": ["src", "public"]}"#).unwrap();
        let livereload = config.livereload.unwrap();
        assert_eq!(livereload.watch.len(), 2);
        assert_eq!(livereload.port, 35729);

        let config: DevServeConfig =
            serde_json::from_str(r#"{"livereload": {"watch": ["src"], "port": 35800}}"#).unwrap();
        assert_eq!(config.livereload.unwrap().port, 35800);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(serde_json::from_str::<DevServeConfig>(r#"{"rootz": ["."]}"#).is_err());
    }

    #[test]
    fn test_validation() {
        let dir = TempDir::new().unwrap();
        let valid = DevServeConfig {
            roots: vec![dir.path().to_path_buf()],
            ..DevServeConfig::default()
        };
        assert!(valid.validate().is_ok());

        // No roots
        assert!(DevServeConfig {
            roots: vec![],
            ..valid.clone()
        }
        .validate()
        .is_err());

        // Missing root directory
        assert!(DevServeConfig {
            roots: vec![dir.path().join("missing")],
            ..valid.clone()
        }
        .validate()
        .is_err());

        // Port 0
        assert!(DevServeConfig {
            port: 0,
            ..valid.clone()
        }
        .validate()
        .is_err());

        // Index with a path separator
        assert!(DevServeConfig {
            index: "pages/index.html".to_string(),
            ..valid.clone()
        }
        .validate()
        .is_err());

        // Live reload without watch paths
        let err = DevServeConfig {
            livereload: Some(LiveReloadConfig::new(vec![])),
            ..valid.clone()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("livereload.watch"));

        // Live reload on the web server port
        assert!(DevServeConfig {
            port: 35729,
            livereload: Some(LiveReloadConfig::new(vec![dir.path().to_path_buf()])),
            ..valid.clone()
        }
        .validate()
        .is_err());

        // Missing error page
        assert!(DevServeConfig {
            livereload: Some(LiveReloadConfig {
                error_page: Some(dir.path().join("nope.html")),
                ..LiveReloadConfig::new(vec![dir.path().to_path_buf()])
            }),
            ..valid
        }
        .validate()
        .is_err());
    }

    #[test]
    #[serial]
    fn test_load_defaults() {
        let config = DevServeConfig::load(&ConfigOverrides::default(), None).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.index, "index.html");
        assert!(config.livereload.is_none());
    }

    #[test]
    #[serial]
    fn test_load_priority() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            dir.path(),
            r#"{"name": "docs", "port": 3000, "livereload": {"watch": ["src"], "port": 35800}}"#,
        );

        // File over defaults
        let config = DevServeConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap();
        assert_eq!(config.name, "docs");
        assert_eq!(config.port, 3000);

        // Env over file
        std::env::set_var("DEVSERVE_PORT", "4000");
        let config = DevServeConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap();
        assert_eq!(config.port, 4000);

        // CLI over env, nested values merge with the file
        let overrides = ConfigOverrides {
            port: Some(5000),
            livereload: LiveReloadOverrides {
                port: Some(35900),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = DevServeConfig::load(&overrides, Some(&path)).unwrap();
        std::env::remove_var("DEVSERVE_PORT");

        assert_eq!(config.port, 5000);
        assert_eq!(config.name, "docs");
        let livereload = config.livereload.unwrap();
        assert_eq!(livereload.port, 35900);
        assert_eq!(livereload.watch, vec![PathBuf::from("src")]);
    }

    #[test]
    #[serial]
    fn test_livereload_shorthand_merges_with_overrides() {
        let dir = TempDir::new().unwrap();
        let overrides = ConfigOverrides {
            livereload: LiveReloadOverrides {
                port: Some(40000),
                ..Default::default()
            },
            ..Default::default()
        };

        let path = write_config(dir.path(), r#"{"livereload": "."}"#);
        let livereload = DevServeConfig::load(&overrides, Some(&path))
            .unwrap()
            .livereload
            .unwrap();
        assert_eq!(livereload.watch, vec![PathBuf::from(".")]);
        assert_eq!(livereload.port, 40000);
        assert!(livereload.validate().is_ok());

        let path = write_config(dir.path(), r#"{"livereload": ["src", "public"]}"#);
        std::env::set_var("DEVSERVE_LIVERELOAD__PORT", "40001");
        let config = DevServeConfig::load(&ConfigOverrides::default(), Some(&path));
        std::env::remove_var("DEVSERVE_LIVERELOAD__PORT");

        let livereload = config.unwrap().livereload.unwrap();
        assert_eq!(
            livereload.watch,
            vec![PathBuf::from("src"), PathBuf::from("public")]
        );
        assert_eq!(livereload.port, 40001);
    }

    #[test]
    #[serial]
    fn test_livereload_protocol() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), r#"{"livereload": {"watch": ["src"]}}"#);

        let config = DevServeConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap();
        assert_eq!(config.livereload.unwrap().protocol, "http");

        let overrides = ConfigOverrides {
            livereload: LiveReloadOverrides {
                protocol: Some("https".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = DevServeConfig::load(&overrides, Some(&path)).unwrap();
        assert_eq!(config.livereload.unwrap().protocol, "https");

        let livereload = LiveReloadConfig {
            protocol: "ws".to_string(),
            ..LiveReloadConfig::new(vec![dir.path().to_path_buf()])
        };
        let err = livereload.validate().unwrap_err();
        assert!(err.to_string().contains("livereload.protocol"));
    }

    #[test]
    #[serial]
    fn test_load_nested_env() {
        std::env::set_var("DEVSERVE_LIVERELOAD__WATCH", "[src]");
        let config = DevServeConfig::load(&ConfigOverrides::default(), None).unwrap();
        std::env::remove_var("DEVSERVE_LIVERELOAD__WATCH");

        assert_eq!(
            config.livereload.unwrap().watch,
            vec![PathBuf::from("src")]
        );
    }

    #[test]
    #[serial]
    fn test_empty_overrides_keep_file_values() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), r#"{"roots": ["public", "dist"], "open": "/docs/"}"#);

        let config = DevServeConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap();
        assert_eq!(
            config.roots,
            vec![PathBuf::from("public"), PathBuf::from("dist")]
        );
        assert_eq!(config.open.as_deref(), Some("/docs/"));
    }

    #[test]
    #[serial]
    fn test_load_missing_file() {
        let err = DevServeConfig::load(
            &ConfigOverrides::default(),
            Some(Path::new("/definitely/not/here.json")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    #[serial]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), r#"{"port": "http"}"#);
        let err = DevServeConfig::load(&ConfigOverrides::default(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_schema_mentions_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(DevServeConfig)).unwrap();
        let text = schema.to_string();
        assert!(text.contains("livereload"));
        assert!(text.contains("errorPage"));
        assert!(text.contains("roots"));
    }
}
