#[cfg(test)]
mod tests {
    use crate::cli::validation::{parse_index, parse_port};
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_parse_index_valid() {
        assert_eq!(parse_index("index.html"), Ok("index.html".to_string()));
        assert_eq!(parse_index("home.htm"), Ok("home.htm".to_string()));
    }

    #[test]
    fn test_parse_index_invalid() {
        assert!(parse_index("").is_err());
        assert!(parse_index("  ").is_err());
        assert!(parse_index("pages/index.html").is_err());
        assert!(parse_index("..").is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("8080"), Ok(8080));
        assert!(parse_port("0").is_err());
        assert!(parse_port("70000").is_err());
        assert!(parse_port("http").is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["devserve", "serve"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert!(args.roots.is_empty());
        assert!(args.port.is_none());
        assert!(args.open.is_none());
        assert!(args.watch.is_empty());
    }

    #[test]
    fn test_serve_full() {
        let cli = Cli::try_parse_from([
            "devserve",
            "--verbose",
            "serve",
            "public",
            "dist",
            "--port",
            "3000",
            "--watch",
            "public",
            "-w",
            "src",
            "--livereload-port",
            "35730",
            "--error-page",
            "overlay.html",
            "--exclude",
            "*.log",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.roots, vec![PathBuf::from("public"), PathBuf::from("dist")]);
        assert_eq!(args.port, Some(3000));
        assert_eq!(args.watch, vec![PathBuf::from("public"), PathBuf::from("src")]);
        assert_eq!(args.livereload_port, Some(35730));
        assert_eq!(args.error_page, Some(PathBuf::from("overlay.html")));
        assert_eq!(args.exclude, vec!["*.log".to_string()]);
    }

    #[test]
    fn test_livereload_protocol() {
        let cli =
            Cli::try_parse_from(["devserve", "serve", "--livereload-protocol", "https"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.livereload_protocol.as_deref(), Some("https"));

        assert!(Cli::try_parse_from(["devserve", "serve", "--livereload-protocol", "ws"]).is_err());
    }

    #[test]
    fn test_open_with_and_without_path() {
        let cli = Cli::try_parse_from(["devserve", "serve", "--open"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.open.as_deref(), Some("/"));

        let cli = Cli::try_parse_from(["devserve", "serve", "--open=/docs/"]).unwrap();
        let Command::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.open.as_deref(), Some("/docs/"));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["devserve", "-v", "-q", "serve"]).is_err());
    }

    #[test]
    fn test_check_schema_flag() {
        let cli = Cli::try_parse_from(["devserve", "check", "--schema"]).unwrap();
        let Command::Check(args) = cli.command else {
            panic!("expected check command");
        };
        assert!(args.schema);
        assert!(args.config.is_none());
    }
}
