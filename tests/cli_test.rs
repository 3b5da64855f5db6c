//! CLI Command Tests
//!
//! Tests for CLI commands with a fake catalog.
//! Covers argument parsing, exit codes and input validation.

mod common;

// =============================================================================
// CLI Argument Parsing Tests
// =============================================================================

mod cli_parsing {
    use clap::{CommandFactory, Parser};
    use tubetui::cli::{Cli, Command};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_alias() {
        let cli = Cli::parse_from(["tubetui", "s", "lofi hip hop"]);
        match cli.command {
            Some(Command::Search(cmd)) => {
                assert_eq!(cmd.query, "lofi hip hop");
                assert_eq!(cmd.limit, None);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_resolve_alias() {
        let cli = Cli::parse_from(["tubetui", "r", "dQw4w9WgXcQ", "-j"]);
        assert!(cli.json);
        match cli.command {
            Some(Command::Resolve(cmd)) => assert_eq!(cmd.id, "dQw4w9WgXcQ"),
            _ => panic!("Expected Resolve command"),
        }
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["tubetui", "search"]).is_err());
    }

    #[test]
    fn test_limit_must_be_numeric() {
        assert!(Cli::try_parse_from(["tubetui", "search", "lofi", "--limit", "many"]).is_err());
    }
}

// =============================================================================
// Command Handler Tests
// =============================================================================

mod handlers {
    use super::common::{video_id, FakeCatalog};
    use futures::future::{BoxFuture, FutureExt};
    use tubetui::api::{CatalogError, CatalogService};
    use tubetui::cli::{ConfigCmd, ExitCode, Output, ResolveCmd, SearchCmd};
    use tubetui::commands::{config_cmd, resolve_cmd, search_cmd};
    use tubetui::config::Config;
    use tubetui::models::{CatalogEntry, StreamInfo};

    fn quiet_json() -> Output {
        Output {
            json: true,
            quiet: true,
        }
    }

    fn search(query: &str, limit: Option<usize>) -> SearchCmd {
        SearchCmd {
            query: query.to_string(),
            limit,
        }
    }

    /// Catalog whose every call fails as if yt-dlp were missing
    struct MissingTool;

    impl CatalogService for MissingTool {
        fn search<'a>(
            &'a self,
            _query: &'a str,
            _limit: usize,
        ) -> BoxFuture<'a, Result<Vec<CatalogEntry>, CatalogError>> {
            async { Err(CatalogError::NotInstalled("yt-dlp".to_string())) }.boxed()
        }

        fn resolve_stream<'a>(
            &'a self,
            _id: &'a str,
        ) -> BoxFuture<'a, Result<StreamInfo, CatalogError>> {
            async { Err(CatalogError::NotInstalled("yt-dlp".to_string())) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_search_success() {
        let catalog = FakeCatalog::with_entries(20);
        let code = search_cmd(search("lofi", None), &catalog, &Config::default(), &quiet_json()).await;
        assert_eq!(code, ExitCode::Success);
        assert_eq!(catalog.queries.lock().unwrap()[0], ("lofi".to_string(), 15));
    }

    #[tokio::test]
    async fn test_search_limit_flag_overrides_config() {
        let catalog = FakeCatalog::with_entries(20);
        let config = Config {
            search_limit: Some(8),
            ..Config::default()
        };

        search_cmd(search("lofi", Some(3)), &catalog, &config, &quiet_json()).await;
        search_cmd(search("lofi", None), &catalog, &config, &quiet_json()).await;

        let queries = catalog.queries.lock().unwrap();
        assert_eq!(queries[0].1, 3);
        assert_eq!(queries[1].1, 8);
    }

    #[tokio::test]
    async fn test_search_no_results() {
        let catalog = FakeCatalog::with_entries(0);
        let code = search_cmd(search("zzz", None), &catalog, &Config::default(), &quiet_json()).await;
        assert_eq!(code, ExitCode::NoResults);
    }

    #[tokio::test]
    async fn test_search_blank_query() {
        let catalog = FakeCatalog::with_entries(3);
        let code = search_cmd(search("   ", None), &catalog, &Config::default(), &quiet_json()).await;
        assert_eq!(code, ExitCode::InvalidArgs);
        assert_eq!(catalog.search_count(), 0);
    }

    #[tokio::test]
    async fn test_search_failure_exit_codes() {
        let code = search_cmd(
            search("lofi", None),
            &FakeCatalog::failing("HTTP Error 429"),
            &Config::default(),
            &quiet_json(),
        )
        .await;
        assert_eq!(code, ExitCode::NetworkError);

        let code = search_cmd(search("lofi", None), &MissingTool, &Config::default(), &quiet_json()).await;
        assert_eq!(code, ExitCode::ToolNotFound);
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let catalog = FakeCatalog::with_entries(1);
        let cmd = ResolveCmd { id: video_id(0) };
        assert_eq!(resolve_cmd(cmd, &catalog, &quiet_json()).await, ExitCode::Success);
    }

    #[tokio::test]
    async fn test_resolve_invalid_id_skips_catalog() {
        let catalog = FakeCatalog::with_entries(1);
        let cmd = ResolveCmd { id: "not-an-id".to_string() };
        assert_eq!(resolve_cmd(cmd, &catalog, &quiet_json()).await, ExitCode::InvalidArgs);
        assert_eq!(catalog.resolves.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_failure() {
        let catalog = FakeCatalog::default();
        let cmd = ResolveCmd { id: video_id(7) };
        assert_eq!(resolve_cmd(cmd, &catalog, &quiet_json()).await, ExitCode::NetworkError);

        let cmd = ResolveCmd { id: video_id(7) };
        assert_eq!(resolve_cmd(cmd, &MissingTool, &quiet_json()).await, ExitCode::ToolNotFound);
    }

    #[test]
    fn test_config_init_writes_file() {
        let dir = std::env::temp_dir().join(format!("tubetui-cli-{}", uuid::Uuid::new_v4().simple()));
        let path = dir.join("config.toml");
        let config = Config {
            volume_step: Some(7),
            ..Config::default()
        };

        let code = config_cmd(ConfigCmd { init: true }, &config, Some(&path), &quiet_json());
        assert_eq!(code, ExitCode::Success);

        let written = Config::load_from(&path);
        assert_eq!(written.volume_step, Some(7));
        assert_eq!(written.search_limit, Some(15));
        assert_eq!(written.initial_volume, Some(80));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_config_show_does_not_write() {
        let path = std::env::temp_dir()
            .join(format!("tubetui-cli-{}", uuid::Uuid::new_v4().simple()))
            .join("config.toml");

        let code = config_cmd(ConfigCmd { init: false }, &Config::default(), Some(&path), &quiet_json());
        assert_eq!(code, ExitCode::Success);
        assert!(!path.exists());
    }
}
