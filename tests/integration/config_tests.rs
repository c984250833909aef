//! Configuration integration tests
//!
//! Loads configuration files from disk and checks validation and the
//! values the rest of the system reads from them.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;
    use storefront_monitor::config::{Config, LogFormat};
    use storefront_monitor::server::{ServerBuilder, load_config};
    use storefront_monitor::utils::error::MonitorError;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_full_config_file() {
        let file = write_config(
            r#"
server:
  host: "0.0.0.0"
  port: 8088
  workers: 4
  shutdown_timeout: 10

monitoring:
  enabled: true
  sample_rate: 0.5
  retention_secs: 7200
  sweep_interval_secs: 60
  report_window_secs: 900
  alerts:
    response_time_ms: 800
    memory_ratio: 0.9
    error_rate: 0.02
    cpu_percent: 75
    cpu_rule_enabled: true
    cooldown_secs: 120

edge:
  enabled: true
  cache_ttl_secs: 600
  rate_limit:
    enabled: true
    max_requests: 50
    window_secs: 30
  image:
    max_dimension: 2048
    default_quality: 70
    fetch_timeout_secs: 5

logging:
  level: warn
  format: json
"#,
        );

        let config = load_config(Some(file.path().to_path_buf())).await.unwrap();

        assert_eq!(config.server().address(), "0.0.0.0:8088");
        assert_eq!(config.server().worker_count(), 4);
        assert_eq!(config.monitoring().retention(), Duration::from_secs(7200));
        assert_eq!(config.monitoring().sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.monitoring().report_window(), Duration::from_secs(900));
        assert_eq!(config.monitoring().alerts.cooldown(), Duration::from_secs(120));
        assert!(config.monitoring().alerts.cpu_rule_enabled);
        assert_eq!(config.edge().cache_ttl(), Duration::from_secs(600));
        assert_eq!(config.edge().rate_limit.window(), Duration::from_secs(30));
        assert_eq!(config.edge().image.max_dimension, 2048);
        assert_eq!(config.edge().image.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.logging().format, LogFormat::Json);
    }

    #[tokio::test]
    async fn test_invalid_values_rejected() {
        for (yaml, needle) in [
            ("monitoring:\n  sample_rate: -0.5\n", "Sample rate"),
            ("edge:\n  rate_limit:\n    max_requests: 0\n", "max_requests"),
            ("edge:\n  image:\n    default_quality: 0\n", "quality"),
            (
                "monitoring:\n  alerts:\n    response_time_ms: .nan\n",
                "response time",
            ),
        ] {
            let file = write_config(yaml);
            let err = Config::from_file(file.path()).await.unwrap_err();
            match err {
                MonitorError::Config(msg) => assert!(
                    msg.to_lowercase().contains(&needle.to_lowercase()),
                    "{} not in {}",
                    needle,
                    msg
                ),
                other => panic!("unexpected error: {}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_yaml_rejected() {
        let file = write_config("server: [not, a, map");
        let result = Config::from_file(file.path()).await;
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    #[tokio::test]
    async fn test_builder_from_loaded_config() {
        let file = write_config("server:\n  port: 9191\nedge:\n  enabled: false\n");
        let config = load_config(Some(file.path().to_path_buf())).await.unwrap();

        let server = ServerBuilder::new().with_config(config).build().unwrap();
        assert_eq!(server.config().port, 9191);
        assert!(!server.state().edge.config.enabled);
        assert_eq!(
            server.state().sweeper.target_names(),
            vec!["monitoring", "edge_cache", "edge_rate_limit"]
        );
    }
}
