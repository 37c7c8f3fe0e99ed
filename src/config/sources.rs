use super::models::Config;
use config::{ConfigError, Environment, File, Map};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "TUBEMARK_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/tubemark.toml";
const ENV_PREFIX: &str = "TUBEMARK";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    load_from_sources(config_path)
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_with_env(config_path, None)
}

/// Like [`load_from_sources`], reading overrides from `env` instead of the
/// process environment when it is given
fn load_with_env(
    config_path: PathBuf,
    env: Option<Map<String, String>>,
) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // TUBEMARK__RETRY__MAX_RETRIES -> retry.max_retries
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(env),
    );

    let config = builder.build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.retry.max_retries, 3);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:9000"

[providers]
oembed_endpoint = "http://localhost:3000/oembed"
user_agent = "tubemark-test"

[timeouts]
request = "2s"
health_probe = 750

[retry]
max_retries = 5
base_delay = "100ms"
max_delay = "1s"
backoff_factor = 3.0
transient_only = true
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:9000");
        assert_eq!(config.providers.oembed_endpoint, "http://localhost:3000/oembed");
        assert_eq!(config.providers.user_agent.as_deref(), Some("tubemark-test"));
        assert_eq!(config.timeouts.request.as_millis(), 2000);
        assert_eq!(config.timeouts.health_probe.as_millis(), 750);
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.base_delay.as_millis(), 100);
        assert_eq!(config.retry.max_delay.as_millis(), 1000);
        assert_eq!(config.retry.backoff_factor, 3.0);
        assert!(config.retry.transient_only);
    }

    #[test]
    fn test_env_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        fs::write(
            &config_path,
            "[retry]\nmax_retries = 5\nbase_delay = \"100ms\"\n",
        )
        .unwrap();

        let env = Map::from_iter([
            ("TUBEMARK__RETRY__MAX_RETRIES".to_string(), "7".to_string()),
            (
                "TUBEMARK__PROVIDERS__OEMBED_ENDPOINT".to_string(),
                "http://localhost:4000/oembed".to_string(),
            ),
            ("TUBEMARK__TIMEOUTS__REQUEST".to_string(), "3s".to_string()),
            ("UNRELATED__RETRY__MAX_RETRIES".to_string(), "1".to_string()),
        ]);

        let config = load_with_env(config_path, Some(env)).unwrap();
        assert_eq!(config.retry.max_retries, 7);
        assert_eq!(config.retry.base_delay.as_millis(), 100);
        assert_eq!(config.providers.oembed_endpoint, "http://localhost:4000/oembed");
        assert_eq!(config.timeouts.request.as_millis(), 3000);
    }
}
