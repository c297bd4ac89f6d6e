use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::{DashboardError, Result};

/// Environment variable that overrides `[database] url`
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// Connection target, e.g. `postgres://...` or `sqlite://sales.db?mode=ro`
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

/// Default configuration embedded in the binary
///
/// Has no database url: the row source must always be configured.
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 8050
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Current working directory (for development)
/// 3. Falls back to embedded default config
pub fn load_config() -> Result<Config> {
    for config_path in candidate_paths() {
        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            let contents = std::fs::read_to_string(&config_path)?;
            return parse_config(&contents);
        }
    }

    tracing::info!("config.toml not found, using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            paths.push(exe_dir.join("config.toml"));
        }
    }
    paths.push(Path::new("config.toml").to_path_buf());
    paths
}

pub fn parse_config(contents: &str) -> Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Resolve the row-source connection target
///
/// `DATABASE_URL` wins over the config file. A missing or blank value is a
/// configuration error.
pub fn resolve_database_url(config: &Config, env_value: Option<String>) -> Result<String> {
    let candidate = env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.database.url.clone());

    match candidate {
        Some(url) if !url.trim().is_empty() => Ok(url.trim().to_string()),
        _ => Err(DashboardError::Configuration(format!(
            "{} environment variable is not set and config.toml has no [database] url",
            DATABASE_URL_ENV
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_missing_database_url_is_configuration_error() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        let err = resolve_database_url(&config, None).unwrap_err();
        assert!(matches!(err, DashboardError::Configuration(_)));
    }

    #[test]
    fn test_blank_database_url_is_configuration_error() {
        let config = parse_config("[database]\nurl = \"  \"\n").unwrap();
        let err = resolve_database_url(&config, Some(String::new())).unwrap_err();
        assert!(matches!(err, DashboardError::Configuration(_)));
    }

    #[test]
    fn test_env_overrides_config_file() {
        let config = parse_config("[database]\nurl = \"sqlite://file.db\"\n").unwrap();
        assert_eq!(
            resolve_database_url(&config, None).unwrap(),
            "sqlite://file.db"
        );
        assert_eq!(
            resolve_database_url(&config, Some("postgres://db/sales".to_string())).unwrap(),
            "postgres://db/sales"
        );
    }

    #[test]
    fn test_server_section_is_optional() {
        let config = parse_config("[database]\nurl = \"sqlite::memory:\"\n").unwrap();
        assert_eq!(config.server.port, 8050);
    }
}
