//! Centralized configuration management for agency-admin

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of rows per page, matching the first entry of the page size options
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the agency backend, e.g. `http://localhost:5000/api`
    pub api_url: String,
    /// Bearer token from a previous login (optional)
    pub api_token: Option<String>,
    /// Default page size for resource tables
    pub page_size: usize,
    /// Directory where spreadsheet exports are written
    pub export_dir: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "agency-admin/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            export_dir: PathBuf::from("./exports"),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let api_url = std::env::var("AGENCY_API_URL").unwrap_or(defaults.api_url);

        let api_token = std::env::var("AGENCY_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let export_dir = std::env::var("AGENCY_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let http = HttpConfig {
            timeout_seconds: parse_env_var("AGENCY_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: std::env::var("AGENCY_USER_AGENT").unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            api_url,
            api_token,
            page_size: parse_env_var("AGENCY_PAGE_SIZE")?.unwrap_or(defaults.page_size),
            export_dir,
            http,
        })
    }

    /// Base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "AGENCY_API_URL must start with http:// or https://, got '{}'",
                self.api_url
            ));
        }

        if self.page_size == 0 {
            return Err(anyhow::anyhow!("AGENCY_PAGE_SIZE must be greater than zero"));
        }

        std::fs::create_dir_all(&self.export_dir).with_context(|| {
            format!("Cannot create export directory: {}", self.export_dir.display())
        })?;

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.api_base(), "http://localhost:5000/api");
        assert_eq!(config.page_size, 15);
        assert_eq!(config.export_dir, PathBuf::from("./exports"));
        assert_eq!(config.http.timeout_seconds, 30);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_api_base_trims_trailing_slash() {
        let config = Config {
            api_url: "https://agency.example.com/api/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.api_base(), "https://agency.example.com/api");
    }

    #[test]
    fn test_config_validation() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            export_dir: temp_dir.path().join("exports"),
            ..Config::default()
        };
        config.validate().unwrap();
        assert!(config.export_dir.exists());
    }

    #[test]
    fn test_config_validation_rejects_bad_values() {
        let temp_dir = TempDir::new().unwrap();

        let bad_url = Config {
            api_url: "localhost:5000".to_string(),
            export_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let zero_page = Config {
            page_size: 0,
            export_dir: temp_dir.path().to_path_buf(),
            ..Config::default()
        };
        assert!(zero_page.validate().is_err());
    }
}
