//! CLI configuration
//!
//! Settings come from command-line flags (which clap already merged with
//! environment variables) and an optional TOML file. Flags win over the file.
//!
//! ```toml
//! token = "..."
//! api_url = "https://circleci.com"
//! request_timeout = "30s"
//! ```

use anyhow::{Context, Result, bail};
use circle_client::{DEFAULT_BASE_URL, HttpCircleClient};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::parse::parse_duration;

const CONFIG_FILE_NAME: &str = ".circleci-helper.toml";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved CLI configuration
#[derive(Clone)]
pub struct Config {
    /// CircleCI API token
    pub token: String,

    /// CircleCI host, without the `/api/...` part
    pub api_url: String,

    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Values read from the config file; everything is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    token: Option<String>,
    api_url: Option<String>,
    request_timeout: Option<String>,
}

impl Config {
    /// Loads the config file and applies flag overrides
    ///
    /// # Arguments
    /// * `path` - Explicit config file; must exist when given
    /// * `token` - `--token` / `CIRCLECI_TOKEN`
    /// * `api_url` - `--api-url` / `CIRCLECI_API_URL`
    pub fn load(path: Option<&Path>, token: Option<String>, api_url: Option<String>) -> Result<Self> {
        let file = match path {
            Some(path) => read_file(path)?,
            None => match default_path() {
                Some(path) if path.exists() => read_file(&path)?,
                _ => FileConfig::default(),
            },
        };

        let request_timeout = match file.request_timeout.as_deref() {
            Some(value) => parse_duration(value)
                .map_err(anyhow::Error::msg)
                .context("Invalid request_timeout in config file")?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            token: token.or(file.token).unwrap_or_default(),
            api_url: api_url
                .or(file.api_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout,
        })
    }

    /// Checks required values before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            bail!(
                "CircleCI token must be specified (--token, CIRCLECI_TOKEN or `token` in {})",
                CONFIG_FILE_NAME
            );
        }
        if self.request_timeout.is_zero() {
            bail!("request_timeout must be greater than zero");
        }
        Ok(())
    }

    /// Builds the HTTP client for this configuration
    pub fn client(&self) -> Result<HttpCircleClient> {
        self.validate()?;

        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        HttpCircleClient::with_client(&self.api_url, self.token.clone(), http)
            .with_context(|| format!("Invalid CircleCI API URL '{}'", self.api_url))
    }
}

/// `$HOME/.circleci-helper.toml`, if a home directory is known
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let file = toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    debug!("Using config file {}", path.display());
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file() {
        let file = config_file(
            r#"
            token = "file-token"
            api_url = "https://circleci.example.com"
            request_timeout = "1m"
            "#,
        );

        let config = Config::load(Some(file.path()), None, None).unwrap();
        assert_eq!(config.token, "file-token");
        assert_eq!(config.api_url, "https://circleci.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_file() {
        let file = config_file(r#"token = "file-token""#);

        let config = Config::load(
            Some(file.path()),
            Some("flag-token".to_string()),
            Some("http://localhost:9999".to_string()),
        )
        .unwrap();
        assert_eq!(config.token, "flag-token");
        assert_eq!(config.api_url, "http://localhost:9999");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        assert!(Config::load(Some(&missing), None, None).is_err());

        let file = config_file("");
        let config = Config::load(Some(file.path()), None, None).unwrap();
        assert_eq!(config.api_url, DEFAULT_BASE_URL);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_file() {
        let file = config_file("token = ");
        assert!(Config::load(Some(file.path()), None, None).is_err());

        let file = config_file(r#"tokn = "typo""#);
        assert!(Config::load(Some(file.path()), None, None).is_err());

        let file = config_file(r#"request_timeout = "soon""#);
        assert!(Config::load(Some(file.path()), None, None).is_err());
    }

    #[test]
    fn test_client_requires_valid_url() {
        let file = config_file(r#"api_url = "not a url""#);
        let config = Config::load(Some(file.path()), Some("token".to_string()), None).unwrap();
        assert!(config.client().is_err());

        let config = Config {
            api_url: "https://circleci.com".to_string(),
            ..config
        };
        assert!(config.client().is_ok());
    }

    #[test]
    fn test_debug_hides_token() {
        let config = Config {
            token: "super-secret".to_string(),
            api_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
