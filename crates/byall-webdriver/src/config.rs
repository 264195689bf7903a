use crate::wait::WaitOptions;
use byall_core::QuotePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ByAllConfig {
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub webdriver: WebDriverConfig,
}

impl ByAllConfig {
    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, webdriver_url: Option<&Url>, quote_policy: Option<QuotePolicy>) {
        if let Some(url) = webdriver_url {
            self.webdriver.url = url.to_string();
        }
        if let Some(policy) = quote_policy {
            self.locator.quote_policy = policy;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocatorConfig {
    #[serde(default)]
    pub quote_policy: QuotePolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebDriverConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// Extra W3C capabilities merged into the new-session request.
    #[serde(default)]
    pub capabilities: serde_json::Map<String, serde_json::Value>,
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl WebDriverConfig {
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(self.wait_timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            capabilities: serde_json::Map::new(),
            wait_timeout_ms: default_wait_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    10000
}

fn default_poll_interval_ms() -> u64 {
    250
}

/// A loaded configuration and the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ByAllConfig,
    pub source: Option<PathBuf>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// `./byall.yaml`, then `~/.byall/config.yaml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("byall.yaml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".byall").join("config.yaml"));
        }
        paths
    }

    /// An explicit path must exist. Without one the search paths are tried
    /// in order, falling back to defaults when none is present.
    pub async fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        match explicit {
            Some(path) => Ok(LoadedConfig {
                config: Self::load_from(path).await?,
                source: Some(path.to_path_buf()),
            }),
            None => Self::load_first(&Self::search_paths()).await,
        }
    }

    pub async fn load_first(candidates: &[PathBuf]) -> Result<LoadedConfig, ConfigError> {
        for path in candidates {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Ok(LoadedConfig {
                    config: Self::load_from(path).await?,
                    source: Some(path.clone()),
                });
            }
            debug!("No config at {}", path.display());
        }
        Ok(LoadedConfig {
            config: ByAllConfig::default(),
            source: None,
        })
    }

    pub async fn load_from(path: &Path) -> Result<ByAllConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ByAllConfig::default();
        assert_eq!(config.locator.quote_policy, QuotePolicy::Verbatim);
        assert_eq!(config.webdriver.url, "http://localhost:4444");
        assert_eq!(
            config.webdriver.wait_options(),
            WaitOptions {
                timeout: Duration::from_secs(10),
                poll_interval: Duration::from_millis(250),
            }
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ByAllConfig = serde_yaml::from_str("locator:\n  quote_policy: escape\n").unwrap();
        assert_eq!(config.locator.quote_policy, QuotePolicy::Escape);
        assert_eq!(config.webdriver.wait_timeout_ms, 10000);
        assert!(config.webdriver.capabilities.is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "webdriver:\n  url: http://127.0.0.1:9515\n  wait_timeout_ms: 120000\n  capabilities:\n    browserName: chrome"
        )
        .unwrap();

        let config = ConfigLoader::load_from(file.path()).await.unwrap();
        assert_eq!(config.webdriver.url, "http://127.0.0.1:9515");
        assert_eq!(config.webdriver.wait_timeout_ms, 120000);
        assert_eq!(config.webdriver.poll_interval_ms, 250);
        assert_eq!(
            config.webdriver.capabilities.get("browserName"),
            Some(&serde_json::json!("chrome"))
        );
    }

    #[tokio::test]
    async fn test_load_from_rejects_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "locator:\n  quote_policy: sometimes").unwrap();

        let err = ConfigLoader::load_from(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == file.path()));
    }

    #[tokio::test]
    async fn test_load_first_takes_earliest_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("byall.yaml");
        let second = dir.path().join("second.yaml");
        let third = dir.path().join("third.yaml");
        std::fs::write(&second, "locator:\n  quote_policy: escape\n").unwrap();
        std::fs::write(&third, "webdriver:\n  url: http://third:4444\n").unwrap();

        let loaded = ConfigLoader::load_first(&[missing, second.clone(), third])
            .await
            .unwrap();
        assert_eq!(loaded.source, Some(second));
        assert_eq!(loaded.config.locator.quote_policy, QuotePolicy::Escape);
        assert_eq!(loaded.config.webdriver.url, "http://localhost:4444");
    }

    #[tokio::test]
    async fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ConfigLoader::load_first(&[dir.path().join("none.yaml")])
            .await
            .unwrap();
        assert_eq!(loaded.source, None);
        assert_eq!(loaded.config.webdriver.wait_timeout_ms, 10000);
    }

    #[tokio::test]
    async fn test_explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = ConfigLoader::load(Some(&path)).await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { path: ref p, .. } if *p == path));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_search_paths_start_in_working_dir() {
        let paths = ConfigLoader::search_paths();
        assert_eq!(paths[0], PathBuf::from("byall.yaml"));
        assert!(paths.iter().skip(1).all(|p| p.ends_with(".byall/config.yaml")));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config: ByAllConfig =
            serde_yaml::from_str("webdriver:\n  url: http://file:4444\n").unwrap();

        config.apply_overrides(None, None);
        assert_eq!(config.webdriver.url, "http://file:4444");

        let url = Url::parse("http://127.0.0.1:9515").unwrap();
        config.apply_overrides(Some(&url), Some(QuotePolicy::Escape));
        assert_eq!(config.webdriver.url, "http://127.0.0.1:9515/");
        assert_eq!(config.locator.quote_policy, QuotePolicy::Escape);
    }
}
