// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application configuration: TOML file with built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "TEMPINBOX_CONFIG";
/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "TEMPINBOX_API_URL";
/// Config file picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "tempinbox.toml";

const DEFAULT_API_BASE_URL: &str = "https://cigaop.club/api/api.php";
const DEFAULT_DOMAINS: [&str; 6] = [
    "brarov.tech",
    "devilott.store",
    "devilott.site",
    "devilott.art",
    "devilott.online",
    "devilott.live",
];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// A service card on the landing page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ServiceCard {
    pub name: String,
    /// Accent colour as `#rrggbb`.
    pub color: String,
}

/// An external contact link shown on the address entry page.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ContactLink {
    pub label: String,
    pub url: String,
}

/// Demo feed tuning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub initial_count: usize,
    pub auto_refresh_secs: u64,
    /// Probability that an auto-refresh tick delivers a new email.
    pub new_email_chance: f64,
    /// Simulated latency of a manual refresh.
    pub refresh_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_count: 25,
            auto_refresh_secs: 30,
            new_email_chance: 0.2,
            refresh_delay_ms: 1000,
        }
    }
}

impl FeedConfig {
    pub fn auto_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.auto_refresh_secs)
    }

    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base of the inbox API; requests go to `<base>/api`.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Domains offered on the search page, first one preselected.
    pub domains: Vec<String>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    pub services: Vec<ServiceCard>,
    pub links: Vec<ContactLink>,
    pub feed: FeedConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 15,
            domains: DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect(),
            log_level: "info".to_string(),
            services: vec![ServiceCard {
                name: "NF".to_string(),
                color: "#b91c1c".to_string(),
            }],
            links: Vec::new(),
            feed: FeedConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check invariants the rest of the app relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_web_url(&self.api_base_url) {
            return Err(ConfigError::Invalid(format!(
                "api_base_url must be an http/https URL, got '{}'",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }
        if self.domains.iter().all(|d| d.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "at least one search domain is required".into(),
            ));
        }
        if self.services.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one service is required".into(),
            ));
        }
        if let Some(link) = self.links.iter().find(|l| !is_web_url(&l.url)) {
            return Err(ConfigError::Invalid(format!(
                "link '{}' must be an http/https URL",
                link.label
            )));
        }
        if self.feed.auto_refresh_secs == 0 {
            return Err(ConfigError::Invalid(
                "feed.auto_refresh_secs must be greater than 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.feed.new_email_chance) {
            return Err(ConfigError::Invalid(
                "feed.new_email_chance must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}

/// Parse and validate a config file.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Resolve configuration from the environment.
///
/// Order: `$TEMPINBOX_CONFIG`, then `./tempinbox.toml` if it exists, then
/// defaults. `$TEMPINBOX_API_URL` is applied last.
pub fn load() -> Result<AppConfig, ConfigError> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let local = PathBuf::from(LOCAL_CONFIG_FILE);

    let mut config = match explicit {
        Some(path) => load_from_path(&path)?,
        None if local.is_file() => load_from_path(&local)?,
        None => AppConfig::default(),
    };

    if let Ok(url) = std::env::var(API_URL_ENV) {
        config.api_base_url = url;
        config.validate()?;
    }

    Ok(config)
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .ok()
        .is_some_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.domains[0], "brarov.tech");
        assert_eq!(config.feed.initial_count, 25);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let file = write_config(
            r##"
            api_base_url = "http://localhost:3001"
            domains = ["example.com"]

            [[services]]
            name = "Crunchy"
            color = "#ea580c"

            [feed]
            auto_refresh_secs = 5
            "##,
        );

        let config = load_from_path(file.path()).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:3001");
        assert_eq!(config.domains, vec!["example.com"]);
        assert_eq!(config.services[0].name, "Crunchy");
        assert_eq!(config.feed.auto_refresh_secs, 5);
        assert_eq!(config.feed.initial_count, 25);
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let file = write_config(r#"api_base_url = "ftp://example.com""#);
        let err = load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_out_of_range_chance() {
        let file = write_config("[feed]\nnew_email_chance = 1.5\n");
        let err = load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("new_email_chance"));
    }

    #[test]
    fn rejects_zero_auto_refresh_interval() {
        let file = write_config("[feed]\nauto_refresh_secs = 0\n");
        let err = load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("auto_refresh_secs"));
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let file = write_config("domains = [");
        let err = load_from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
