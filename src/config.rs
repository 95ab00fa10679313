//! Client configuration.
//!
//! Loaded from an optional TOML file; the `STORYBLOK_TOKEN` environment
//! variable always wins over the file's `access_token`.
//!
//! ```toml
//! access_token = "..."
//! base_url = "https://api.storyblok.com/v2"
//! version = "published"
//! connect_timeout_secs = 3
//! request_timeout_secs = 10
//!
//! [cache]
//! enabled = true
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const TOKEN_ENV: &str = "STORYBLOK_TOKEN";
pub const DEFAULT_BASE_URL: &str = "https://api.storyblok.com/v2";

/// Which revision of the content the delivery API should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentVersion {
    #[default]
    Published,
    Draft,
}

impl ContentVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentVersion::Published => "published",
            ContentVersion::Draft => "draft",
        }
    }
}

impl std::fmt::Display for ContentVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for [`crate::transport::HttpTransport`] and [`crate::blog::BlogManager`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Content-delivery access token. Empty means "not configured".
    pub access_token: String,
    /// Base URL of the delivery API, without trailing slash.
    pub base_url: String,
    pub version: ContentVersion,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub cache: CacheConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: ContentVersion::Published,
            connect_timeout_secs: 3,
            request_timeout_secs: 10,
            cache: CacheConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Config with defaults and the given token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            ..Self::default()
        }
    }

    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Load from `path` (if any), apply the environment and then the
    /// explicit `token` override, and require a token.
    pub fn load(path: Option<&Path>, token: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let display = path.display().to_string();
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: display.clone(),
                    source,
                })?;
                Self::from_toml_str(&raw, &display)?
            }
            None => Self::default(),
        };
        config.apply_token_override(std::env::var(TOKEN_ENV).ok());
        config.apply_token_override(token);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_token_override(&mut self, token: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.access_token = token;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_public_cdn() {
        let cfg = BlogConfig::default();
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.version, ContentVersion::Published);
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.connect_timeout(), Duration::from_secs(3));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = BlogConfig::from_toml_str("access_token = \"abc\"\nversion = \"draft\"\n", "inline")
            .unwrap();
        assert_eq!(cfg.access_token, "abc");
        assert_eq!(cfg.version, ContentVersion::Draft);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.cache.enabled);
    }

    #[test]
    fn test_cache_can_be_disabled() {
        let cfg = BlogConfig::from_toml_str("[cache]\nenabled = false\n", "inline").unwrap();
        assert!(!cfg.cache.enabled);
    }

    #[test]
    fn test_invalid_toml_reports_origin() {
        let err = BlogConfig::from_toml_str("version = 12", "blog.toml").unwrap_err();
        assert!(err.to_string().contains("blog.toml"));
    }

    #[test]
    fn test_token_override_wins_unless_blank() {
        let mut cfg = BlogConfig::new("from-file");
        cfg.apply_token_override(Some("   ".to_string()));
        assert_eq!(cfg.access_token, "from-file");
        cfg.apply_token_override(Some("from-env".to_string()));
        assert_eq!(cfg.access_token, "from-env");
        cfg.apply_token_override(None);
        assert_eq!(cfg.access_token, "from-env");
    }

    #[test]
    fn test_validate_rejects_missing_token() {
        assert!(matches!(BlogConfig::default().validate(), Err(ConfigError::MissingToken)));
        assert!(BlogConfig::new("tok").validate().is_ok());
    }

    #[test]
    fn test_from_toml_file_reads_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"http://localhost:9999\"").unwrap();
        writeln!(file, "request_timeout_secs = 2").unwrap();
        let cfg = BlogConfig::load(Some(file.path()), Some("cli-token".to_string())).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:9999");
        assert_eq!(cfg.request_timeout(), Duration::from_secs(2));
        assert_eq!(cfg.access_token, "cli-token");
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = BlogConfig::load(Some(Path::new("/nonexistent/blog.toml")), Some("t".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_content_version_display() {
        assert_eq!(ContentVersion::Published.to_string(), "published");
        assert_eq!(ContentVersion::Draft.to_string(), "draft");
    }
}
