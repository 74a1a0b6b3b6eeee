//! Client configuration: where the message service lives and how to talk to it

use crate::error::{InboxError, InboxResult};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// CSRF header sent with every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfToken {
    /// Header name, e.g. `X-CSRF-TOKEN`
    pub header: String,
    pub token: String,
}

impl CsrfToken {
    pub fn new(header: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            token: token.into(),
        }
    }

    /// Convert into a header pair, rejecting names or values HTTP cannot carry
    pub fn to_header(&self) -> InboxResult<(HeaderName, HeaderValue)> {
        let name = HeaderName::from_bytes(self.header.as_bytes())
            .map_err(|e| InboxError::config(format!("Invalid CSRF header name '{}': {}", self.header, e)))?;
        let value = HeaderValue::from_str(&self.token)
            .map_err(|e| InboxError::config(format!("Invalid CSRF token: {}", e)))?;
        Ok((name, value))
    }
}

/// Settings for the message service client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the web application hosting the service
    pub base_url: String,

    /// Collection path relative to `base_url`
    pub rest_path: String,

    /// Per-request timeout; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,

    pub user_agent: String,

    pub csrf: Option<CsrfToken>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            rest_path: "rest/".to_string(),
            request_timeout_secs: Some(30),
            user_agent: format!("message-inbox/{}", env!("CARGO_PKG_VERSION")),
            csrf: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/message-inbox/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("message-inbox").join("config.toml"))
    }

    /// Load configuration from file; a missing file yields the defaults
    pub async fn load_from_file(path: &Path) -> InboxResult<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| InboxError::config(format!("Failed to read config: {}", e)))?;

        let config: ClientConfig = toml::from_str(&content)
            .map_err(|e| InboxError::config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> InboxResult<()> {
        self.validate()?;

        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| InboxError::config(format!("Failed to create config directory: {}", e)))?;
        }

        tokio::fs::write(path, content)
            .await
            .map_err(|e| InboxError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn to_toml(&self) -> InboxResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| InboxError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate configuration settings
    pub fn validate(&self) -> InboxResult<()> {
        let base = Url::parse(&self.base_url)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(InboxError::config(format!(
                "Base URL must be http or https, got '{}'",
                base.scheme()
            )));
        }

        if self.rest_path.trim_matches('/').is_empty() {
            return Err(InboxError::config("REST path cannot be empty"));
        }

        if let Some(ref csrf) = self.csrf {
            csrf.to_header()?;
        }

        if self.request_timeout_secs == Some(0) {
            return Err(InboxError::config("Request timeout must be greater than 0"));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// URL of the message collection, always ending in `/`
    pub fn collection_url(&self) -> InboxResult<Url> {
        let mut base = Url::parse(&self.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let rest = self.rest_path.trim_start_matches('/');
        let rest = if rest.ends_with('/') {
            rest.to_string()
        } else {
            format!("{}/", rest)
        };

        Ok(base.join(&rest)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.csrf.is_none());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.collection_url().unwrap().as_str(),
            "http://localhost:8080/rest/"
        );
    }

    #[test]
    fn test_collection_url_keeps_context_path() {
        let config = ClientConfig {
            base_url: "https://example.com/hellojs".to_string(),
            rest_path: "/rest".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.collection_url().unwrap().as_str(),
            "https://example.com/hellojs/rest/"
        );
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::default();

        config.base_url = "ftp://example.com/".to_string();
        assert!(config.validate().is_err());

        config.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.base_url = "http://localhost:8080/".to_string();
        config.rest_path = "/".to_string();
        assert!(config.validate().is_err());

        config.rest_path = "rest/".to_string();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.request_timeout_secs = None;
        config.csrf = Some(CsrfToken::new("bad header", "abc"));
        assert!(config.validate().is_err());

        config.csrf = Some(CsrfToken::new("X-CSRF-TOKEN", "abc"));
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_config_file_operations() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let missing = ClientConfig::load_from_file(&config_path).await.unwrap();
        assert_eq!(missing, ClientConfig::default());

        let mut config = ClientConfig::default();
        config.base_url = "http://messages.internal:9000/".to_string();
        config.csrf = Some(CsrfToken::new("X-CSRF-TOKEN", "5f1c"));

        assert!(config.save_to_file(&config_path).await.is_ok());

        let loaded = ClientConfig::load_from_file(&config_path).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "base_url = \"http://10.0.0.5:8080/app/\"\n")
            .await
            .unwrap();

        let loaded = ClientConfig::load_from_file(&config_path).await.unwrap();
        assert_eq!(loaded.rest_path, "rest/");
        assert_eq!(
            loaded.collection_url().unwrap().as_str(),
            "http://10.0.0.5:8080/app/rest/"
        );
    }
}
