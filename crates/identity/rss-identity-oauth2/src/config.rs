//! OAuth2 configuration types.

use crate::error::{OAuth2Error, OAuth2Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use url::Url;

/// Identity manager endpoints and client credentials.
///
/// Endpoint fields hold path fragments that are appended verbatim to
/// `base_url`, so `user_info_url` typically ends in `?access_token=` and
/// `get_applications` in `?actor_id=`.
#[derive(Clone, Serialize, Deserialize)]
pub struct OAuthConfig {
    /// Whether users may log in through the IdM web flow (Y/N)
    #[serde(deserialize_with = "yes_no")]
    pub external_login: bool,
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: String,
    pub access_token_url: String,
    pub callback_url: String,
    pub user_info_url: String,
    pub get_applications: String,
    /// Role a user must hold to be let into the application
    pub granted_role: String,
    /// When disabled, token checks are bypassed entirely (Y/N)
    #[serde(deserialize_with = "yes_no")]
    pub use_oauth: bool,
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("external_login", &self.external_login)
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("authorize_url", &self.authorize_url)
            .field("access_token_url", &self.access_token_url)
            .field("callback_url", &self.callback_url)
            .field("user_info_url", &self.user_info_url)
            .field("get_applications", &self.get_applications)
            .field("granted_role", &self.granted_role)
            .field("use_oauth", &self.use_oauth)
            .finish()
    }
}

impl OAuthConfig {
    pub fn validate(&self) -> OAuth2Result<()> {
        Url::parse(&self.base_url).map_err(|e| {
            OAuth2Error::ConfigError(format!("base_url '{}' is not a URL: {}", self.base_url, e))
        })?;

        if self.client_id.trim().is_empty() {
            return Err(OAuth2Error::ConfigError(
                "client_id cannot be empty".to_string(),
            ));
        }

        if self.use_oauth && self.granted_role.trim().is_empty() {
            return Err(OAuth2Error::ConfigError(
                "granted_role is required when use_oauth is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

/// Transport settings for the shared IdM HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Idle pooled connections older than this are evicted
    #[serde(default = "default_pool_idle_timeout")]
    pub pool_idle_timeout_seconds: u64,

    /// Skip TLS certificate validation. Only for test IdMs with self-signed
    /// certificates; never enable it against a production IdM.
    #[serde(default)]
    pub danger_accept_invalid_certs: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_pool_idle_timeout() -> u64 {
    90
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            pool_idle_timeout_seconds: default_pool_idle_timeout(),
            danger_accept_invalid_certs: false,
        }
    }
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_pool_idle_timeout(mut self, seconds: u64) -> Self {
        self.pool_idle_timeout_seconds = seconds;
        self
    }

    pub fn with_danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }
}

/// Accepts `Y`/`N` style flags as well as plain booleans.
pub(crate) fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" => Ok(true),
            "n" | "no" | "false" | "" => Ok(false),
            other => Err(D::Error::custom(format!(
                "expected Y or N, got '{}'",
                other
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_json(use_oauth: &str) -> String {
        format!(
            r#"{{
                "external_login": "y",
                "base_url": "https://idm.example.com",
                "client_id": "rss-client",
                "client_secret": "s3cret",
                "authorize_url": "/oauth2/authorize",
                "access_token_url": "/oauth2/token",
                "callback_url": "https://rss.example.com/callback",
                "user_info_url": "/user?access_token=",
                "get_applications": "/applications.json?actor_id=",
                "granted_role": "Provider",
                "use_oauth": {}
            }}"#,
            use_oauth
        )
    }

    #[test]
    fn test_yes_no_flags() {
        let config: OAuthConfig = serde_json::from_str(&config_json(r#""Y""#)).unwrap();
        assert!(config.use_oauth);
        assert!(config.external_login);

        let config: OAuthConfig = serde_json::from_str(&config_json(r#""n""#)).unwrap();
        assert!(!config.use_oauth);

        let config: OAuthConfig = serde_json::from_str(&config_json("true")).unwrap();
        assert!(config.use_oauth);

        assert!(serde_json::from_str::<OAuthConfig>(&config_json(r#""maybe""#)).is_err());
    }

    #[test]
    fn test_missing_option_is_rejected() {
        let result = serde_json::from_str::<OAuthConfig>(r#"{"base_url": "https://idm"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let mut config: OAuthConfig = serde_json::from_str(&config_json(r#""Y""#)).unwrap();
        assert!(config.validate().is_ok());

        config.base_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(OAuth2Error::ConfigError(_))));

        config.base_url = "https://idm.example.com".to_string();
        config.granted_role = String::new();
        assert!(config.validate().is_err());

        config.use_oauth = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config: OAuthConfig = serde_json::from_str(&config_json(r#""Y""#)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("rss-client"));
    }

    #[test]
    fn test_http_client_defaults() {
        let config: HttpClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.pool_idle_timeout_seconds, 90);
        assert!(!config.danger_accept_invalid_certs);

        let config = HttpClientConfig::new().with_timeout(5);
        assert_eq!(config.timeout_seconds, 5);
    }
}
