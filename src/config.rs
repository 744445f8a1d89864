use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TodoError};

/// Configuration document compiled into the binary
const EMBEDDED_CONFIG: &str = include_str!("../todo.toml");

/// Environment variable naming an override configuration file
pub const CONFIG_ENV: &str = "TODO_CONFIG";

/// Environment variable holding the completion-service credential.
/// Absence disables suggestion enrichment.
pub const SUGGESTION_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Display name used in the From header and in delivery logs
    #[serde(default)]
    pub person: String,
    /// Sender address
    pub email: String,
    /// Mail provider sending domain
    pub domain: String,
    /// Name of the environment variable holding the mail API secret.
    /// The configured value is the variable name, never the secret itself.
    pub apikey: String,
    /// Mail provider API base URL
    #[serde(default = "default_apibase")]
    pub apibase: String,
    /// Destination inbox address
    pub inbox: String,
    #[serde(default)]
    pub suggestion: SuggestionConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_suggestion_api_base")]
    pub api_base: String,
    #[serde(default = "default_suggestion_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_base: default_suggestion_api_base(),
            timeout_secs: default_suggestion_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Per-attempt timeout for the send call
    #[serde(default = "default_delivery_timeout_secs")]
    pub timeout_secs: u64,
    /// Fixed pause between failed attempts
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
    /// Optional bound on attempts. Unset means retry until delivery succeeds.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_delivery_timeout_secs(),
            backoff_secs: default_backoff_secs(),
            max_attempts: None,
        }
    }
}

fn default_apibase() -> String {
    "https://api.mailgun.net/v3".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    256
}

fn default_suggestion_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_suggestion_timeout_secs() -> u64 {
    30
}

fn default_delivery_timeout_secs() -> u64 {
    10
}

fn default_backoff_secs() -> u64 {
    3
}

impl Config {
    /// Parse and validate a configuration document
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| TodoError::Config(format!("cannot parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the embedded document, or the file named by TODO_CONFIG when set
    pub async fn load() -> Result<Self> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => {
                debug!("loading configuration override from {}", path);
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| TodoError::Config(format!("cannot read {}: {}", path, e)))?;
                Self::from_toml(&content)
            }
            _ => Self::from_toml(EMBEDDED_CONFIG),
        }
    }

    /// Resolve the mail API secret through the environment variable named by
    /// `apikey`. Must succeed before any network activity.
    pub fn resolve_api_key(&self) -> Result<String> {
        match std::env::var(&self.apikey) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(TodoError::Config(format!(
                "missing mail API key from ${}",
                self.apikey
            ))),
        }
    }

    /// Completion credential, if one is present in the environment
    pub fn suggestion_api_key(&self) -> Option<String> {
        std::env::var(SUGGESTION_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(TodoError::Config(
                "email must be a sender address".to_string(),
            ));
        }
        if self.domain.is_empty() {
            return Err(TodoError::Config("domain cannot be empty".to_string()));
        }
        if self.apikey.is_empty() {
            return Err(TodoError::Config(
                "apikey must name an environment variable".to_string(),
            ));
        }
        if !self.apibase.starts_with("http://") && !self.apibase.starts_with("https://") {
            return Err(TodoError::Config(
                "apibase must be an http(s) URL".to_string(),
            ));
        }
        if self.inbox.is_empty() || !self.inbox.contains('@') {
            return Err(TodoError::Config(
                "inbox must be a destination address".to_string(),
            ));
        }
        if self.delivery.timeout_secs == 0 {
            return Err(TodoError::Config(
                "delivery.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.delivery.max_attempts == Some(0) {
            return Err(TodoError::Config(
                "delivery.max_attempts must be at least 1 when set".to_string(),
            ));
        }
        if self.suggestion.timeout_secs == 0 {
            return Err(TodoError::Config(
                "suggestion.timeout_secs must be at least 1".to_string(),
            ));
        }

        debug!("configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_config() -> Config {
        Config {
            person: "Dana".to_string(),
            email: "todo@example.org".to_string(),
            domain: "example.org".to_string(),
            apikey: "MAILGUN_APIKEY".to_string(),
            apibase: "https://api.mailgun.net/v3".to_string(),
            inbox: "inbox@example.org".to_string(),
            suggestion: SuggestionConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }

    #[test]
    fn test_embedded_config_is_valid() {
        let config = Config::from_toml(EMBEDDED_CONFIG).unwrap();
        assert_eq!(config.apikey, "MAILGUN_APIKEY");
        assert_eq!(config.apibase, "https://api.mailgun.net/v3");
        assert!(config.inbox.contains('@'));
    }

    #[test]
    fn test_delivery_defaults() {
        let config = DeliveryConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.backoff_secs, 3);
        assert_eq!(config.max_attempts, None);
    }

    #[test]
    fn test_suggestion_defaults() {
        let config = SuggestionConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.api_base, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_minimal_document_fills_defaults() {
        let config = Config::from_toml(
            r#"
email = "me@example.org"
domain = "example.org"
apikey = "MAILGUN_APIKEY"
inbox = "inbox@example.org"
"#,
        )
        .unwrap();

        assert_eq!(config.person, "");
        assert_eq!(config.apibase, "https://api.mailgun.net/v3");
        assert_eq!(config.delivery.backoff_secs, 3);
        assert_eq!(config.suggestion.model, "gpt-4o-mini");
    }

    #[test]
    fn test_validation_rejects_bad_email() {
        let mut config = valid_config();
        config.email = "not-an-address".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("sender address"));
    }

    #[test]
    fn test_validation_rejects_empty_domain() {
        let mut config = valid_config();
        config.domain = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_apibase() {
        let mut config = valid_config();
        config.apibase = "api.mailgun.net".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("http"));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = valid_config();
        config.delivery.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_max_attempts() {
        let mut config = valid_config();
        config.delivery.max_attempts = Some(0);
        assert!(config.validate().is_err());

        config.delivery.max_attempts = Some(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let result = Config::from_toml("this is not toml {[}]");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot parse config"));
    }

    #[test]
    #[serial]
    fn test_resolve_api_key() {
        let config = valid_config();

        std::env::set_var("MAILGUN_APIKEY", "key-sekrit");
        assert_eq!(config.resolve_api_key().unwrap(), "key-sekrit");

        std::env::set_var("MAILGUN_APIKEY", "");
        let result = config.resolve_api_key();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("$MAILGUN_APIKEY"));

        std::env::remove_var("MAILGUN_APIKEY");
        assert!(config.resolve_api_key().is_err());
    }

    #[test]
    #[serial]
    fn test_suggestion_api_key_optional() {
        let config = valid_config();

        std::env::remove_var(SUGGESTION_KEY_ENV);
        assert_eq!(config.suggestion_api_key(), None);

        std::env::set_var(SUGGESTION_KEY_ENV, "sk-test");
        assert_eq!(config.suggestion_api_key(), Some("sk-test".to_string()));

        std::env::remove_var(SUGGESTION_KEY_ENV);
    }

    #[tokio::test]
    #[serial]
    async fn test_load_prefers_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
person = "Override"
email = "other@example.net"
domain = "example.net"
apikey = "OTHER_APIKEY"
inbox = "other-inbox@example.net"

[delivery]
backoff_secs = 1
"#
        )
        .unwrap();

        std::env::set_var(CONFIG_ENV, file.path());
        let config = Config::load().await.unwrap();
        std::env::remove_var(CONFIG_ENV);

        assert_eq!(config.person, "Override");
        assert_eq!(config.domain, "example.net");
        assert_eq!(config.delivery.backoff_secs, 1);
        // Untouched fields still come from serde defaults
        assert_eq!(config.delivery.timeout_secs, 10);
    }

    #[tokio::test]
    #[serial]
    async fn test_load_missing_override_file_fails() {
        std::env::set_var(CONFIG_ENV, "/nonexistent/todo-override.toml");
        let result = Config::load().await;
        std::env::remove_var(CONFIG_ENV);

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot read"));
    }

    #[tokio::test]
    #[serial]
    async fn test_load_falls_back_to_embedded() {
        std::env::remove_var(CONFIG_ENV);
        let config = Config::load().await.unwrap();
        assert_eq!(config.apikey, "MAILGUN_APIKEY");
    }
}
