//! Common test utilities and fixtures

use mockall::mock;
use todo_mailer::config::{Config, DeliveryConfig, SuggestionConfig};
use todo_mailer::error::Result;
use todo_mailer::mailer::Mailer;
use todo_mailer::models::{OutboundMessage, TodoItem};

/// Create a config with a fixed identity and default policies
pub fn test_config() -> Config {
    Config {
        person: "Dana".to_string(),
        email: "todo@example.org".to_string(),
        domain: "sandbox.example.org".to_string(),
        apikey: "MAILGUN_APIKEY".to_string(),
        apibase: "https://api.mailgun.net/v3".to_string(),
        inbox: "inbox@example.org".to_string(),
        suggestion: SuggestionConfig::default(),
        delivery: DeliveryConfig::default(),
    }
}

/// Create a config pointed at a local mock server, with backoff disabled
/// so retry tests finish quickly
pub fn config_for_server(base_url: &str) -> Config {
    let mut config = test_config();
    config.apibase = base_url.to_string();
    config.delivery = DeliveryConfig {
        timeout_secs: 5,
        backoff_secs: 0,
        max_attempts: None,
    };
    config
}

/// Create a suggestion config pointed at a local mock server
pub fn suggestion_config_for_server(base_url: &str) -> SuggestionConfig {
    SuggestionConfig {
        api_base: base_url.to_string(),
        timeout_secs: 5,
        ..SuggestionConfig::default()
    }
}

/// Create a test item with a subject and pre-collected body lines
pub fn item_with_lines(subject: &str, lines: &[&str]) -> TodoItem {
    let mut item = TodoItem::new(subject);
    item.lines = lines.iter().map(|line| line.to_string()).collect();
    item
}

/// Compose the outbound message for an item without enrichment
pub fn message_for(config: &Config, item: &TodoItem) -> OutboundMessage {
    OutboundMessage::compose(config, item, item.body_text())
}

// Mock implementation of Mailer for testing
mock! {
    pub Mailer {}

    #[async_trait::async_trait]
    impl Mailer for Mailer {
        async fn send_message(&self, message: &OutboundMessage) -> Result<()>;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder_keeps_line_order() {
        let item = item_with_lines("call mom", &["this evening", "after dinner"]);
        assert_eq!(item.subject, "call mom");
        assert_eq!(
            item.lines,
            vec!["this evening".to_string(), "after dinner".to_string()]
        );
    }

    #[test]
    fn test_server_config_overrides_apibase_and_backoff() {
        let config = config_for_server("http://127.0.0.1:9");
        assert_eq!(config.apibase, "http://127.0.0.1:9");
        assert_eq!(config.delivery.backoff_secs, 0);
        assert_eq!(config.domain, "sandbox.example.org");
    }
}
