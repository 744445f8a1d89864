//! Mail delivery through the provider's messages API
//!
//! One attempt is one form POST bounded by the configured timeout. The
//! retry driver keeps attempting with a fixed backoff until the provider
//! accepts the message, the optional attempt bound is reached, or the user
//! interrupts.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::{Config, DeliveryConfig};
use crate::error::{Result, TodoError};
use crate::input::interrupted;
use crate::models::OutboundMessage;

/// Mail-sending seam. One call is one delivery attempt.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_message(&self, message: &OutboundMessage) -> Result<()>;
}

/// Client for the Mailgun-style messages endpoint
pub struct MailgunMailer {
    client: Client,
    api_key: String,
    endpoint: String,
}

/// Body shape the provider uses for both accepted and rejected requests
#[derive(Debug, Default, Deserialize)]
struct ApiReply {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl MailgunMailer {
    /// Build a client for the configured domain. The per-attempt timeout is
    /// enforced by the underlying HTTP client.
    pub fn new(config: &Config, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.delivery.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/{}/messages",
                config.apibase.trim_end_matches('/'),
                config.domain
            ),
        })
    }
}

#[async_trait]
impl Mailer for MailgunMailer {
    async fn send_message(&self, message: &OutboundMessage) -> Result<()> {
        let form = [
            ("from", message.from.as_str()),
            ("to", message.to.as_str()),
            ("subject", message.subject.as_str()),
            ("text", message.body.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth("api", Some(&self.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let reply: ApiReply = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            return Err(TodoError::from_response(
                status.as_u16(),
                reply.message.unwrap_or(body),
            ));
        }

        debug!(
            "mail API accepted message{}",
            reply.id.map(|id| format!(" {}", id)).unwrap_or_default()
        );
        Ok(())
    }
}

/// Drive send attempts until one succeeds. Returns the number of attempts
/// made. A Ctrl-C abandons delivery with an error.
pub async fn deliver(
    mailer: &dyn Mailer,
    message: &OutboundMessage,
    person: &str,
    policy: &DeliveryConfig,
) -> Result<u32> {
    retry_send(mailer, message, person, policy, interrupted()).await
}

async fn retry_send<I>(
    mailer: &dyn Mailer,
    message: &OutboundMessage,
    person: &str,
    policy: &DeliveryConfig,
    interrupt: I,
) -> Result<u32>
where
    I: std::future::Future<Output = ()>,
{
    tokio::pin!(interrupt);
    let backoff = Duration::from_secs(policy.backoff_secs);
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;

        let outcome = tokio::select! {
            biased;

            _ = &mut interrupt => {
                warn!("interrupt received, abandoning delivery");
                return Err(TodoError::Aborted(format!(
                    "interrupted after {} attempts",
                    attempts - 1
                )));
            }
            result = mailer.send_message(message) => result,
        };

        match outcome {
            Ok(()) => {
                debug!("delivery accepted on attempt {}", attempts);
                return Ok(attempts);
            }
            Err(error) => {
                warn!("failed to send a TODO to {}: {}", person, error);
                if error.is_permanent() {
                    warn!("this error is unlikely to clear on retry; check the mail domain and API key");
                }

                if let Some(limit) = policy.max_attempts {
                    if attempts >= limit {
                        return Err(TodoError::Aborted(format!(
                            "giving up after {} attempts: {}",
                            attempts, error
                        )));
                    }
                }

                warn!("failed to send email, retry in {} seconds...", policy.backoff_secs);
                tokio::select! {
                    biased;

                    _ = &mut interrupt => {
                        warn!("interrupt received, abandoning delivery");
                        return Err(TodoError::Aborted(format!(
                            "interrupted after {} attempts",
                            attempts
                        )));
                    }
                    _ = sleep(backoff) => {}
                }
            }
        }
    }
}
