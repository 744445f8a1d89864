//! TODO Mailer
//!
//! A single-shot CLI that captures a short reminder at the terminal,
//! optionally enriches it with a generated suggestion, and mails it to a
//! fixed inbox through a Mailgun-style messages API.
//!
//! # Overview
//!
//! One invocation walks a straight line:
//! - **Collection**: the subject comes from the command line; body lines are
//!   read interactively until a blank line (Ctrl-C/Ctrl-D cancels)
//! - **Enrichment**: best-effort suggestion from a completion service,
//!   skipped without a credential, never fatal
//! - **Delivery**: one message to the configured inbox, retried with a fixed
//!   backoff until the provider accepts it
//!
//! Nothing is persisted; the process either reports `SENT!` or cancels.
//!
//! # Example Usage
//!
//! ```no_run
//! use todo_mailer::config::Config;
//! use todo_mailer::mailer::{self, MailgunMailer};
//! use todo_mailer::models::{OutboundMessage, TodoItem};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load().await?;
//!     let mailer = MailgunMailer::new(&config, config.resolve_api_key()?)?;
//!
//!     let item = TodoItem::new("water the plants");
//!     let message = OutboundMessage::compose(&config, &item, item.body_text());
//!     mailer::deliver(&mailer, &message, &config.person, &config.delivery).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`cli`] - Argument parsing and run orchestration
//! - [`config`] - Embedded configuration document and overrides
//! - [`error`] - Error types and result alias
//! - [`input`] - Cancellable interactive body collection
//! - [`mailer`] - Delivery client and retry driver
//! - [`models`] - TODO item and outbound message composition
//! - [`suggest`] - Best-effort completion-service enrichment

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod mailer;
pub mod models;
pub mod suggest;

// Re-export commonly used types for convenience
pub use error::{Result, TodoError};

pub use config::{Config, DeliveryConfig, SuggestionConfig};
pub use input::Collection;
pub use mailer::{MailgunMailer, Mailer};
pub use models::{OutboundMessage, TodoItem, SUBJECT_TAG};
pub use suggest::SuggestionClient;

// CLI types (for binary usage)
pub use cli::Cli;
