//! Command-line interface and run orchestration

use clap::Parser;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, TodoError};
use crate::input::{self, Collection};
use crate::mailer::{self, MailgunMailer};
use crate::models::{OutboundMessage, TodoItem};
use crate::suggest::{self, SuggestionClient};

const AFTER_HELP: &str = "\
Examples:
  $ todo need to do something
  $ todo \"I've to do something\"

The words become the subject. You are then prompted for further details:
enter an empty line to complete, Ctrl+C or Ctrl+D to cancel.";

#[derive(Parser, Debug)]
#[command(name = "todo")]
#[command(version)]
#[command(about = "Capture a TODO at the terminal and mail it to your inbox")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// The TODO subject, joined from all arguments
    #[arg(value_name = "ITEM", trailing_var_arg = true)]
    pub item: Vec<String>,
}

/// Drive one TODO from capture to delivery
pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().await?;
    let api_key = config.resolve_api_key()?;

    let subject = cli.item.join(" ");
    if subject.is_empty() {
        return Err(TodoError::Usage("missing todo subject".to_string()));
    }

    let suggestion_client = match config.suggestion_api_key() {
        Some(key) => Some(SuggestionClient::new(key, config.suggestion.clone())?),
        None => None,
    };
    let mailer = MailgunMailer::new(&config, api_key)?;

    let mut item = TodoItem::new(subject);
    debug!("collecting body for {:?}", item.subject);

    match input::collect().await {
        Collection::Canceled => {
            println!("TODO is canceled.");
            return Ok(());
        }
        Collection::Completed(lines) => item.lines = lines,
    }

    let text = suggest::enrich(suggestion_client.as_ref(), item.body_text()).await;
    let message = OutboundMessage::compose(&config, &item, text);

    info!("sending TODO to {}", message.to);
    mailer::deliver(&mailer, &message, &config.person, &config.delivery).await?;

    println!("SENT!");
    Ok(())
}
