use anyhow::Result;
use clap::Parser;
use std::process;
use todo_mailer::cli::{self, Cli};
use todo_mailer::error::TodoError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Exit with proper code on error
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        if matches!(e.downcast_ref::<TodoError>(), Some(TodoError::Usage(_))) {
            eprintln!("For usage, run: todo --help");
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout belongs to prompts and status lines
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("todo_mailer=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli).await?;
    Ok(())
}
