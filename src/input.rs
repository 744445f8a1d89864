//! Interactive collection of the TODO body from the terminal
//!
//! A dedicated thread performs the blocking stdin reads and hands lines to
//! the async controller through a capacity-one channel, so the controller
//! can race each line against an interrupt signal. On cancellation the
//! reader thread is abandoned; it may stay blocked on stdin until process
//! exit.

use std::io::{BufRead, Write};

use tokio::sync::mpsc;
use tracing::debug;

/// Outcome of a collection session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    /// The user finished with a blank line; lines are in entry order
    Completed(Vec<String>),
    /// The user interrupted or closed stdin; nothing is sent downstream
    Canceled,
}

/// One event from the reader thread
#[derive(Debug)]
enum LineEvent {
    /// A full line with the trailing newline stripped. Empty means the user
    /// submitted a blank line.
    Line(String),
    /// Stdin was closed (Ctrl-D) or reading failed
    Eof,
}

/// Collect body lines until a blank line, end of input, or Ctrl-C
pub async fn collect() -> Collection {
    println!("(Enter an empty line to complete; Ctrl+C/Ctrl+D to cancel)");

    let (tx, rx) = mpsc::channel(1);
    spawn_reader(tx);

    drive_collection(rx, interrupted()).await
}

/// Resolves once Ctrl-C arrives. If the handler cannot be installed the
/// future stays pending and other cancellation paths remain available.
pub(crate) async fn interrupted() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for interrupt signals: {}", error);
        std::future::pending::<()>().await;
    }
}

/// Prompt for and read lines on a detached thread. The capacity-one channel
/// makes the thread block before each new read until the previous line was
/// consumed, keeping delivery strictly ordered.
fn spawn_reader(tx: mpsc::Sender<LineEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();

        loop {
            print!("> ");
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) | Err(_) => {
                    let _ = tx.blocking_send(LineEvent::Eof);
                    return;
                }
                Ok(_) => {
                    let text = line
                        .trim_end_matches(|c| c == '\n' || c == '\r')
                        .to_string();
                    let finished = text.is_empty();
                    if tx.blocking_send(LineEvent::Line(text)).is_err() {
                        return;
                    }
                    if finished {
                        return;
                    }
                }
            }
        }
    });
}

/// Accumulate lines until a blank line completes the session or a cancel
/// event ends it. The interrupt arm is checked first so cancellation wins
/// over an already-queued line.
async fn drive_collection<C>(mut rx: mpsc::Receiver<LineEvent>, cancel: C) -> Collection
where
    C: std::future::Future<Output = ()>,
{
    tokio::pin!(cancel);
    let mut lines = Vec::new();

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel => {
                debug!("collection interrupted after {} lines", lines.len());
                return Collection::Canceled;
            }
            event = rx.recv() => match event {
                Some(LineEvent::Line(text)) if text.is_empty() => {
                    debug!("collection completed with {} lines", lines.len());
                    return Collection::Completed(lines);
                }
                Some(LineEvent::Line(text)) => lines.push(text),
                Some(LineEvent::Eof) | None => {
                    debug!("stdin closed, canceling collection");
                    return Collection::Canceled;
                }
            },
        }
    }
}
