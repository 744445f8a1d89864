use crate::config::Config;

/// Tag prefixed to every subject so the receiving side can filter TODO mail
pub const SUBJECT_TAG: &str = "todo: ";

/// One TODO captured at the terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    /// Space-joined command-line words, without the tag
    pub subject: String,
    /// Body lines in the order they were typed
    pub lines: Vec<String>,
}

impl TodoItem {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            lines: Vec::new(),
        }
    }

    /// Subject header with the fixed tag
    pub fn subject_line(&self) -> String {
        format!("{}{}", SUBJECT_TAG, self.subject)
    }

    /// Body text for the outbound mail: the tagged subject alone when no
    /// lines were collected, otherwise the subject followed by each line
    pub fn body_text(&self) -> String {
        if self.lines.is_empty() {
            return self.subject_line();
        }

        let mut body = self.subject.clone();
        for line in &self.lines {
            body.push('\n');
            body.push_str(line);
        }
        body
    }
}

/// Fully composed message handed to the delivery sender. Immutable once
/// composed; sent exactly once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl OutboundMessage {
    /// Compose the outbound message for an item. `body` is the item text,
    /// possibly already carrying an appended suggestion.
    pub fn compose(config: &Config, item: &TodoItem, body: String) -> Self {
        Self {
            from: from_mailbox(&config.person, &config.email),
            to: config.inbox.clone(),
            subject: item.subject_line(),
            body,
        }
    }
}

/// From mailbox in `Name <address>` form when a display name is configured
fn from_mailbox(person: &str, email: &str) -> String {
    if person.is_empty() {
        email.to_string()
    } else {
        format!("{} <{}>", person, email)
    }
}
