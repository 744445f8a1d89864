use thiserror::Error;

/// Type alias for Result with TodoError
pub type Result<T> = std::result::Result<T, TodoError>;

/// Error types for the TODO mailer
#[derive(Error, Debug)]
pub enum TodoError {
    /// Configuration document failed to parse or validate, or a required
    /// credential is missing
    #[error("Configuration error: {0}")]
    Config(String),

    /// Command line could not produce a usable subject
    #[error("Usage error: {0}")]
    Usage(String),

    /// The mail API rejected the request
    #[error("Mail API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication with the mail API failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Rate limited by the provider
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Provider returned a 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Network-related error (connection issues, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// A request ran past its per-attempt deadline
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Completion service returned an unusable response
    #[error("Suggestion error: {0}")]
    Suggestion(String),

    /// Delivery was abandoned before the provider accepted the message
    #[error("Delivery abandoned: {0}")]
    Aborted(String),
}

impl TodoError {
    /// Check if the error is transient and worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TodoError::RateLimited(_)
                | TodoError::Server { .. }
                | TodoError::Network(_)
                | TodoError::Timeout(_)
        )
    }

    /// Check if the error is permanent and unlikely to clear on retry
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Classify a non-success HTTP status from an outbound API call
    pub fn from_response(status: u16, message: String) -> Self {
        match status {
            401 | 403 => TodoError::Auth(message),
            429 => TodoError::RateLimited(message),
            500..=599 => TodoError::Server { status, message },
            _ => TodoError::Api { status, message },
        }
    }
}

impl From<reqwest::Error> for TodoError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TodoError::Timeout(error.to_string())
        } else if let Some(status) = error.status() {
            TodoError::from_response(status.as_u16(), error.to_string())
        } else {
            TodoError::Network(error.to_string())
        }
    }
}
