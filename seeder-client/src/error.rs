//! Error types for the seeder clients

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to GitHub or GoCD
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client was built with unusable settings (e.g. no access token)
    #[error("configuration error: {0}")]
    Config(String),

    /// Credentials missing or rejected by the remote system
    #[error("authentication failed (status {status}): {message}")]
    Auth {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// GitHub API rate limit exhausted
    #[error("hit rate limit{}", reset_suffix(.reset))]
    RateLimited {
        /// Epoch seconds at which the limit resets, when reported
        reset: Option<u64>,
    },

    /// Resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// API returned an error status code
    #[error("{status_line}: {body}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Status line, e.g. "500 Internal Server Error"
        status_line: String,
        /// Response body, for diagnostics
        body: String,
    },

    /// Request never produced a response
    #[error("{context}: {source}")]
    Transport {
        /// Which call failed
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// Response body did not have the expected shape
    #[error("failed to decode {what}: {message}")]
    Decode { what: String, message: String },
}

fn reset_suffix(reset: &Option<u64>) -> String {
    reset
        .map(|at| format!(" (resets at {at})"))
        .unwrap_or_default()
}

/// Kind of a [`ClientError`], for branching without matching on messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Auth,
    RateLimit,
    NotFound,
    Server,
    Transport,
    Decode,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Auth => "auth",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Server => "server",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClientError {
    /// Create a server error from a status and response body
    pub fn server(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self::Server {
            status: status.as_u16(),
            status_line: status.to_string(),
            body: body.into(),
        }
    }

    /// Wrap a transport failure with the call that produced it
    pub fn transport(context: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            context: context.into(),
            source,
        }
    }

    pub fn decode(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Auth { .. } => ErrorKind::Auth,
            Self::RateLimited { .. } => ErrorKind::RateLimit,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Server { .. } => ErrorKind::Server,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind() == ErrorKind::RateLimit
    }

    /// HTTP status associated with the error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }
}
