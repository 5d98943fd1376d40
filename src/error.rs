/// Every failure an orchestration operation can run into.
///
/// Operations catch these at their own boundary and render them into the view;
/// nothing here is fatal to the process.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing or unusable API base URL. Raised before any network I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A local field check failed; no request was made.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A success response whose body was not the JSON we expected.
    #[error("Invalid response from server: {0}")]
    Parse(String),

    /// A guarded operation was attempted without a session.
    #[error("Please log in first")]
    NotLoggedIn,

    #[error("File reading failed: {0}")]
    FileRead(String),

    #[error("Local storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl ClientError {
    /// The `message` field of a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Http { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
                .filter(|m| !m.trim().is_empty()),
            _ => None,
        }
    }

    /// Text shown to the user: the server's own message when there is one,
    /// otherwise `fallback` for HTTP failures and the error itself for the rest.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(msg) = self.server_message() {
            return msg;
        }
        match self {
            Self::Http { .. } => fallback.to_string(),
            other => other.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
