use thiserror::Error;

/// Errors surfaced by the prediction backend client.
///
/// Network failures are terminal only after the client's single retry;
/// HTTP error statuses are never retried.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid response: {0}")]
    Decode(String),
}

pub type PredictResult<T> = Result<T, PredictError>;

impl PredictError {
    /// Message reported by the server itself, when there is one.
    /// Used to show backend errors verbatim instead of a generic fallback.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
