//! Client-side error taxonomy.
//!
//! [`ClientError`] describes what went wrong on the wire; [`EvalFailure`] is
//! what the keypad shows to the user.

pub use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request to compute service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("compute service returned {status}{}", message_suffix(.message))]
    Service {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("invalid response payload from compute service: {0}")]
    Decode(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl ClientError {
    /// Message supplied by the service itself, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ClientError::Service { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// Why an evaluation did not produce a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalFailure {
    /// The operand on the display is not a finite number; nothing was sent.
    InvalidInput,
    /// The service rejected the computation and said why.
    Service(String),
    /// Network, protocol or otherwise unexplained failure.
    Unavailable,
}

impl From<&ClientError> for EvalFailure {
    fn from(err: &ClientError) -> Self {
        match err.service_message() {
            Some(message) => EvalFailure::Service(message.to_string()),
            None => EvalFailure::Unavailable,
        }
    }
}

impl From<ClientError> for EvalFailure {
    fn from(err: ClientError) -> Self {
        EvalFailure::from(&err)
    }
}
