//! Error types for the relay.

use thiserror::Error;

/// Why a submission could not be relayed.
///
/// The `Display` text is what the client sees in the `error` field.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid JSON body")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Failed to send email: {0}")]
    Mail(#[from] MailError),

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("Failed to read request body")]
    BodyRead(#[source] std::io::Error),
}

impl RelayError {
    /// HTTP status for this error.
    pub fn status(&self) -> u16 {
        match self {
            RelayError::MissingFields | RelayError::InvalidBody(_) | RelayError::BodyRead(_) => 400,
            RelayError::BodyTooLarge => 413,
            RelayError::Mail(_) => 500,
        }
    }
}

/// Failures of the outbound mail integration.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("{0}")]
    Message(#[from] lettre::error::Error),

    #[error("{0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// HTTP listener errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
}
