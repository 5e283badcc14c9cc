//! Error types for ccip-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed request: {0}")]
    Decode(String),

    #[error("Malformed DNS name: {0}")]
    DnsName(String),

    #[error("Node mismatch: request carries {actual}, but {name} hashes to {expected}")]
    NodeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Unsupported query function: {0}")]
    UnsupportedQuery(String),

    #[error("Name \"{name}\" is not a subname of {parent}")]
    DomainMismatch { name: String, parent: String },

    #[error("Invalid sender: {0}")]
    InvalidSender(String),

    #[error("Unexpected sender {sender}, this gateway signs for {expected}")]
    UnexpectedSender { sender: String, expected: String },

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Signing failed: {0}")]
    Signing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Stable machine-readable code reported alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            Error::Decode(_) => "decode_error",
            Error::DnsName(_) => "dns_name_error",
            Error::NodeMismatch { .. } => "node_mismatch",
            Error::UnsupportedQuery(_) => "unsupported_query",
            Error::DomainMismatch { .. } => "domain_mismatch",
            Error::InvalidSender(_) => "invalid_sender",
            Error::UnexpectedSender { .. } => "unexpected_sender",
            Error::InvalidKey(_) => "invalid_key",
            Error::Signing(_) => "signing_error",
            Error::Io(_) => "io_error",
            Error::Json(_) => "json_error",
        }
    }

    /// True when the request itself is at fault and retrying it cannot help
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::Decode(_)
                | Error::DnsName(_)
                | Error::NodeMismatch { .. }
                | Error::UnsupportedQuery(_)
                | Error::DomainMismatch { .. }
                | Error::InvalidSender(_)
                | Error::UnexpectedSender { .. }
        )
    }
}
