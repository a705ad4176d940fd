//! Error types for tezblock

use thiserror::Error;

/// Failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("node returned HTTP {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("invalid node url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{0}")]
    Other(String),
}

/// Rejected block identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("id must be block level (integer) or block hash (string), got {0}")]
    UnsupportedKind(&'static str),
    #[error("block level {0} is out of range")]
    LevelOutOfRange(u64),
}

/// Text that is not a plain decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid decimal string '{0}'")]
pub struct DecimalError(pub String);

/// Error returned by every retrieval operation.
///
/// Each variant carries the operation-specific context message and keeps the
/// underlying cause reachable through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: TransportError,
    },
    #[error("{context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{context}: {source}")]
    InvalidIdentifier {
        context: String,
        #[source]
        source: IdentifierError,
    },
}

impl RpcError {
    pub fn context(&self) -> &str {
        match self {
            RpcError::Transport { context, .. }
            | RpcError::Decode { context, .. }
            | RpcError::InvalidIdentifier { context, .. } => context,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, RpcError::Decode { .. })
    }

    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, RpcError::InvalidIdentifier { .. })
    }
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, RpcError>;
