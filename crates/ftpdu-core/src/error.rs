//! Error types for connecting to and scanning remote servers.

use thiserror::Error;

/// A failure reported by a transport while talking to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection dropped or an I/O error occurred.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The server denied access to the path.
    #[error("Permission denied")]
    PermissionDenied,

    /// The path does not exist (or no longer exists).
    #[error("No such file or directory")]
    NotFound,

    /// The server refused the command.
    #[error("Server rejected request: {message}")]
    Rejected { message: String },

    /// The server sent a reply the client could not make sense of.
    #[error("Protocol error: {message}")]
    Protocol { message: String },
}

impl TransportError {
    /// Create a connection error from any displayable cause.
    pub fn connection(cause: impl std::fmt::Display) -> Self {
        Self::Connection {
            message: cause.to_string(),
        }
    }

    /// Create a rejection error from any displayable cause.
    pub fn rejected(cause: impl std::fmt::Display) -> Self {
        Self::Rejected {
            message: cause.to_string().trim().to_string(),
        }
    }

    /// Create a protocol error from any displayable cause.
    pub fn protocol(cause: impl std::fmt::Display) -> Self {
        Self::Protocol {
            message: cause.to_string(),
        }
    }

    /// Whether the session itself is unusable after this error.
    pub fn is_connection_lost(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

/// Errors that abort a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A listing, probe or size query failed.
    #[error("Transport failure at {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: TransportError,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Wrap a transport failure with the remote path it occurred at.
    pub fn transport(path: impl Into<String>, source: TransportError) -> Self {
        Self::Transport {
            path: path.into(),
            source,
        }
    }

    /// The offending remote path, if the error is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Transport { path, .. } => Some(path),
            Self::InvalidConfig { .. } => None,
        }
    }
}

/// Errors establishing a session, raised before any scanning starts.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The server could not be reached.
    #[error("Cannot reach {address}: {message}")]
    Unreachable { address: String, message: String },

    /// The server refused the credentials.
    #[error("Authentication failed for user {user}")]
    AuthenticationFailed { user: String },

    /// Key exchange or subsystem negotiation failed.
    #[error("Handshake failed: {message}")]
    Handshake { message: String },

    /// Any other failure during session setup.
    #[error("Protocol error during setup: {message}")]
    Protocol { message: String },
}

/// Invalid command-line input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    /// The server address could not be parsed.
    #[error("Invalid server address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },
}

impl UsageError {
    /// Create an invalid address error.
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }
}
