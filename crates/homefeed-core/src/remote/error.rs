//! Remote call failure type.

use thiserror::Error;

/// Coarse classification of a remote failure, kept for diagnostics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Network-level failure (connection reset, DNS, etc.).
    Connection,
    /// Server-side failure (5xx other than 503).
    Http5xx(u16),
    /// Rejected request, malformed response, or anything else.
    Other,
}

impl ErrorKind {
    /// Whether the failure looks like it may clear up on its own.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// A failed remote call. `Display` is the human-readable message shown to the
/// user, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    kind: ErrorKind,
    message: String,
}

impl RemoteError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Unclassified failure with the given message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Other, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_message_verbatim() {
        let e = RemoteError::new(ErrorKind::Connection, "Network error");
        assert_eq!(e.to_string(), "Network error");
        assert_eq!(e.kind(), ErrorKind::Connection);
        assert!(e.kind().is_transient());
        assert!(!RemoteError::other("x").kind().is_transient());
    }
}
