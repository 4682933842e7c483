//! Error types for forgekit

use thiserror::Error;

/// Result type alias using forgekit's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Forge client error types
#[derive(Error, Debug)]
pub enum Error {
    /// Resource does not exist on the remote
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// Target branch exists with a tip that differs from the source branch
    #[error("Branch {to} already exists and differs from {from}.")]
    BranchDiffers { from: String, to: String },

    /// Non-force ref update refused because the remote tip moved
    #[error("Ref update rejected for {reference}: {message}")]
    RefUpdateRejected { reference: String, message: String },

    /// Remote API responded with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Request failed below the HTTP status layer
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Caller-side misuse detected before any request was sent
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// A bounded wait ran out of attempts
    #[error("Gave up waiting for {operation} after {attempts} attempts")]
    WaitExhausted { operation: String, attempts: u32 },

    /// A wait was stopped through the client's cancellation token
    #[error("Cancelled while waiting for {operation}")]
    Cancelled { operation: String },
}

impl Error {
    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a branch differs error
    pub fn branch_differs(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::BranchDiffers {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a ref update rejected error
    pub fn ref_update_rejected(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RefUpdateRejected {
            reference: reference.into(),
            message: message.into(),
        }
    }

    /// Create an API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a wait exhausted error
    pub fn wait_exhausted(operation: impl Into<String>, attempts: u32) -> Self {
        Self::WaitExhausted {
            operation: operation.into(),
            attempts,
        }
    }

    /// Create a cancelled error
    pub fn cancelled(operation: impl Into<String>) -> Self {
        Self::Cancelled {
            operation: operation.into(),
        }
    }

    /// HTTP status carried by this error, when one applies
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::NotFound { .. } => Some(404),
            Error::BranchDiffers { .. } => Some(422),
            Error::RefUpdateRejected { .. } => Some(422),
            Error::Api { status, .. } => Some(*status),
            Error::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a definitive 404-class miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_differs_display() {
        let err = Error::branch_differs("main", "feature");
        assert_eq!(
            err.to_string(),
            "Branch feature already exists and differs from main."
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::not_found("repos/a/b").status(), Some(404));
        assert_eq!(Error::branch_differs("a", "b").status(), Some(422));
        assert_eq!(Error::ref_update_rejected("heads/x", "stale").status(), Some(422));
        assert_eq!(Error::api(503, "unavailable").status(), Some(503));
        assert_eq!(Error::invalid_request("no username").status(), None);
        assert_eq!(Error::cancelled("fork").status(), None);
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::not_found("repos/a/b").is_not_found());
        assert!(!Error::api(500, "boom").is_not_found());
    }
}
