use std::collections::BTreeMap;

use thiserror::Error;

/// Client-side error taxonomy.
///
/// Every failure a caller can observe from the SDK maps onto one of these
/// variants. The one internally-handled case (an expired access token that
/// is recovered by a refresh-and-retry cycle) never surfaces here.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The refresh token was missing or rejected. The session has been
    /// cleared; the embedding layer must send the user back through login.
    #[error("session invalid, re-authentication required")]
    MustReauthenticate,

    /// A 401 that is not recoverable by refreshing: either the retry with a
    /// fresh token was rejected again, or the request targeted an
    /// auth-exempt path (login).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Request rejected client-side before hitting the wire.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    /// 4xx with a field-level error payload, suitable for form display.
    #[error("validation failed")]
    Validation { fields: BTreeMap<String, Vec<String>> },

    /// Application-level rejection: a 4xx without field detail, or a
    /// `status: "error"` envelope.
    #[error("request rejected ({status}): {message}")]
    Api { status: u16, message: String },

    /// 5xx from the server. No session state is touched.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Transport failure or timeout. No session state is touched; safe to
    /// retry.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    /// Durable session file could not be read or written.
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// True for failures that left no trace on the server or the session
    /// and can simply be re-issued.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }

    /// True when the caller must route the user back through
    /// authentication before anything else will succeed.
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::MustReauthenticate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Server {
            status: 503,
            message: "down".into()
        }
        .is_retryable());
        assert!(!ApiError::MustReauthenticate.is_retryable());
        assert!(!ApiError::Api {
            status: 409,
            message: "conflict".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_requires_login() {
        assert!(ApiError::MustReauthenticate.requires_login());
        assert!(!ApiError::Unauthorized("nope".into()).requires_login());
    }
}
