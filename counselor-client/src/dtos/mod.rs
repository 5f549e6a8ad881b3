pub mod auth;
pub mod chat;
pub mod onboarding;
pub mod profile;
pub mod universities;

use client_core::ApiError;
use serde::Deserialize;

/// Application-level response envelope used by most counselor endpoints:
/// `{"status": "success" | "error", "message": ..., "data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub status: String,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    fn rejection(self) -> ApiError {
        ApiError::Api {
            status: 200,
            message: self
                .message
                .unwrap_or_else(|| "request failed".to_string()),
        }
    }

    /// Unwrap `data`, turning a `status: "error"` envelope into
    /// [`ApiError::Api`].
    pub fn into_data(self) -> Result<T, ApiError> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        self.data.ok_or_else(|| ApiError::Api {
            status: 200,
            message: "success response carried no data".to_string(),
        })
    }

    /// Like [`Envelope::into_data`] for endpoints whose success payload is
    /// optional or irrelevant.
    pub fn ensure_success(self) -> Result<(), ApiError> {
        if self.is_success() {
            Ok(())
        } else {
            Err(self.rejection())
        }
    }
}
