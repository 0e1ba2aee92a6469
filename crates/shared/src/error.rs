use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCode {
    NotSignedIn,
    InvalidCredentials,
    EmailAlreadyInUse,
    NotFound,
    Validation,
    Unavailable,
}

/// Failure reported by the authentication service. The message is meant to
/// be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AuthError {
    pub code: AuthErrorCode,
    pub message: String,
}

impl AuthError {
    pub fn new(code: AuthErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_signed_in() -> Self {
        Self::new(AuthErrorCode::NotSignedIn, "No user is currently signed in.")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(AuthErrorCode::Validation, message)
    }
}
