// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types surfaced across the core boundary.
//!
//! Every repository, store, and identity operation returns a `Result`
//! discriminated by this enum; nothing panics across the public API.

use crate::auth::AuthErrorCode;

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{}", .0.user_message())]
    Auth(AuthErrorCode),

    #[error("Remote store unreachable: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Local cache error: {0}")]
    Cache(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether a read may fall back to the local cache for this error.
    ///
    /// Only remote-unreachable conditions qualify; validation and not-found
    /// errors must surface to the caller unchanged.
    pub fn is_network(&self) -> bool {
        matches!(self, AppError::Network(_))
    }

    /// The auth error code, if this is an auth failure.
    pub fn auth_code(&self) -> Option<AuthErrorCode> {
        match self {
            AppError::Auth(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(anyhow::anyhow!("JSON error: {}", err))
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, AppError>;
