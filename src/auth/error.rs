// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Messages are safe to return to clients: they never contain the bot
/// token or the submitted payload.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Request carried no Telegram data at all
    #[error("No Telegram data received")]
    MissingPayload,

    /// Payload could not be decoded into claims
    #[error("Telegram payload is malformed: {0}")]
    MalformedPayload(String),

    /// Required fields missing or signature mismatch
    #[error("Invalid Telegram auth")]
    InvalidAuth,

    /// `auth_date` is outside the freshness window
    #[error("The data is expired")]
    Expired,

    /// Verified payload does not name a user id
    #[error("Telegram ID was not found")]
    MissingUserId,

    /// Verifier constructed without a bot token
    #[error("Telegram bot token is not configured")]
    EmptySecret,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingPayload => "missing_payload",
            AuthError::MalformedPayload(_) => "malformed_payload",
            AuthError::InvalidAuth => "invalid_auth",
            AuthError::Expired => "auth_expired",
            AuthError::MissingUserId => "missing_user_id",
            AuthError::EmptySecret => "empty_secret",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingPayload | AuthError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidAuth | AuthError::Expired | AuthError::MissingUserId => {
                StatusCode::FORBIDDEN
            }
            AuthError::EmptySecret => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
