// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram login endpoints.
//!
//! Three transports carry the same claims into [`TelegramAuth::authenticate`]:
//!
//! - `POST /v1/auth/telegram` with a JSON body `{"user": ...}`
//! - `POST /v1/auth/telegram/form` with a form body, as `$.post` sends it
//! - `GET /v1/auth/telegram/callback?...`, the Login Widget's redirect
//!
//! Payload bytes are handed to the verifier without reordering or
//! re-encoding. No session is created: the verified identity is returned
//! and the caller owns it.
//!
//! [`TelegramAuth::authenticate`]: crate::auth::TelegramAuth::authenticate

use std::collections::BTreeMap;

use axum::{
    extract::{RawQuery, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::{normalize, AuthError, IdentityRecord, RawPayload};
use crate::state::AppState;

/// Body of `POST /v1/auth/telegram`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TelegramLoginRequest {
    /// Mini App `initData` string, or the object passed to the Login
    /// Widget's `data-onauth` callback.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub user: Option<Value>,
}

/// Verify a Login Widget object or Mini App `initData` posted as JSON.
#[utoipa::path(
    post,
    path = "/v1/auth/telegram",
    tag = "Auth",
    request_body = TelegramLoginRequest,
    responses(
        (status = 200, description = "Verified Telegram identity", body = IdentityRecord),
        (status = 400, description = "No Telegram data or malformed payload"),
        (status = 403, description = "Invalid, expired, or missing user id"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<TelegramLoginRequest>,
) -> Result<Json<IdentityRecord>, AuthError> {
    let payload = payload_from_json(request.user.unwrap_or(Value::Null))?;
    authenticate(&state, &payload)
}

/// Verify a form-encoded post.
///
/// `user=<initData>` is a Mini App payload; `user[id]=...&user[hash]=...`
/// is a Login Widget object serialized by jQuery.
#[utoipa::path(
    post,
    path = "/v1/auth/telegram/form",
    tag = "Auth",
    request_body(content = String, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Verified Telegram identity", body = IdentityRecord),
        (status = 400, description = "No Telegram data or malformed payload"),
        (status = 403, description = "Invalid, expired, or missing user id"),
    )
)]
pub async fn login_form(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<IdentityRecord>, AuthError> {
    let payload = payload_from_form(&body)?;
    authenticate(&state, &payload)
}

/// Verify the Login Widget redirect (`data-auth-url`) query string.
#[utoipa::path(
    get,
    path = "/v1/auth/telegram/callback",
    tag = "Auth",
    responses(
        (status = 200, description = "Verified Telegram identity", body = IdentityRecord),
        (status = 400, description = "No Telegram data or malformed payload"),
        (status = 403, description = "Invalid, expired, or missing user id"),
    )
)]
pub async fn widget_callback(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<IdentityRecord>, AuthError> {
    let query = query
        .filter(|q| !q.is_empty())
        .ok_or(AuthError::MissingPayload)?;
    authenticate(&state, &RawPayload::Form(query))
}

fn authenticate(state: &AppState, payload: &RawPayload) -> Result<Json<IdentityRecord>, AuthError> {
    match state
        .auth
        .authenticate(payload, chrono::Utc::now().timestamp())
    {
        Ok(identity) => {
            info!(user_id = identity.id, "Telegram login verified");
            Ok(Json(identity))
        }
        Err(e) => {
            warn!(error_code = e.error_code(), "Telegram login rejected");
            Err(e)
        }
    }
}

fn payload_from_json(user: Value) -> Result<RawPayload, AuthError> {
    match user {
        Value::Null => Err(AuthError::MissingPayload),
        Value::String(init_data) => Ok(RawPayload::Form(init_data)),
        Value::Object(fields) => {
            let mut claims = BTreeMap::new();
            for (key, value) in fields {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(AuthError::MalformedPayload(format!(
                            "field `{key}` is not a scalar"
                        )))
                    }
                };
                claims.insert(key, value);
            }
            Ok(RawPayload::Decoded(claims))
        }
        _ => Err(AuthError::MalformedPayload(
            "`user` must be a string or an object".to_string(),
        )),
    }
}

fn payload_from_form(body: &str) -> Result<RawPayload, AuthError> {
    let fields = normalize(&RawPayload::Form(body.to_string()))?;

    if let Some(init_data) = fields.get("user") {
        return Ok(RawPayload::Form(init_data.to_string()));
    }

    let claims: BTreeMap<String, String> = fields
        .iter()
        .filter_map(|(key, value)| {
            let inner = key.strip_prefix("user[")?.strip_suffix(']')?;
            Some((inner.to_string(), value.to_string()))
        })
        .collect();

    if claims.is_empty() {
        return Err(AuthError::MissingPayload);
    }
    Ok(RawPayload::Decoded(claims))
}
