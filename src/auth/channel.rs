// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Delivery channel detection.

use serde_json::{Map, Value};

use super::payload::NormalizedClaims;

/// Telegram mechanism that produced a claim payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Login Widget: identity fields sit at the top level.
    Widget,
    /// Mini App: identity fields are a JSON object under `user`.
    MiniApp,
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelKind::Widget => write!(f, "widget"),
            ChannelKind::MiniApp => write!(f, "mini_app"),
        }
    }
}

/// Classify claims by shape.
///
/// 1. a non-blank top-level `id` means Widget
/// 2. a non-blank `user` holding a JSON object with a non-null `id` means MiniApp
/// 3. anything else falls back to Widget
///
/// The `hash` field may still be present.
pub fn classify(claims: &NormalizedClaims) -> ChannelKind {
    if claims.non_blank("id").is_some() {
        return ChannelKind::Widget;
    }

    if mini_app_user(claims).is_some() {
        return ChannelKind::MiniApp;
    }

    if claims.non_blank("user").is_some() {
        // Falls back to the widget key. A forged `user` that fails to parse
        // is then rejected by the signature check, not here.
        tracing::debug!("`user` claim is not a Mini App user object, treating payload as widget");
    }

    ChannelKind::Widget
}

/// The decoded Mini App `user` object, when the claims carry one.
///
/// Parse failures are soft: they yield `None` rather than an error.
pub(crate) fn mini_app_user(claims: &NormalizedClaims) -> Option<Map<String, Value>> {
    let raw = claims.non_blank("user")?;

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(user)) if user.get("id").is_some_and(|id| !id.is_null()) => Some(user),
        _ => None,
    }
}
