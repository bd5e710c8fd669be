// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity projection.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use super::channel::{classify, mini_app_user};
use super::payload::NormalizedClaims;
use super::ChannelKind;

/// Normalized Telegram user, identical for both channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityRecord {
    /// Telegram user id (`0` when the payload carries none)
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    /// Profile picture URL (Login Widget only)
    pub photo_url: String,
}

/// Where identity fields are read from.
enum Source<'a> {
    Claims(&'a NormalizedClaims),
    User(Map<String, Value>),
}

impl Source<'_> {
    fn id(&self) -> i64 {
        match self {
            Source::Claims(claims) => claims.get("id").map_or(0, parse_id),
            Source::User(user) => match user.get("id") {
                Some(Value::Number(n)) => n
                    .as_i64()
                    .or_else(|| n.as_f64().map(|f| f as i64))
                    .unwrap_or(0),
                Some(Value::String(s)) => parse_id(s),
                _ => 0,
            },
        }
    }

    fn text(&self, field: &str) -> String {
        match self {
            Source::Claims(claims) => claims.get(field).unwrap_or_default().to_string(),
            Source::User(user) => match user.get(field) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            },
        }
    }
}

fn parse_id(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(0)
}

/// Build the identity record for claims.
///
/// Mini App claims are read from the decoded `user` object, widget claims
/// from the top level. Missing fields default to `0` / `""`. No verification
/// happens here.
pub fn project_identity(claims: &NormalizedClaims) -> IdentityRecord {
    let source = match classify(claims) {
        ChannelKind::MiniApp => match mini_app_user(claims) {
            Some(user) => Source::User(user),
            None => Source::Claims(claims),
        },
        ChannelKind::Widget => Source::Claims(claims),
    };

    IdentityRecord {
        id: source.id(),
        first_name: source.text("first_name"),
        last_name: source.text("last_name"),
        username: source.text("username"),
        photo_url: source.text("photo_url"),
    }
}
