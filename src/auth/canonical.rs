// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Data-check string construction.

use super::payload::NormalizedClaims;

/// Claim holding the asserted signature. Never part of the signed content.
pub const HASH_FIELD: &str = "hash";

/// Build the exact string Telegram signed.
///
/// Every claim except `hash`, sorted by key in byte order, rendered as
/// `key=value` and joined with `\n`. Values are emitted verbatim: an `=` or a
/// newline inside a value is not escaped.
pub fn data_check_string(claims: &NormalizedClaims) -> String {
    claims
        .iter()
        .filter(|(key, _)| *key != HASH_FIELD)
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
