// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wire payloads and their normalized claim map.
//!
//! Telegram delivers the same kind of signed claim in two shapes:
//!
//! - the Mini App hands the client a URL-query encoded `initData` string
//! - the Login Widget hands the client an already-decoded object
//!
//! [`normalize`] resolves either shape once into [`NormalizedClaims`], which
//! is the only type the rest of the pipeline consumes.

use std::collections::BTreeMap;

use percent_encoding::percent_decode;

use super::AuthError;

/// Claim payload exactly as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// URL-query encoded form data (`Telegram.WebApp.initData` or the
    /// widget's redirect query string).
    Form(String),
    /// Key/value claims that were already decoded by the transport.
    Decoded(BTreeMap<String, String>),
}

impl From<String> for RawPayload {
    fn from(value: String) -> Self {
        RawPayload::Form(value)
    }
}

impl From<&str> for RawPayload {
    fn from(value: &str) -> Self {
        RawPayload::Form(value.to_string())
    }
}

impl From<BTreeMap<String, String>> for RawPayload {
    fn from(value: BTreeMap<String, String>) -> Self {
        RawPayload::Decoded(value)
    }
}

/// Flat string claims with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedClaims(BTreeMap<String, String>);

impl NormalizedClaims {
    /// Value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key` when it is present and not blank.
    ///
    /// Blank means empty or the literal `"0"`, which Telegram never sends as
    /// a meaningful id, hash or timestamp.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !is_blank(value))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate claims in ascending byte order of their keys.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "0"
}

/// Resolve a raw payload into normalized claims.
///
/// A decoded map is copied, so later changes to the caller's map are not
/// observed. A form string is decoded as `application/x-www-form-urlencoded`;
/// when a key repeats the last value wins.
pub fn normalize(payload: &RawPayload) -> Result<NormalizedClaims, AuthError> {
    match payload {
        RawPayload::Decoded(map) => Ok(NormalizedClaims(map.clone())),
        RawPayload::Form(query) => parse_form(query).map(NormalizedClaims),
    }
}

fn parse_form(query: &str) -> Result<BTreeMap<String, String>, AuthError> {
    let mut claims = BTreeMap::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key)?;
        if key.is_empty() {
            continue;
        }

        let value = decode_component(value)?;
        claims.insert(key, value);
    }

    Ok(claims)
}

fn decode_component(raw: &str) -> Result<String, AuthError> {
    check_escapes(raw)?;

    let spaced = raw.replace('+', " ");
    percent_decode(spaced.as_bytes())
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| AuthError::MalformedPayload("decoded data is not valid UTF-8".to_string()))
}

/// Reject `%` sequences that are not followed by two hex digits.
///
/// `percent_decode` passes such sequences through verbatim, which would
/// silently change the bytes that end up in the data-check string.
fn check_escapes(raw: &str) -> Result<(), AuthError> {
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(AuthError::MalformedPayload(format!(
                    "invalid percent escape at byte {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(())
}

#[cfg(test)]
impl FromIterator<(String, String)> for NormalizedClaims {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        NormalizedClaims(iter.into_iter().collect())
    }
}
