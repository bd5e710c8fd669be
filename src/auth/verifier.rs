// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature and freshness verification.

use hmac::Mac;
use subtle::ConstantTimeEq;

use super::canonical::{data_check_string, HASH_FIELD};
use super::channel::classify;
use super::identity::{project_identity, IdentityRecord};
use super::key::{derive_secret_key, BotToken, HmacSha256};
use super::payload::{normalize, NormalizedClaims, RawPayload};
use super::AuthError;

/// Claim holding the issue time as Unix seconds.
pub const AUTH_DATE_FIELD: &str = "auth_date";

/// Maximum accepted age of `auth_date` (5 minutes). Inclusive.
pub const MAX_AUTH_AGE_SECS: i64 = 300;

/// Outcome of verifying a claim payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Signed with the configured bot token and fresh.
    Valid,
    /// `auth_date` is outside the freshness window. The signature was not
    /// checked.
    Expired,
    /// Required fields are missing or the signature does not match.
    Invalid,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        self == Verdict::Valid
    }

    /// Map the verdict to the error a caller should reject with.
    pub fn into_result(self) -> Result<(), AuthError> {
        match self {
            Verdict::Valid => Ok(()),
            Verdict::Expired => Err(AuthError::Expired),
            Verdict::Invalid => Err(AuthError::InvalidAuth),
        }
    }
}

/// Verifier for Telegram Login Widget and Mini App payloads.
///
/// Holds only the bot token and is cheap to clone; share one instance across
/// request handlers.
///
/// # Example
///
/// ```rust,ignore
/// let auth = TelegramAuth::new(std::env::var("TELEGRAM_BOT_TOKEN")?)?;
/// let payload = RawPayload::from(init_data);
/// match auth.verify(&payload, chrono::Utc::now().timestamp())? {
///     Verdict::Valid => { let user = auth.extract_identity(&payload)?; }
///     Verdict::Expired => { /* ask the user to retry */ }
///     Verdict::Invalid => { /* reject */ }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TelegramAuth {
    token: BotToken,
}

impl TelegramAuth {
    /// Create a verifier, rejecting an empty token.
    pub fn new(token: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        Ok(Self::from_token(BotToken::new(token)?))
    }

    pub fn from_token(token: BotToken) -> Self {
        Self { token }
    }

    /// Verify a payload against the bot token at time `now` (Unix seconds).
    ///
    /// Only a payload that cannot be normalized is an error; every other
    /// failure is a [`Verdict`].
    pub fn verify(&self, payload: &RawPayload, now: i64) -> Result<Verdict, AuthError> {
        let claims = normalize(payload)?;
        Ok(self.verify_claims(&claims, now))
    }

    /// [`verify`](Self::verify) against the system clock.
    pub fn verify_now(&self, payload: &RawPayload) -> Result<Verdict, AuthError> {
        self.verify(payload, chrono::Utc::now().timestamp())
    }

    /// Verify already-normalized claims.
    pub fn verify_claims(&self, claims: &NormalizedClaims, now: i64) -> Verdict {
        let (Some(asserted), Some(auth_date)) =
            (claims.non_blank(HASH_FIELD), claims.non_blank(AUTH_DATE_FIELD))
        else {
            tracing::debug!("payload is missing hash or auth_date");
            return Verdict::Invalid;
        };

        let Ok(auth_date) = auth_date.trim().parse::<i64>() else {
            tracing::debug!("auth_date is not an integer timestamp");
            return Verdict::Invalid;
        };

        let age = now.saturating_sub(auth_date);
        if age > MAX_AUTH_AGE_SECS {
            tracing::debug!(age_secs = age, "payload is expired");
            return Verdict::Expired;
        }

        let channel = classify(claims);
        let key = derive_secret_key(&self.token, channel);
        let expected = sign(&key, &data_check_string(claims));

        let verdict = if bool::from(expected.as_bytes().ct_eq(asserted.as_bytes())) {
            Verdict::Valid
        } else {
            Verdict::Invalid
        };

        tracing::debug!(%channel, ?verdict, "verified telegram payload");
        verdict
    }

    /// Project the identity asserted by a payload.
    ///
    /// Performs no verification. Call it only after [`verify`](Self::verify)
    /// returned [`Verdict::Valid`] for the same payload.
    pub fn extract_identity(&self, payload: &RawPayload) -> Result<IdentityRecord, AuthError> {
        let claims = normalize(payload)?;
        Ok(project_identity(&claims))
    }

    /// Verify a payload and return its identity in one step.
    ///
    /// Normalizes once, rejects expired or invalid payloads and payloads that
    /// do not name a user id.
    pub fn authenticate(&self, payload: &RawPayload, now: i64) -> Result<IdentityRecord, AuthError> {
        let claims = normalize(payload)?;
        self.verify_claims(&claims, now).into_result()?;

        let identity = project_identity(&claims);
        if identity.id == 0 {
            return Err(AuthError::MissingUserId);
        }
        Ok(identity)
    }
}

/// Lower-case hex HMAC-SHA-256 of `message`.
pub(crate) fn sign(key: &[u8; 32], message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts keys of any length");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{claims, decoded, sign_claims, TOKEN};
    use crate::auth::ChannelKind;

    const NOW: i64 = 1_700_000_000;

    fn auth() -> TelegramAuth {
        TelegramAuth::new(TOKEN).unwrap()
    }

    fn widget_claims(auth_date: i64) -> NormalizedClaims {
        sign_claims(
            claims(&[
                ("id", "100"),
                ("first_name", "Ana"),
                ("auth_date", &auth_date.to_string()),
            ]),
            ChannelKind::Widget,
        )
    }

    fn mini_app_claims(auth_date: i64) -> NormalizedClaims {
        sign_claims(
            claims(&[
                ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
                (
                    "user",
                    r#"{"id":279058397,"first_name":"Vladislav","last_name":"Kibenko","username":"vdkfrost","language_code":"ru"}"#,
                ),
                ("auth_date", &auth_date.to_string()),
            ]),
            ChannelKind::MiniApp,
        )
    }

    fn with(claims: &NormalizedClaims, key: &str, value: &str) -> NormalizedClaims {
        claims
            .iter()
            .map(|(k, v)| {
                let v = if k == key { value } else { v };
                (k.to_string(), v.to_string())
            })
            .chain((!claims.contains(key)).then(|| (key.to_string(), value.to_string())))
            .collect()
    }

    fn without(claims: &NormalizedClaims, key: &str) -> NormalizedClaims {
        claims
            .iter()
            .filter(|(k, _)| *k != key)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_token_cannot_construct() {
        assert!(matches!(TelegramAuth::new(""), Err(AuthError::EmptySecret)));
    }

    #[test]
    fn signed_widget_claims_are_valid() {
        assert_eq!(auth().verify_claims(&widget_claims(NOW), NOW), Verdict::Valid);
    }

    #[test]
    fn signed_mini_app_claims_are_valid() {
        assert_eq!(auth().verify_claims(&mini_app_claims(NOW), NOW), Verdict::Valid);
    }

    #[test]
    fn tampered_value_is_invalid() {
        let tampered = with(&widget_claims(NOW), "first_name", "Anna");
        assert_eq!(auth().verify_claims(&tampered, NOW), Verdict::Invalid);
    }

    #[test]
    fn any_single_character_flip_is_invalid() {
        let signed = widget_claims(NOW);
        for (key, value) in signed.iter().filter(|(k, _)| *k != HASH_FIELD && *k != AUTH_DATE_FIELD) {
            let mut flipped: Vec<char> = value.chars().collect();
            for i in 0..flipped.len() {
                let original = flipped[i];
                flipped[i] = if original == 'x' { 'y' } else { 'x' };
                let tampered = with(&signed, key, &flipped.iter().collect::<String>());
                assert_eq!(
                    auth().verify_claims(&tampered, NOW),
                    Verdict::Invalid,
                    "flip of {key}[{i}] must be rejected"
                );
                flipped[i] = original;
            }
        }
    }

    #[test]
    fn added_claim_is_invalid() {
        let extended = with(&widget_claims(NOW), "username", "ana");
        assert_eq!(auth().verify_claims(&extended, NOW), Verdict::Invalid);
    }

    #[test]
    fn wrong_token_is_invalid() {
        let other = TelegramAuth::new("43:othersecret").unwrap();
        assert_eq!(other.verify_claims(&widget_claims(NOW), NOW), Verdict::Invalid);
        assert_eq!(other.verify_claims(&mini_app_claims(NOW), NOW), Verdict::Invalid);
    }

    #[test]
    fn mini_app_hash_does_not_verify_as_widget() {
        let signed = sign_claims(
            claims(&[("id", "100"), ("auth_date", &NOW.to_string())]),
            ChannelKind::MiniApp,
        );
        assert_eq!(auth().verify_claims(&signed, NOW), Verdict::Invalid);
    }

    #[test]
    fn upper_case_hash_is_invalid() {
        let signed = widget_claims(NOW);
        let upper = signed.get(HASH_FIELD).unwrap().to_uppercase();
        let shouted = with(&signed, HASH_FIELD, &upper);
        assert_eq!(auth().verify_claims(&shouted, NOW), Verdict::Invalid);
    }

    #[test]
    fn missing_or_blank_required_fields_are_invalid() {
        let signed = widget_claims(NOW);
        assert_eq!(auth().verify_claims(&without(&signed, HASH_FIELD), NOW), Verdict::Invalid);
        assert_eq!(
            auth().verify_claims(&without(&signed, AUTH_DATE_FIELD), NOW),
            Verdict::Invalid
        );
        assert_eq!(auth().verify_claims(&with(&signed, HASH_FIELD, ""), NOW), Verdict::Invalid);
        assert_eq!(
            auth().verify_claims(&with(&signed, AUTH_DATE_FIELD, "0"), NOW),
            Verdict::Invalid
        );
    }

    #[test]
    fn non_numeric_auth_date_is_invalid() {
        let signed = sign_claims(
            claims(&[("id", "100"), ("auth_date", "yesterday")]),
            ChannelKind::Widget,
        );
        assert_eq!(auth().verify_claims(&signed, NOW), Verdict::Invalid);
    }

    #[test]
    fn freshness_boundary_is_inclusive() {
        let at_limit = widget_claims(NOW - MAX_AUTH_AGE_SECS);
        assert_eq!(auth().verify_claims(&at_limit, NOW), Verdict::Valid);

        let past_limit = widget_claims(NOW - MAX_AUTH_AGE_SECS - 1);
        assert_eq!(auth().verify_claims(&past_limit, NOW), Verdict::Expired);
    }

    #[test]
    fn expiry_is_reported_before_signature() {
        let stale = with(&widget_claims(NOW - 400), "first_name", "Anna");
        assert_eq!(auth().verify_claims(&stale, NOW), Verdict::Expired);

        let stale_mini_app = mini_app_claims(NOW - 400);
        assert_eq!(auth().verify_claims(&stale_mini_app, NOW), Verdict::Expired);
    }

    #[test]
    fn verdict_maps_to_errors() {
        assert!(Verdict::Valid.into_result().is_ok());
        assert!(matches!(Verdict::Expired.into_result(), Err(AuthError::Expired)));
        assert!(matches!(Verdict::Invalid.into_result(), Err(AuthError::InvalidAuth)));
        assert!(Verdict::Valid.is_valid());
        assert!(!Verdict::Expired.is_valid());
    }

    #[test]
    fn malformed_form_payload_is_an_error() {
        let result = auth().verify(&RawPayload::from("hash=%zz"), NOW);
        assert!(matches!(result, Err(AuthError::MalformedPayload(_))));
    }

    #[test]
    fn authenticate_returns_identity() {
        let identity = auth()
            .authenticate(&decoded(&widget_claims(NOW)), NOW)
            .unwrap();
        assert_eq!(identity.id, 100);
        assert_eq!(identity.first_name, "Ana");
    }

    #[test]
    fn authenticate_rejects_missing_user_id() {
        let signed = sign_claims(
            claims(&[("first_name", "Ana"), ("auth_date", &NOW.to_string())]),
            ChannelKind::Widget,
        );
        assert!(matches!(
            auth().authenticate(&decoded(&signed), NOW),
            Err(AuthError::MissingUserId)
        ));
    }

    #[test]
    fn authenticate_reports_expired() {
        let stale = decoded(&widget_claims(NOW - 301));
        assert!(matches!(auth().authenticate(&stale, NOW), Err(AuthError::Expired)));
    }

    #[test]
    fn future_auth_date_is_not_expired() {
        let ahead = widget_claims(NOW + 60);
        assert_eq!(auth().verify_claims(&ahead, NOW), Verdict::Valid);
    }

    #[test]
    fn extreme_auth_date_does_not_overflow() {
        let signed = sign_claims(
            claims(&[("id", "100"), ("auth_date", &i64::MIN.to_string())]),
            ChannelKind::Widget,
        );
        assert_eq!(auth().verify_claims(&signed, i64::MAX), Verdict::Expired);
    }
}
