// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Verification of Telegram authentication data for the two delivery
//! channels Telegram offers:
//!
//! - **Login Widget**: identity fields (`id`, `first_name`, ...) arrive at the
//!   top level, either as a decoded object or as the redirect query string
//! - **Mini App**: `Telegram.WebApp.initData`, a query string whose `user`
//!   field is a JSON object
//!
//! ## Verification Flow
//!
//! 1. [`normalize`] the raw payload into [`NormalizedClaims`]
//! 2. reject if `hash` or `auth_date` is missing
//! 3. report [`Verdict::Expired`] if `auth_date` is older than 300 seconds
//! 4. [`classify`] the channel and [`derive_secret_key`] for it
//! 5. HMAC-SHA-256 the [`data_check_string`] and compare with `hash` in
//!    constant time
//! 6. on success, [`project_identity`] into an [`IdentityRecord`]
//!
//! ## Security
//!
//! - The bot token is immutable after construction and redacted in `Debug`
//! - Expired payloads are rejected before any HMAC work
//! - Signature comparison is constant time (`subtle`)

pub mod canonical;
pub mod channel;
pub mod error;
pub mod identity;
pub mod key;
pub mod payload;
pub mod verifier;

pub use canonical::data_check_string;
pub use channel::{classify, ChannelKind};
pub use error::AuthError;
pub use identity::{project_identity, IdentityRecord};
pub use key::{derive_secret_key, BotToken};
pub use payload::{normalize, NormalizedClaims, RawPayload};
pub use verifier::{TelegramAuth, Verdict, MAX_AUTH_AGE_SECS};
