// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bot token handling and per-channel key derivation.

use std::sync::Arc;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use super::{AuthError, ChannelKind};

pub(crate) type HmacSha256 = Hmac<Sha256>;

/// Constant message for the Mini App key derivation.
const WEB_APP_DATA: &[u8] = b"WebAppData";

/// Telegram bot token issued by BotFather.
///
/// Immutable once constructed. The `Debug` output never includes the token.
#[derive(Clone)]
pub struct BotToken(Arc<[u8]>);

impl BotToken {
    /// Wrap a bot token, rejecting an empty one.
    pub fn new(token: impl AsRef<[u8]>) -> Result<Self, AuthError> {
        let token = token.as_ref();
        if token.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self(Arc::from(token)))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for BotToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BotToken(<redacted>)")
    }
}

/// Derive the 32-byte HMAC key for a channel.
///
/// - Widget: `SHA-256(token)`
/// - Mini App: `HMAC-SHA-256(key = token, message = "WebAppData")`
pub fn derive_secret_key(token: &BotToken, channel: ChannelKind) -> [u8; 32] {
    match channel {
        ChannelKind::Widget => Sha256::digest(token.expose()).into(),
        ChannelKind::MiniApp => {
            let mut mac = HmacSha256::new_from_slice(token.expose())
                .expect("HMAC-SHA256 accepts keys of any length");
            mac.update(WEB_APP_DATA);
            mac.finalize().into_bytes().into()
        }
    }
}
