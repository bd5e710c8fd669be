// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TelegramAuth;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<TelegramAuth>,
}

impl AppState {
    pub fn new(auth: TelegramAuth) -> Self {
        Self {
            auth: Arc::new(auth),
        }
    }
}
