// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram Unified Auth - Login Widget & Mini App Verification
//!
//! This crate verifies that identity claims really come from Telegram,
//! whether they arrive through the redirect-based Login Widget or through a
//! Mini App's `initData`, and projects them into one identity record.
//!
//! ## Modules
//!
//! - `auth` - Claim normalization, channel detection, signature verification
//! - `api` - HTTP API handlers (Axum)
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
