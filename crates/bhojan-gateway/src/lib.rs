// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for bhojan.
//!
//! Exposes the messaging provider webhook, the printed-QR scan redirect,
//! and a health endpoint. All conversational behavior lives in
//! `bhojan-engine`; the gateway only translates HTTP to engine calls.

pub mod handlers;
pub mod server;

pub use server::{start_server, GatewayState, ServerConfig};
