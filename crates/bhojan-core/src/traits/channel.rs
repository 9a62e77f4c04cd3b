// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound messaging boundary.

use async_trait::async_trait;

use crate::error::BhojanError;
use crate::types::MessageId;

/// Sends plain-text messages to a contact address.
///
/// The engine only ever needs fire-and-forget text delivery; inbound
/// traffic arrives through the gateway webhook, not through this trait.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    /// Sends `body` to the contact address `to`.
    async fn send(&self, to: &str, body: &str) -> Result<MessageId, BhojanError>;
}
