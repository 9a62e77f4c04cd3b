// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging channel for deterministic testing.
//!
//! `MockChannel` implements `MessageChannel` with captured outbound messages
//! for assertion in tests, plus an injectable failure mode for exercising
//! the failure path of the notification dispatcher.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bhojan_core::types::{MessageId, OutboundMessage};
use bhojan_core::{BhojanError, MessageChannel};

/// A mock messaging channel for testing.
///
/// Messages passed to `send()` are captured and retrievable via
/// `sent_messages()`. Calling `fail_sends()` makes every send return a
/// channel error (until `succeed()` restores delivery) while still
/// recording the attempt.
pub struct MockChannel {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockChannel {
    /// Create a new mock channel with an empty capture buffer.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Make all subsequent sends fail until `succeed()` is called.
    pub async fn fail_sends(&self) {
        *self.failing.lock().await = true;
    }

    /// Restore successful sending.
    pub async fn succeed(&self) {
        *self.failing.lock().await = false;
    }

    /// Get all messages that were passed to `send()`, including failed ones.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of send attempts.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Get the bodies of all messages sent to one recipient, in order.
    pub async fn bodies_to(&self, to: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.to == to)
            .map(|m| m.body.clone())
            .collect()
    }

    /// Clear the capture buffer.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageChannel for MockChannel {
    async fn send(&self, to: &str, body: &str) -> Result<MessageId, BhojanError> {
        self.sent.lock().await.push(OutboundMessage {
            to: to.to_string(),
            body: body.to_string(),
        });
        if *self.failing.lock().await {
            return Err(BhojanError::Channel {
                message: "mock send failure".to_string(),
                source: None,
            });
        }
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }
}
