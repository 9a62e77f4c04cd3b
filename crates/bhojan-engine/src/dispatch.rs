// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase notification dispatcher.
//!
//! Every attempt writes one audit record, including attempts that are never
//! sent. The record is inserted synchronously with the triggering commit;
//! the actual send runs as a detached task that updates the same record to
//! `delivered` or `failed`. A send failure is only ever visible in the
//! audit record -- it never propagates to the caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use bhojan_core::types::{NotificationRecord, NotifyEvent, NotifyStatus};
use bhojan_core::{BhojanError, MessageChannel, NotificationStore};

/// One notification attempt.
#[derive(Debug, Clone)]
pub struct NotificationRequest<'a> {
    pub restaurant_id: &'a str,
    pub order_id: Option<&'a str>,
    pub event: NotifyEvent,
    /// Resolved recipient address; `None` records a `skipped` attempt.
    pub recipient: Option<&'a str>,
    /// Restaurant preference for this event; `false` records `disabled`.
    pub enabled: bool,
    pub body: &'a str,
}

/// Handle to a dispatched attempt. `task` is present only when a send was
/// actually started; awaiting it is only useful in tests.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub record_id: String,
    pub status: NotifyStatus,
    pub task: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct Dispatcher {
    notifications: Arc<dyn NotificationStore>,
    channel: Arc<dyn MessageChannel>,
    channel_name: String,
}

impl Dispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationStore>,
        channel: Arc<dyn MessageChannel>,
        channel_name: impl Into<String>,
    ) -> Self {
        Self { notifications, channel, channel_name: channel_name.into() }
    }

    pub(crate) fn notifications(&self) -> &Arc<dyn NotificationStore> {
        &self.notifications
    }

    /// Record the attempt and, when it is sendable, start the detached send.
    pub async fn dispatch(
        &self,
        request: NotificationRequest<'_>,
        now: DateTime<Utc>,
    ) -> Result<DispatchOutcome, BhojanError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now_str = crate::rfc3339(now);

        let recipient = request.recipient.map(str::trim).filter(|r| !r.is_empty());
        let status = if !request.enabled {
            NotifyStatus::Disabled
        } else if recipient.is_none() {
            NotifyStatus::Skipped
        } else {
            NotifyStatus::Pending
        };

        let record = NotificationRecord {
            id: id.clone(),
            restaurant_id: request.restaurant_id.to_string(),
            order_id: request.order_id.map(str::to_string),
            channel: self.channel_name.clone(),
            event: request.event,
            recipient: recipient.unwrap_or_default().to_string(),
            body: request.body.to_string(),
            status,
            button_clicked: None,
            error_message: None,
            created_at: now_str.clone(),
            updated_at: now_str,
        };
        self.notifications.create_notification(&record).await?;

        if status != NotifyStatus::Pending {
            tracing::debug!(
                record_id = %id,
                event = %request.event,
                status = %status,
                "notification suppressed"
            );
            return Ok(DispatchOutcome { record_id: id, status, task: None });
        }

        let notifications = Arc::clone(&self.notifications);
        let channel = Arc::clone(&self.channel);
        let record_id = id.clone();
        let to = record.recipient.clone();
        let body = record.body.clone();
        let event = request.event;
        let task = tokio::spawn(async move {
            let finished_at = crate::rfc3339(Utc::now());
            let update = match channel.send(&to, &body).await {
                Ok(message_id) => {
                    tracing::info!(record_id = %record_id, event = %event, message_id = %message_id.0, "notification sent");
                    notifications
                        .update_notification_status(
                            &record_id,
                            NotifyStatus::Delivered,
                            None,
                            &finished_at,
                        )
                        .await
                }
                Err(error) => {
                    tracing::warn!(record_id = %record_id, event = %event, %error, "notification send failed");
                    notifications
                        .update_notification_status(
                            &record_id,
                            NotifyStatus::Failed,
                            Some(&error.to_string()),
                            &finished_at,
                        )
                        .await
                }
            };
            if let Err(error) = update {
                tracing::error!(record_id = %record_id, %error, "failed to update notification record");
            }
        });

        Ok(DispatchOutcome { record_id: id, status, task: Some(task) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhojan_test_utils::{MemoryStore, MockChannel};

    fn dispatcher(store: &MemoryStore, channel: &Arc<MockChannel>) -> Dispatcher {
        Dispatcher::new(Arc::new(store.clone()), channel.clone(), "whatsapp")
    }

    fn request<'a>(recipient: Option<&'a str>, enabled: bool) -> NotificationRequest<'a> {
        NotificationRequest {
            restaurant_id: "r1",
            order_id: Some("000000007"),
            event: NotifyEvent::Preparing,
            recipient,
            enabled,
            body: "your order is being prepared",
        }
    }

    #[tokio::test]
    async fn successful_send_marks_the_record_delivered() {
        let store = MemoryStore::new();
        let channel = Arc::new(MockChannel::new());
        let outcome = dispatcher(&store, &channel)
            .dispatch(request(Some("919876543210"), true), Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.status, NotifyStatus::Pending);
        outcome.task.unwrap().await.unwrap();

        let records = store.all_notifications().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, NotifyStatus::Delivered);
        assert_eq!(channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn failed_send_captures_the_error() {
        let store = MemoryStore::new();
        let channel = Arc::new(MockChannel::new());
        channel.fail_sends().await;

        let outcome = dispatcher(&store, &channel)
            .dispatch(request(Some("919876543210"), true), Utc::now())
            .await
            .unwrap();
        outcome.task.unwrap().await.unwrap();

        let records = store.all_notifications().await;
        assert_eq!(records[0].status, NotifyStatus::Failed);
        assert!(records[0].error_message.as_deref().unwrap().contains("mock send failure"));
        // The attempt was still made.
        assert_eq!(channel.sent_count().await, 1);
    }

    #[tokio::test]
    async fn disabled_attempts_are_logged_and_never_sent() {
        let store = MemoryStore::new();
        let channel = Arc::new(MockChannel::new());
        let outcome = dispatcher(&store, &channel)
            .dispatch(request(Some("919876543210"), false), Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.status, NotifyStatus::Disabled);
        assert!(outcome.task.is_none());
        assert_eq!(store.all_notifications().await[0].status, NotifyStatus::Disabled);
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn missing_recipient_is_skipped_not_dropped() {
        let store = MemoryStore::new();
        let channel = Arc::new(MockChannel::new());
        let outcome = dispatcher(&store, &channel)
            .dispatch(request(None, true), Utc::now())
            .await
            .unwrap();

        assert_eq!(outcome.status, NotifyStatus::Skipped);
        assert!(outcome.task.is_none());
        assert_eq!(store.all_notifications().await.len(), 1);
        assert_eq!(channel.sent_count().await, 0);
    }
}
