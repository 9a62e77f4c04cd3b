// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification audit trail queries.

use bhojan_core::BhojanError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{NotificationRecord, NotifyStatus};
use crate::queries::parse_enum;

const NOTIFICATION_COLS: &str = "id, restaurant_id, order_id, channel, event, recipient, body,
                                 status, button_clicked, error_message, created_at, updated_at";

fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<NotificationRecord> {
    let event: String = row.get(4)?;
    let status: String = row.get(7)?;
    Ok(NotificationRecord {
        id: row.get(0)?,
        restaurant_id: row.get(1)?,
        order_id: row.get(2)?,
        channel: row.get(3)?,
        event: parse_enum(4, &event)?,
        recipient: row.get(5)?,
        body: row.get(6)?,
        status: parse_enum(7, &status)?,
        button_clicked: row.get(8)?,
        error_message: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

/// Insert an attempt record.
pub async fn create_notification(
    db: &Database,
    record: &NotificationRecord,
) -> Result<(), BhojanError> {
    let n = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notifications
                     (id, restaurant_id, order_id, channel, event, recipient, body,
                      status, button_clicked, error_message, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    n.id,
                    n.restaurant_id,
                    n.order_id,
                    n.channel,
                    n.event.to_string(),
                    n.recipient,
                    n.body,
                    n.status.to_string(),
                    n.button_clicked,
                    n.error_message,
                    n.created_at,
                    n.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Settle an attempt with its final status and optional error message.
pub async fn update_notification_status(
    db: &Database,
    id: &str,
    status: NotifyStatus,
    error_message: Option<&str>,
    now: &str,
) -> Result<(), BhojanError> {
    let id = id.to_string();
    let status = status.to_string();
    let error_message = error_message.map(|s| s.to_string());
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE notifications SET status = ?1, error_message = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![status, error_message, now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Record which operator action answered a notification.
pub async fn mark_button_clicked(
    db: &Database,
    id: &str,
    button: &str,
    now: &str,
) -> Result<(), BhojanError> {
    let id = id.to_string();
    let button = button.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE notifications SET button_clicked = ?1, updated_at = ?2 WHERE id = ?3",
                params![button, now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Recent attempts for one restaurant, newest first.
pub async fn list_notifications_by_restaurant(
    db: &Database,
    restaurant_id: &str,
    limit: u32,
) -> Result<Vec<NotificationRecord>, BhojanError> {
    let restaurant_id = restaurant_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTIFICATION_COLS} FROM notifications
                 WHERE restaurant_id = ?1 ORDER BY created_at DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![restaurant_id, limit], row_to_notification)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Attempts tied to one order, newest first.
pub async fn list_notifications_by_order(
    db: &Database,
    order_id: &str,
) -> Result<Vec<NotificationRecord>, BhojanError> {
    let order_id = order_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {NOTIFICATION_COLS} FROM notifications
                 WHERE order_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![order_id], row_to_notification)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhojan_core::types::NotifyEvent;
    use tempfile::tempdir;

    fn make_record(id: &str, status: NotifyStatus, created_at: &str) -> NotificationRecord {
        NotificationRecord {
            id: id.to_string(),
            restaurant_id: "r1".to_string(),
            order_id: Some("000000007".to_string()),
            channel: "whatsapp".to_string(),
            event: NotifyEvent::NewOrder,
            recipient: "911234567890".to_string(),
            body: "New order received".to_string(),
            status,
            button_clicked: None,
            error_message: None,
            created_at: created_at.to_string(),
            updated_at: created_at.to_string(),
        }
    }

    #[tokio::test]
    async fn attempt_lifecycle_is_persisted() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();

        let record = make_record("n1", NotifyStatus::Pending, "2026-01-01T10:00:00Z");
        create_notification(&db, &record).await.unwrap();

        update_notification_status(
            &db,
            "n1",
            NotifyStatus::Failed,
            Some("provider timeout"),
            "2026-01-01T10:00:05Z",
        )
        .await
        .unwrap();
        mark_button_clicked(&db, "n1", "prepare", "2026-01-01T10:02:00Z")
            .await
            .unwrap();

        let by_order = list_notifications_by_order(&db, "000000007").await.unwrap();
        assert_eq!(by_order.len(), 1);
        assert_eq!(by_order[0].status, NotifyStatus::Failed);
        assert_eq!(by_order[0].error_message.as_deref(), Some("provider timeout"));
        assert_eq!(by_order[0].button_clicked.as_deref(), Some("prepare"));

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn restaurant_listing_respects_limit_and_order() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db").to_str().unwrap())
            .await
            .unwrap();

        create_notification(&db, &make_record("n1", NotifyStatus::Delivered, "2026-01-01T10:00:00Z"))
            .await
            .unwrap();
        create_notification(&db, &make_record("n2", NotifyStatus::Disabled, "2026-01-01T11:00:00Z"))
            .await
            .unwrap();
        create_notification(&db, &make_record("n3", NotifyStatus::Skipped, "2026-01-01T12:00:00Z"))
            .await
            .unwrap();

        let recent = list_notifications_by_restaurant(&db, "r1", 2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, "n3");
        assert_eq!(recent[1].id, "n2");

        db.close().await.unwrap();
    }
}
