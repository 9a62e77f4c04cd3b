// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence boundary traits for sessions, orders, and notifications.

use async_trait::async_trait;

use crate::error::BhojanError;
use crate::types::{
    CustomerSession, NotificationRecord, NotifyStatus, Order, OrderStatus, PaymentStatus,
};

/// Per-contact conversational memory.
///
/// One record per contact address, keyed by that address. Records are
/// mutated in place on every inbound event and never hard-deleted.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetches the session for `contact`, if one exists.
    async fn get_session(&self, contact: &str) -> Result<Option<CustomerSession>, BhojanError>;

    /// Inserts a new session record.
    async fn create_session(&self, session: &CustomerSession) -> Result<(), BhojanError>;

    /// Replaces the session record for `session.contact`.
    async fn update_session(&self, session: &CustomerSession) -> Result<(), BhojanError>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: &Order) -> Result<(), BhojanError>;

    async fn get_order(&self, id: &str) -> Result<Option<Order>, BhojanError>;

    /// Resolves a short order reference (exact id or unique id prefix)
    /// within one restaurant's orders.
    async fn find_order_by_ref(
        &self,
        restaurant_id: &str,
        order_ref: &str,
    ) -> Result<Option<Order>, BhojanError>;

    /// Persists a validated status transition, bumping `updated_at`.
    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: &str,
    ) -> Result<(), BhojanError>;

    /// Flips the payment status without touching the order status.
    async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        now: &str,
    ) -> Result<(), BhojanError>;

    /// Orders for one restaurant, newest first.
    async fn list_orders_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Order>, BhojanError>;
}

/// Notification audit trail. Every attempt is recorded, including ones
/// suppressed by preference.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, record: &NotificationRecord) -> Result<(), BhojanError>;

    /// Settles an attempt: final status plus an optional error message.
    async fn update_notification_status(
        &self,
        id: &str,
        status: NotifyStatus,
        error_message: Option<&str>,
        now: &str,
    ) -> Result<(), BhojanError>;

    /// Marks which operator action answered a notification.
    async fn mark_button_clicked(
        &self,
        id: &str,
        button: &str,
        now: &str,
    ) -> Result<(), BhojanError>;

    /// Recent attempts for one restaurant, newest first.
    async fn list_notifications_by_restaurant(
        &self,
        restaurant_id: &str,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, BhojanError>;

    /// Attempts tied to one order, newest first.
    async fn list_notifications_by_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<NotificationRecord>, BhojanError>;
}
