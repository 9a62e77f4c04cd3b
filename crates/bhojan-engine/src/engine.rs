// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level event router.
//!
//! An inbound event is first checked against the operator command grammar
//! when the sender is a known restaurant contact; everything else goes to
//! the session machine. The boundary never fails: any error becomes a
//! best-effort apology reply so the upstream messaging gateway does not
//! retry-storm the webhook.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use bhojan_core::types::{OrderStatus, PaymentMethod, PaymentStatus, Restaurant};
use bhojan_core::{
    BhojanError, InboundEvent, MessageChannel, NotificationStore, OrderStore, ProductDirectory,
    RestaurantDirectory, SessionStore,
};

use crate::command::{self, OperatorCommand};
use crate::dispatch::Dispatcher;
use crate::input;
use crate::messages;
use crate::orchestrator::OrderOrchestrator;
use crate::qr::QrCorrelationWindow;
use crate::score::QualityScores;
use crate::session::SessionEngine;

/// Engine tunables, mapped from the `[engine]` config section.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub search_radius_km: f64,
    pub location_cache_minutes: i64,
    pub qr_window_secs: u64,
    pub frontend_base: String,
    pub maps_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_radius_km: 50.0,
            location_cache_minutes: 30,
            qr_window_secs: 180,
            frontend_base: "https://bhojan.app".to_string(),
            maps_base: "https://www.google.com/maps/dir/?api=1".to_string(),
        }
    }
}

pub struct Engine {
    sessions: SessionEngine,
    orchestrator: OrderOrchestrator,
    orders: Arc<dyn OrderStore>,
    restaurants: Arc<dyn RestaurantDirectory>,
    qr: Arc<QrCorrelationWindow>,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        sessions: Arc<dyn SessionStore>,
        orders: Arc<dyn OrderStore>,
        notifications: Arc<dyn NotificationStore>,
        restaurants: Arc<dyn RestaurantDirectory>,
        products: Arc<dyn ProductDirectory>,
        channel: Arc<dyn MessageChannel>,
    ) -> Self {
        let qr = Arc::new(QrCorrelationWindow::new(Duration::from_secs(config.qr_window_secs)));
        let scores = QualityScores::new();
        let dispatcher = Dispatcher::new(notifications, channel, "whatsapp");
        let session_engine = SessionEngine::new(
            &config,
            sessions,
            Arc::clone(&restaurants),
            Arc::clone(&orders),
            scores.clone(),
            Arc::clone(&qr),
        );
        let orchestrator = OrderOrchestrator::new(
            Arc::clone(&orders),
            Arc::clone(&restaurants),
            products,
            dispatcher,
            scores,
            config.maps_base.clone(),
        );
        Self { sessions: session_engine, orchestrator, orders, restaurants, qr }
    }

    /// The QR correlation window, for the scan-redirect endpoint.
    pub fn qr(&self) -> &Arc<QrCorrelationWindow> {
        &self.qr
    }

    /// The order orchestrator, for the external ordering surface.
    pub fn orchestrator(&self) -> &OrderOrchestrator {
        &self.orchestrator
    }

    /// Handle one inbound event and produce the reply text. Never fails.
    pub async fn handle_event(&self, event: &InboundEvent) -> String {
        self.handle_event_at(event, Utc::now()).await
    }

    /// Like [`Engine::handle_event`] with an explicit clock, for tests.
    pub async fn handle_event_at(&self, event: &InboundEvent, now: DateTime<Utc>) -> String {
        let contact = input::normalize_contact(&event.from);
        match self.route(&contact, event, now).await {
            Ok(reply) => reply,
            Err(BhojanError::Input(reason)) => {
                tracing::debug!(contact = %contact, reason, "invalid input");
                if event.latitude.is_some() || event.longitude.is_some() {
                    messages::invalid_location()
                } else {
                    messages::apology()
                }
            }
            Err(error) => {
                tracing::error!(contact = %contact, %error, "event handling failed");
                messages::apology()
            }
        }
    }

    async fn route(
        &self,
        contact: &str,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        let body = event.body.as_deref().unwrap_or("");
        if let Some(restaurant) = self.restaurants.get_restaurant_by_contact(contact).await? {
            if let Some((cmd, order_ref)) = OperatorCommand::parse(body) {
                return self.handle_command(&restaurant, cmd, &order_ref, now).await;
            }
            if command::looks_like_command(body) {
                return Ok(messages::unknown_command());
            }
            // Operators chatting normally fall through to the customer flow.
        }
        self.sessions.handle(contact, event, now).await
    }

    async fn handle_command(
        &self,
        restaurant: &Restaurant,
        cmd: OperatorCommand,
        order_ref: &str,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        tracing::info!(
            restaurant_id = %restaurant.id,
            command = ?cmd,
            order_ref,
            "operator command"
        );
        let Some(order) = self.orders.find_order_by_ref(&restaurant.id, order_ref).await? else {
            // An exact id that exists under another restaurant gets a
            // distinct denial; everything else is not-found.
            return Ok(match self.orders.get_order(order_ref).await? {
                Some(_) => messages::foreign_order(order_ref),
                None => messages::order_not_found(order_ref),
            });
        };

        let new_status = match cmd {
            OperatorCommand::Accept => return Ok(messages::accept_ack(&order)),
            OperatorCommand::Verify => {
                if order.payment_method != PaymentMethod::Online {
                    return Ok(messages::not_online_payment(&order.id));
                }
                if order.payment_status == PaymentStatus::Verified {
                    return Ok(messages::already_verified(&order.id));
                }
                let commit =
                    self.orchestrator.verify_payment(&order.id, &restaurant.id, now).await?;
                return Ok(messages::payment_verified_operator(&commit.order));
            }
            OperatorCommand::Prepare => OrderStatus::Preparing,
            OperatorCommand::Ready => OrderStatus::Ready,
            OperatorCommand::Cancel => OrderStatus::Cancelled,
            OperatorCommand::Delivered => OrderStatus::Delivered,
        };
        match self
            .orchestrator
            .set_status(&order.id, new_status, &restaurant.id, now)
            .await
        {
            Ok(commit) => Ok(messages::status_updated(&commit.order)),
            Err(BhojanError::Input(_)) => Ok(messages::invalid_transition(&order.id, order.status)),
            Err(error) => Err(error),
        }
    }
}
