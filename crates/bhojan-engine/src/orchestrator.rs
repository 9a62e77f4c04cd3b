// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order lifecycle orchestration.
//!
//! Owns the three commit points of an order: creation at checkout, status
//! transitions, and payment verification. Each commit validates ownership
//! and the transition rules, persists, invalidates the restaurant's quality
//! score, and fans out notifications through the dispatcher. Dispatch
//! failures never roll a commit back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use bhojan_core::types::{
    NotifyEvent, Order, OrderItem, OrderStatus, OrderType, PaymentMethod, PaymentStatus,
    Restaurant, RestaurantSettings,
};
use bhojan_core::{
    BhojanError, OrderStore, ProductDirectory, RestaurantDirectory,
};

use crate::dispatch::{DispatchOutcome, Dispatcher, NotificationRequest};
use crate::links;
use crate::messages;
use crate::score::QualityScores;

/// One requested order line.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
}

/// Checkout request from the external ordering surface.
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub restaurant_id: String,
    pub customer_id: String,
    pub contact: String,
    pub customer_name: String,
    pub items: Vec<OrderLine>,
    pub order_type: OrderType,
    pub payment_method: PaymentMethod,
    pub delivery_address: Option<String>,
}

/// A committed change plus the notification attempts it scheduled.
#[derive(Debug)]
pub struct OrderCommit {
    pub order: Order,
    pub dispatches: Vec<DispatchOutcome>,
}

pub struct OrderOrchestrator {
    orders: Arc<dyn OrderStore>,
    restaurants: Arc<dyn RestaurantDirectory>,
    products: Arc<dyn ProductDirectory>,
    dispatcher: Dispatcher,
    scores: QualityScores,
    maps_base: String,
}

impl OrderOrchestrator {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        restaurants: Arc<dyn RestaurantDirectory>,
        products: Arc<dyn ProductDirectory>,
        dispatcher: Dispatcher,
        scores: QualityScores,
        maps_base: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            restaurants,
            products,
            dispatcher,
            scores,
            maps_base: maps_base.into(),
        }
    }

    /// Create an order at checkout: price the lines at their effective
    /// (discounted) prices, apply the delivery fee for delivery orders,
    /// persist, and notify both the customer and the operator.
    pub async fn create_order(
        &self,
        request: NewOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderCommit, BhojanError> {
        let restaurant = self
            .restaurants
            .get_restaurant(&request.restaurant_id)
            .await?
            .ok_or_else(|| BhojanError::NotFound(format!("restaurant {}", request.restaurant_id)))?;
        if !restaurant.is_active {
            return Err(BhojanError::Input(format!(
                "restaurant {} is not accepting orders",
                restaurant.name
            )));
        }
        if request.items.is_empty() {
            return Err(BhojanError::Input("order has no items".into()));
        }

        let menu: HashMap<String, _> = self
            .products
            .list_products(&restaurant.id)
            .await?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            if line.quantity == 0 {
                return Err(BhojanError::Input(format!(
                    "zero quantity for product {}",
                    line.product_id
                )));
            }
            let product = menu.get(&line.product_id).ok_or_else(|| {
                BhojanError::NotFound(format!("product {} on this menu", line.product_id))
            })?;
            items.push(OrderItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.effective_price(),
            });
        }

        let delivery_fee = match request.order_type {
            OrderType::Delivery => restaurant.delivery_fee,
            OrderType::Pickup => 0.0,
        };
        let subtotal: f64 = items.iter().map(OrderItem::line_total).sum();
        let now_str = crate::rfc3339(now);

        let order = Order {
            id: new_order_id(),
            restaurant_id: restaurant.id.clone(),
            customer_id: request.customer_id,
            contact: request.contact,
            customer_name: request.customer_name,
            items,
            order_type: request.order_type,
            delivery_fee,
            total_amount: subtotal + delivery_fee,
            status: OrderStatus::Pending,
            payment_method: request.payment_method,
            payment_status: PaymentStatus::Pending,
            delivery_address: request.delivery_address,
            customer_rating: None,
            created_at: now_str.clone(),
            updated_at: now_str,
        };
        self.orders.create_order(&order).await?;
        self.scores.invalidate(&restaurant.id);
        tracing::info!(
            order_id = %order.id,
            restaurant_id = %restaurant.id,
            total = order.total_amount,
            "order created"
        );

        let settings = self.restaurants.get_settings(&restaurant.id).await?;
        let enabled = settings.enabled_for(NotifyEvent::NewOrder);
        let mut dispatches = Vec::with_capacity(2);
        dispatches.push(
            self.dispatcher
                .dispatch(
                    NotificationRequest {
                        restaurant_id: &restaurant.id,
                        order_id: Some(&order.id),
                        event: NotifyEvent::NewOrder,
                        recipient: Some(&order.contact),
                        enabled,
                        body: &messages::customer_status_message(&order, &restaurant.name, None),
                    },
                    now,
                )
                .await?,
        );
        dispatches.push(
            self.dispatcher
                .dispatch(
                    NotificationRequest {
                        restaurant_id: &restaurant.id,
                        order_id: Some(&order.id),
                        event: NotifyEvent::NewOrder,
                        recipient: operator_recipient(&settings, &restaurant),
                        enabled,
                        body: &messages::new_order_alert(&order),
                    },
                    now,
                )
                .await?,
        );

        Ok(OrderCommit { order, dispatches })
    }

    /// Commit a status transition. Rejected when the order does not belong
    /// to `acting_restaurant_id` or the move is not forward-or-cancel.
    pub async fn set_status(
        &self,
        order_id: &str,
        new_status: OrderStatus,
        acting_restaurant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OrderCommit, BhojanError> {
        let mut order = self.owned_order(order_id, acting_restaurant_id).await?;
        if !order.status.can_transition_to(new_status) {
            return Err(BhojanError::Input(format!(
                "order {} cannot move from {} to {}",
                order.short_id(),
                order.status,
                new_status
            )));
        }

        let now_str = crate::rfc3339(now);
        self.orders.update_order_status(&order.id, new_status, &now_str).await?;
        let old_status = order.status;
        order.status = new_status;
        order.updated_at = now_str;
        self.scores.invalidate(&order.restaurant_id);
        tracing::info!(
            order_id = %order.id,
            from = %old_status,
            to = %new_status,
            "order status committed"
        );

        let restaurant = self
            .restaurants
            .get_restaurant(&order.restaurant_id)
            .await?
            .ok_or_else(|| BhojanError::NotFound(format!("restaurant {}", order.restaurant_id)))?;
        let settings = self.restaurants.get_settings(&restaurant.id).await?;

        let event = match new_status {
            OrderStatus::Preparing => NotifyEvent::Preparing,
            OrderStatus::Ready => NotifyEvent::Ready,
            OrderStatus::Delivered => NotifyEvent::Delivered,
            OrderStatus::Cancelled => NotifyEvent::Cancelled,
            // Unreachable: no transition targets pending.
            OrderStatus::Pending => NotifyEvent::NewOrder,
        };
        let pickup_directions = self.pickup_directions(&order, &restaurant);
        let body = messages::customer_status_message(
            &order,
            &restaurant.name,
            pickup_directions.as_ref().map(|(a, m)| (a.as_str(), m.as_str())),
        );
        let outcome = self
            .dispatcher
            .dispatch(
                NotificationRequest {
                    restaurant_id: &restaurant.id,
                    order_id: Some(&order.id),
                    event,
                    recipient: Some(&order.contact),
                    enabled: settings.enabled_for(event),
                    body: &body,
                },
                now,
            )
            .await?;

        Ok(OrderCommit { order, dispatches: vec![outcome] })
    }

    /// Flip an online order's payment status to `verified`. Never touches
    /// the order status.
    pub async fn verify_payment(
        &self,
        order_id: &str,
        acting_restaurant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OrderCommit, BhojanError> {
        let mut order = self.owned_order(order_id, acting_restaurant_id).await?;
        if order.payment_method != PaymentMethod::Online {
            return Err(BhojanError::Input(format!(
                "order {} is not an online payment order",
                order.short_id()
            )));
        }
        if order.payment_status == PaymentStatus::Verified {
            return Err(BhojanError::Input(format!(
                "payment for order {} is already verified",
                order.short_id()
            )));
        }

        let now_str = crate::rfc3339(now);
        self.orders
            .update_payment_status(&order.id, PaymentStatus::Verified, &now_str)
            .await?;
        order.payment_status = PaymentStatus::Verified;
        order.updated_at = now_str.clone();
        tracing::info!(order_id = %order.id, "payment verified");

        // Tie the verification back to the new-order alert it answered.
        let notifications = self
            .dispatcher
            .notifications()
            .list_notifications_by_order(&order.id)
            .await?;
        if let Some(alert) = notifications.iter().find(|n| n.event == NotifyEvent::NewOrder) {
            self.dispatcher
                .notifications()
                .mark_button_clicked(&alert.id, "verify", &now_str)
                .await?;
        }

        let restaurant = self
            .restaurants
            .get_restaurant(&order.restaurant_id)
            .await?
            .ok_or_else(|| BhojanError::NotFound(format!("restaurant {}", order.restaurant_id)))?;
        let settings = self.restaurants.get_settings(&restaurant.id).await?;
        let body = messages::payment_verified_customer(&order);
        let outcome = self
            .dispatcher
            .dispatch(
                NotificationRequest {
                    restaurant_id: &restaurant.id,
                    order_id: Some(&order.id),
                    event: NotifyEvent::PaymentReceived,
                    recipient: Some(&order.contact),
                    enabled: settings.enabled_for(NotifyEvent::PaymentReceived),
                    body: &body,
                },
                now,
            )
            .await?;

        Ok(OrderCommit { order, dispatches: vec![outcome] })
    }

    async fn owned_order(
        &self,
        order_id: &str,
        acting_restaurant_id: &str,
    ) -> Result<Order, BhojanError> {
        let order = self
            .orders
            .get_order(order_id)
            .await?
            .ok_or_else(|| BhojanError::NotFound(format!("order {order_id}")))?;
        if order.restaurant_id != acting_restaurant_id {
            return Err(BhojanError::Unauthorized(format!(
                "order {} belongs to another restaurant",
                order.short_id()
            )));
        }
        Ok(order)
    }

    fn pickup_directions(
        &self,
        order: &Order,
        restaurant: &Restaurant,
    ) -> Option<(String, String)> {
        if order.order_type != OrderType::Pickup {
            return None;
        }
        // (0, 0) marks restaurants that never set coordinates.
        let coordinates = (restaurant.latitude != 0.0 || restaurant.longitude != 0.0)
            .then_some((restaurant.latitude, restaurant.longitude));
        let map = links::map_link(&self.maps_base, coordinates, &restaurant.address);
        Some((restaurant.address.clone(), map))
    }
}

fn operator_recipient<'a>(
    settings: &'a RestaurantSettings,
    restaurant: &'a Restaurant,
) -> Option<&'a str> {
    settings
        .notify_contact
        .as_deref()
        .filter(|c| !c.is_empty())
        .or(Some(restaurant.contact.as_str()))
        .filter(|c| !c.is_empty())
}

/// Nine-digit numeric order id.
fn new_order_id() -> String {
    rand::thread_rng().gen_range(100_000_000u64..1_000_000_000u64).to_string()
}
