// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records and closed enums shared across the bhojan workspace.
//!
//! The canonical record shapes live here so the engine, storage layer, and
//! channel adapters all agree on one vocabulary. Timestamps are RFC3339
//! strings throughout; the store treats them as opaque TEXT.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Unique identifier for an outbound message accepted by a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// The named state of a customer session's conversation machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    LocationRequest,
    LocationConfirm,
    RestaurantSelection,
    Menu,
    RestaurantClosedConfirm,
    QrRestaurantSelected,
    QrLocationRequest,
    QrLocationConfirm,
    /// Terminal: conversation ended, next greeting starts fresh.
    None,
}

/// Order lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Position on the happy path; `None` for `Cancelled`.
    fn rank(self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Preparing => Some(1),
            OrderStatus::Ready => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether a transition to `next` is allowed: strictly forward along
    /// `pending -> preparing -> ready -> delivered`, or to `cancelled`
    /// from any non-terminal status.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next.rank() {
            None => true, // cancellation
            Some(next_rank) => match self.rank() {
                Some(cur_rank) => next_rank > cur_rank,
                None => false,
            },
        }
    }
}

/// How the customer receives the order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    Pickup,
    Delivery,
}

/// How the customer pays.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery / pickup.
    Cod,
    /// UPI or other online payment, verified by the operator.
    Online,
}

/// Payment verification state, independent of order status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Failed,
}

/// Event class of a notification attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotifyEvent {
    NewOrder,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
    PaymentReceived,
}

/// Outcome recorded for a notification attempt. Every attempt gets exactly
/// one record; `Disabled` and `Skipped` attempts are never actually sent.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotifyStatus {
    /// Audit record written, send task still in flight.
    Pending,
    Delivered,
    Failed,
    /// The restaurant turned this event class off.
    Disabled,
    /// No recipient address is configured.
    Skipped,
}

/// Cuisine classification of a restaurant, also used as a search filter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CuisineType {
    Veg,
    NonVeg,
    Both,
    Snack,
    FullMeal,
}

impl CuisineType {
    /// Fixed compatibility table: does a restaurant tagged `tag` satisfy
    /// this filter? `Both` restaurants satisfy veg and non-veg filters;
    /// a full-meal kitchen also covers a veg filter.
    pub fn accepts(self, tag: CuisineType) -> bool {
        use CuisineType::*;
        match self {
            Veg => matches!(tag, Veg | Both | FullMeal),
            NonVeg => matches!(tag, NonVeg | Both),
            Both => matches!(tag, Both),
            Snack => matches!(tag, Snack | Both),
            FullMeal => matches!(tag, FullMeal | Both),
        }
    }
}

/// One line of an order (or of the session's cart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A ranked restaurant snapshot cached on the session for numeric or
/// name selection. `serial` is the 1-based rank at ranking time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantChoice {
    pub serial: u32,
    pub restaurant_id: String,
    pub name_lower: String,
}

/// Per-contact conversational memory. One record per contact address,
/// mutated in place on every inbound event, never hard-deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSession {
    /// Contact address (phone/handle) -- the primary key.
    pub contact: String,
    pub customer_name: Option<String>,
    pub restaurant_id: Option<String>,
    pub current_step: SessionStep,
    /// Part of the record but unused by the active conversation flow.
    #[serde(default)]
    pub cart: Vec<OrderItem>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// RFC3339 instant the location was cached; drives 30-minute staleness.
    pub location_timestamp: Option<String>,
    #[serde(default)]
    pub nearby_restaurants: Vec<RestaurantChoice>,
    pub created_at: String,
    pub updated_at: String,
}

impl CustomerSession {
    /// Fresh session for an unseen contact, starting at `location_request`.
    pub fn new(contact: &str, customer_name: Option<String>, now: &str) -> Self {
        Self {
            contact: contact.to_string(),
            customer_name,
            restaurant_id: None,
            current_step: SessionStep::LocationRequest,
            cart: Vec::new(),
            latitude: None,
            longitude: None,
            location_timestamp: None,
            nearby_restaurants: Vec::new(),
            created_at: now.to_string(),
            updated_at: now.to_string(),
        }
    }

    /// Null out the cached location and candidate list (conversation restart).
    pub fn clear_location(&mut self) {
        self.latitude = None;
        self.longitude = None;
        self.location_timestamp = None;
        self.nearby_restaurants.clear();
    }
}

/// An order as created at checkout. `total_amount` must always equal
/// the item lines plus the delivery fee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    pub customer_id: String,
    pub contact: String,
    pub customer_name: String,
    pub items: Vec<OrderItem>,
    pub order_type: OrderType,
    pub delivery_fee: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub delivery_address: Option<String>,
    pub customer_rating: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl Order {
    /// Sum of the item lines, excluding the delivery fee.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Short reference shown to customers and operators.
    pub fn short_id(&self) -> &str {
        let n = self.id.len().min(8);
        &self.id[..n]
    }
}

/// One notification attempt. Written for every attempt, including ones
/// suppressed by preference -- an audit trail, not just a delivery log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: String,
    pub restaurant_id: String,
    pub order_id: Option<String>,
    /// Delivery channel name, e.g. "whatsapp".
    pub channel: String,
    pub event: NotifyEvent,
    pub recipient: String,
    pub body: String,
    pub status: NotifyStatus,
    pub button_clicked: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Directory record for a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    /// Operator contact address for command routing and notifications.
    pub contact: String,
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub cuisine: CuisineType,
    pub delivery_fee: f64,
    pub upi_id: Option<String>,
    pub is_active: bool,
}

/// Per-restaurant notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantSettings {
    pub restaurant_id: String,
    pub notifications_enabled: bool,
    /// Overrides the restaurant's contact address as notification recipient.
    pub notify_contact: Option<String>,
    pub notify_new_order: bool,
    pub notify_preparing: bool,
    pub notify_ready: bool,
    pub notify_delivered: bool,
    pub notify_cancelled: bool,
    pub notify_payment_received: bool,
}

impl RestaurantSettings {
    /// Defaults: everything on, recipient falls back to the restaurant contact.
    pub fn defaults(restaurant_id: &str) -> Self {
        Self {
            restaurant_id: restaurant_id.to_string(),
            notifications_enabled: true,
            notify_contact: None,
            notify_new_order: true,
            notify_preparing: true,
            notify_ready: true,
            notify_delivered: true,
            notify_cancelled: true,
            notify_payment_received: true,
        }
    }

    /// Whether this event class is enabled for the restaurant.
    pub fn enabled_for(&self, event: NotifyEvent) -> bool {
        if !self.notifications_enabled {
            return false;
        }
        match event {
            NotifyEvent::NewOrder => self.notify_new_order,
            NotifyEvent::Preparing => self.notify_preparing,
            NotifyEvent::Ready => self.notify_ready,
            NotifyEvent::Delivered => self.notify_delivered,
            NotifyEvent::Cancelled => self.notify_cancelled,
            NotifyEvent::PaymentReceived => self.notify_payment_received,
        }
    }
}

/// Menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub discounted_price: Option<f64>,
    pub is_available: bool,
}

impl Product {
    /// Price actually charged: the discount applies only when it is a
    /// real reduction (`0 < discounted < price`).
    pub fn effective_price(&self) -> f64 {
        match self.discounted_price {
            Some(d) if d > 0.0 && d < self.price => d,
            _ => self.price,
        }
    }
}

/// Inbound event shape from the messaging boundary. Latitude/longitude
/// arrive as decimal strings exactly as the gateway delivers them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub from: String,
    pub body: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub display_name: Option<String>,
}

/// Plain-text outbound reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub to: String,
    pub body: String,
}
