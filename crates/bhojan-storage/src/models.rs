// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage models are the shared domain records from `bhojan-core`.
//!
//! The store persists them as-is: enum columns hold the snake_case string
//! form, collection columns hold serde_json text.

pub use bhojan_core::types::{
    CustomerSession, NotificationRecord, NotifyEvent, NotifyStatus, Order, OrderItem,
    OrderStatus, OrderType, PaymentMethod, PaymentStatus, Product, Restaurant,
    RestaurantChoice, RestaurantSettings, SessionStep,
};
