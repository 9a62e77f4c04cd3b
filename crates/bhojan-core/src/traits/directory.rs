// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-mostly directory traits for restaurants and menus.

use async_trait::async_trait;

use crate::error::BhojanError;
use crate::types::{Product, Restaurant, RestaurantSettings};

/// Restaurant lookup and notification preferences.
#[async_trait]
pub trait RestaurantDirectory: Send + Sync {
    async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, BhojanError>;

    /// All restaurants currently accepting orders.
    async fn list_active_restaurants(&self) -> Result<Vec<Restaurant>, BhojanError>;

    /// Maps an operator contact address back to their restaurant.
    async fn get_restaurant_by_contact(
        &self,
        contact: &str,
    ) -> Result<Option<Restaurant>, BhojanError>;

    /// Notification preferences; implementations return defaults when no
    /// row exists for the restaurant.
    async fn get_settings(&self, restaurant_id: &str) -> Result<RestaurantSettings, BhojanError>;
}

/// Menu lookup.
#[async_trait]
pub trait ProductDirectory: Send + Sync {
    /// Available products for one restaurant.
    async fn list_products(&self, restaurant_id: &str) -> Result<Vec<Product>, BhojanError>;
}
