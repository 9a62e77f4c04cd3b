// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store implementing all persistence traits.
//!
//! Behaves like the SQLite store for the operations the engine uses, so
//! engine tests run without touching disk.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bhojan_core::types::{
    CustomerSession, NotificationRecord, NotifyStatus, Order, OrderStatus, PaymentStatus,
    Product, Restaurant, RestaurantSettings,
};
use bhojan_core::{
    BhojanError, NotificationStore, OrderStore, ProductDirectory, RestaurantDirectory,
    SessionStore,
};

/// Shared in-memory store. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    sessions: Arc<Mutex<HashMap<String, CustomerSession>>>,
    orders: Arc<Mutex<HashMap<String, Order>>>,
    notifications: Arc<Mutex<Vec<NotificationRecord>>>,
    restaurants: Arc<Mutex<HashMap<String, Restaurant>>>,
    settings: Arc<Mutex<HashMap<String, RestaurantSettings>>>,
    products: Arc<Mutex<HashMap<String, Vec<Product>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a restaurant (and default settings for it).
    pub async fn add_restaurant(&self, restaurant: Restaurant) {
        self.restaurants
            .lock()
            .await
            .insert(restaurant.id.clone(), restaurant);
    }

    /// Seed or replace a settings row.
    pub async fn set_settings(&self, settings: RestaurantSettings) {
        self.settings
            .lock()
            .await
            .insert(settings.restaurant_id.clone(), settings);
    }

    /// Seed a product.
    pub async fn add_product(&self, product: Product) {
        self.products
            .lock()
            .await
            .entry(product.restaurant_id.clone())
            .or_default()
            .push(product);
    }

    /// All notification records, in insertion order.
    pub async fn all_notifications(&self) -> Vec<NotificationRecord> {
        self.notifications.lock().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get_session(&self, contact: &str) -> Result<Option<CustomerSession>, BhojanError> {
        Ok(self.sessions.lock().await.get(contact).cloned())
    }

    async fn create_session(&self, session: &CustomerSession) -> Result<(), BhojanError> {
        self.sessions
            .lock()
            .await
            .insert(session.contact.clone(), session.clone());
        Ok(())
    }

    async fn update_session(&self, session: &CustomerSession) -> Result<(), BhojanError> {
        self.sessions
            .lock()
            .await
            .insert(session.contact.clone(), session.clone());
        Ok(())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn create_order(&self, order: &Order) -> Result<(), BhojanError> {
        self.orders
            .lock()
            .await
            .insert(order.id.clone(), order.clone());
        Ok(())
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, BhojanError> {
        Ok(self.orders.lock().await.get(id).cloned())
    }

    async fn find_order_by_ref(
        &self,
        restaurant_id: &str,
        order_ref: &str,
    ) -> Result<Option<Order>, BhojanError> {
        let orders = self.orders.lock().await;
        let matches: Vec<&Order> = orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id && o.id.starts_with(order_ref))
            .collect();
        if let Some(exact) = matches.iter().find(|o| o.id == order_ref) {
            return Ok(Some((*exact).clone()));
        }
        match matches.len() {
            1 => Ok(Some(matches[0].clone())),
            _ => Ok(None),
        }
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: &str,
    ) -> Result<(), BhojanError> {
        let mut orders = self.orders.lock().await;
        let order = orders
            .get_mut(id)
            .ok_or_else(|| BhojanError::NotFound(format!("order {id}")))?;
        order.status = status;
        order.updated_at = now.to_string();
        Ok(())
    }

    async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        now: &str,
    ) -> Result<(), BhojanError> {
        let mut orders = self.orders.lock().await;
        let order = orders
            .get_mut(id)
            .ok_or_else(|| BhojanError::NotFound(format!("order {id}")))?;
        order.payment_status = payment_status;
        order.updated_at = now.to_string();
        Ok(())
    }

    async fn list_orders_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Order>, BhojanError> {
        let orders = self.orders.lock().await;
        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_notification(&self, record: &NotificationRecord) -> Result<(), BhojanError> {
        self.notifications.lock().await.push(record.clone());
        Ok(())
    }

    async fn update_notification_status(
        &self,
        id: &str,
        status: NotifyStatus,
        error_message: Option<&str>,
        now: &str,
    ) -> Result<(), BhojanError> {
        let mut records = self.notifications.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BhojanError::NotFound(format!("notification {id}")))?;
        record.status = status;
        record.error_message = error_message.map(|s| s.to_string());
        record.updated_at = now.to_string();
        Ok(())
    }

    async fn mark_button_clicked(
        &self,
        id: &str,
        button: &str,
        now: &str,
    ) -> Result<(), BhojanError> {
        let mut records = self.notifications.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| BhojanError::NotFound(format!("notification {id}")))?;
        record.button_clicked = Some(button.to_string());
        record.updated_at = now.to_string();
        Ok(())
    }

    async fn list_notifications_by_restaurant(
        &self,
        restaurant_id: &str,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, BhojanError> {
        let records = self.notifications.lock().await;
        let mut result: Vec<NotificationRecord> = records
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result.truncate(limit as usize);
        Ok(result)
    }

    async fn list_notifications_by_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<NotificationRecord>, BhojanError> {
        let records = self.notifications.lock().await;
        let mut result: Vec<NotificationRecord> = records
            .iter()
            .filter(|r| r.order_id.as_deref() == Some(order_id))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }
}

#[async_trait]
impl RestaurantDirectory for MemoryStore {
    async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, BhojanError> {
        Ok(self.restaurants.lock().await.get(id).cloned())
    }

    async fn list_active_restaurants(&self) -> Result<Vec<Restaurant>, BhojanError> {
        let restaurants = self.restaurants.lock().await;
        let mut result: Vec<Restaurant> =
            restaurants.values().filter(|r| r.is_active).cloned().collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn get_restaurant_by_contact(
        &self,
        contact: &str,
    ) -> Result<Option<Restaurant>, BhojanError> {
        Ok(self
            .restaurants
            .lock()
            .await
            .values()
            .find(|r| r.contact == contact)
            .cloned())
    }

    async fn get_settings(&self, restaurant_id: &str) -> Result<RestaurantSettings, BhojanError> {
        Ok(self
            .settings
            .lock()
            .await
            .get(restaurant_id)
            .cloned()
            .unwrap_or_else(|| RestaurantSettings::defaults(restaurant_id)))
    }
}

#[async_trait]
impl ProductDirectory for MemoryStore {
    async fn list_products(&self, restaurant_id: &str) -> Result<Vec<Product>, BhojanError> {
        Ok(self
            .products
            .lock()
            .await
            .get(restaurant_id)
            .map(|ps| ps.iter().filter(|p| p.is_available).cloned().collect())
            .unwrap_or_default())
    }
}
