// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the bhojan persistence traits.

use async_trait::async_trait;
use tracing::debug;

use bhojan_core::types::{
    CustomerSession, NotificationRecord, NotifyStatus, Order, OrderStatus, PaymentStatus,
    Product, Restaurant, RestaurantSettings,
};
use bhojan_core::{
    BhojanError, NotificationStore, OrderStore, ProductDirectory, RestaurantDirectory,
    SessionStore,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed store.
///
/// Wraps a [`Database`] handle and delegates all operations to the typed
/// query modules. Cloning shares the underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path` and runs migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, BhojanError> {
        let db = Database::open_with(path, wal_mode).await?;
        debug!(path, "sqlite store opened");
        Ok(Self { db })
    }

    /// Wraps an already opened database.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(self) -> Result<(), BhojanError> {
        self.db
            .connection()
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        self.db.close().await
    }

    // Directory seeding, used by provisioning tooling and tests.

    pub async fn create_restaurant(&self, restaurant: &Restaurant) -> Result<(), BhojanError> {
        queries::restaurants::create_restaurant(&self.db, restaurant).await
    }

    pub async fn create_product(&self, product: &Product) -> Result<(), BhojanError> {
        queries::products::create_product(&self.db, product).await
    }

    pub async fn upsert_settings(&self, settings: &RestaurantSettings) -> Result<(), BhojanError> {
        queries::restaurants::upsert_settings(&self.db, settings).await
    }
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn get_session(&self, contact: &str) -> Result<Option<CustomerSession>, BhojanError> {
        queries::sessions::get_session(&self.db, contact).await
    }

    async fn create_session(&self, session: &CustomerSession) -> Result<(), BhojanError> {
        queries::sessions::create_session(&self.db, session).await
    }

    async fn update_session(&self, session: &CustomerSession) -> Result<(), BhojanError> {
        queries::sessions::update_session(&self.db, session).await
    }
}

#[async_trait]
impl OrderStore for SqliteStore {
    async fn create_order(&self, order: &Order) -> Result<(), BhojanError> {
        queries::orders::create_order(&self.db, order).await
    }

    async fn get_order(&self, id: &str) -> Result<Option<Order>, BhojanError> {
        queries::orders::get_order(&self.db, id).await
    }

    async fn find_order_by_ref(
        &self,
        restaurant_id: &str,
        order_ref: &str,
    ) -> Result<Option<Order>, BhojanError> {
        queries::orders::find_order_by_ref(&self.db, restaurant_id, order_ref).await
    }

    async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
        now: &str,
    ) -> Result<(), BhojanError> {
        queries::orders::update_order_status(&self.db, id, status, now).await
    }

    async fn update_payment_status(
        &self,
        id: &str,
        payment_status: PaymentStatus,
        now: &str,
    ) -> Result<(), BhojanError> {
        queries::orders::update_payment_status(&self.db, id, payment_status, now).await
    }

    async fn list_orders_by_restaurant(
        &self,
        restaurant_id: &str,
    ) -> Result<Vec<Order>, BhojanError> {
        queries::orders::list_orders_by_restaurant(&self.db, restaurant_id).await
    }
}

#[async_trait]
impl NotificationStore for SqliteStore {
    async fn create_notification(&self, record: &NotificationRecord) -> Result<(), BhojanError> {
        queries::notifications::create_notification(&self.db, record).await
    }

    async fn update_notification_status(
        &self,
        id: &str,
        status: NotifyStatus,
        error_message: Option<&str>,
        now: &str,
    ) -> Result<(), BhojanError> {
        queries::notifications::update_notification_status(&self.db, id, status, error_message, now)
            .await
    }

    async fn mark_button_clicked(
        &self,
        id: &str,
        button: &str,
        now: &str,
    ) -> Result<(), BhojanError> {
        queries::notifications::mark_button_clicked(&self.db, id, button, now).await
    }

    async fn list_notifications_by_restaurant(
        &self,
        restaurant_id: &str,
        limit: u32,
    ) -> Result<Vec<NotificationRecord>, BhojanError> {
        queries::notifications::list_notifications_by_restaurant(&self.db, restaurant_id, limit)
            .await
    }

    async fn list_notifications_by_order(
        &self,
        order_id: &str,
    ) -> Result<Vec<NotificationRecord>, BhojanError> {
        queries::notifications::list_notifications_by_order(&self.db, order_id).await
    }
}

#[async_trait]
impl RestaurantDirectory for SqliteStore {
    async fn get_restaurant(&self, id: &str) -> Result<Option<Restaurant>, BhojanError> {
        queries::restaurants::get_restaurant(&self.db, id).await
    }

    async fn list_active_restaurants(&self) -> Result<Vec<Restaurant>, BhojanError> {
        queries::restaurants::list_active_restaurants(&self.db).await
    }

    async fn get_restaurant_by_contact(
        &self,
        contact: &str,
    ) -> Result<Option<Restaurant>, BhojanError> {
        queries::restaurants::get_restaurant_by_contact(&self.db, contact).await
    }

    async fn get_settings(&self, restaurant_id: &str) -> Result<RestaurantSettings, BhojanError> {
        queries::restaurants::get_settings(&self.db, restaurant_id).await
    }
}

#[async_trait]
impl ProductDirectory for SqliteStore {
    async fn list_products(&self, restaurant_id: &str) -> Result<Vec<Product>, BhojanError> {
        queries::products::list_products(&self.db, restaurant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhojan_core::types::{CuisineType, SessionStep};
    use tempfile::tempdir;

    async fn open_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("test.db").to_str().unwrap(), true)
            .await
            .unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn session_lifecycle_through_store() {
        let (store, _dir) = open_store().await;

        let mut session =
            CustomerSession::new("919876543210", Some("Asha".to_string()), "2026-01-01T00:00:00Z");
        store.create_session(&session).await.unwrap();

        session.current_step = SessionStep::Menu;
        session.restaurant_id = Some("r1".to_string());
        session.updated_at = "2026-01-01T00:01:00Z".to_string();
        store.update_session(&session).await.unwrap();

        let loaded = store.get_session("919876543210").await.unwrap().unwrap();
        assert_eq!(loaded.current_step, SessionStep::Menu);
        assert_eq!(loaded.restaurant_id.as_deref(), Some("r1"));

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn directory_lookups_through_store() {
        let (store, _dir) = open_store().await;

        let restaurant = Restaurant {
            id: "r1".to_string(),
            name: "Spice Villa".to_string(),
            contact: "911234567890".to_string(),
            latitude: 26.85,
            longitude: 80.95,
            address: "Hazratganj, Lucknow".to_string(),
            cuisine: CuisineType::Veg,
            delivery_fee: 20.0,
            upi_id: None,
            is_active: true,
        };
        store.create_restaurant(&restaurant).await.unwrap();

        let found = store
            .get_restaurant_by_contact("911234567890")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, "r1");

        let settings = store.get_settings("r1").await.unwrap();
        assert!(settings.enabled_for(bhojan_core::types::NotifyEvent::NewOrder));

        store.close().await.unwrap();
    }
}
