// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restaurant directory and per-restaurant settings queries.

use bhojan_core::BhojanError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Restaurant, RestaurantSettings};
use crate::queries::parse_enum;

const RESTAURANT_COLS: &str = "id, name, contact, latitude, longitude, address, cuisine,
                               delivery_fee, upi_id, is_active";

fn row_to_restaurant(row: &rusqlite::Row<'_>) -> rusqlite::Result<Restaurant> {
    let cuisine: String = row.get(6)?;
    Ok(Restaurant {
        id: row.get(0)?,
        name: row.get(1)?,
        contact: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        address: row.get(5)?,
        cuisine: parse_enum(6, &cuisine)?,
        delivery_fee: row.get(7)?,
        upi_id: row.get(8)?,
        is_active: row.get(9)?,
    })
}

/// Insert a restaurant record.
pub async fn create_restaurant(db: &Database, restaurant: &Restaurant) -> Result<(), BhojanError> {
    let r = restaurant.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO restaurants
                     (id, name, contact, latitude, longitude, address, cuisine,
                      delivery_fee, upi_id, is_active)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    r.id,
                    r.name,
                    r.contact,
                    r.latitude,
                    r.longitude,
                    r.address,
                    r.cuisine.to_string(),
                    r.delivery_fee,
                    r.upi_id,
                    r.is_active,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a restaurant by id.
pub async fn get_restaurant(db: &Database, id: &str) -> Result<Option<Restaurant>, BhojanError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RESTAURANT_COLS} FROM restaurants WHERE id = ?1"
            ))?;
            match stmt.query_row(params![id], row_to_restaurant) {
                Ok(r) => Ok(Some(r)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All restaurants currently accepting orders.
pub async fn list_active_restaurants(db: &Database) -> Result<Vec<Restaurant>, BhojanError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RESTAURANT_COLS} FROM restaurants WHERE is_active = 1 ORDER BY name"
            ))?;
            let rows = stmt.query_map([], row_to_restaurant)?;
            let mut restaurants = Vec::new();
            for row in rows {
                restaurants.push(row?);
            }
            Ok(restaurants)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Maps an operator contact address back to their restaurant.
pub async fn get_restaurant_by_contact(
    db: &Database,
    contact: &str,
) -> Result<Option<Restaurant>, BhojanError> {
    let contact = contact.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {RESTAURANT_COLS} FROM restaurants WHERE contact = ?1"
            ))?;
            match stmt.query_row(params![contact], row_to_restaurant) {
                Ok(r) => Ok(Some(r)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Notification preferences. Missing rows fall back to defaults with
/// everything enabled.
pub async fn get_settings(
    db: &Database,
    restaurant_id: &str,
) -> Result<RestaurantSettings, BhojanError> {
    let restaurant_id = restaurant_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT restaurant_id, notifications_enabled, notify_contact,
                        notify_new_order, notify_preparing, notify_ready,
                        notify_delivered, notify_cancelled, notify_payment_received
                 FROM restaurant_settings WHERE restaurant_id = ?1",
            )?;
            let result = stmt.query_row(params![restaurant_id], |row| {
                Ok(RestaurantSettings {
                    restaurant_id: row.get(0)?,
                    notifications_enabled: row.get(1)?,
                    notify_contact: row.get(2)?,
                    notify_new_order: row.get(3)?,
                    notify_preparing: row.get(4)?,
                    notify_ready: row.get(5)?,
                    notify_delivered: row.get(6)?,
                    notify_cancelled: row.get(7)?,
                    notify_payment_received: row.get(8)?,
                })
            });
            match result {
                Ok(s) => Ok(s),
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    Ok(RestaurantSettings::defaults(&restaurant_id))
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert or replace a settings row.
pub async fn upsert_settings(
    db: &Database,
    settings: &RestaurantSettings,
) -> Result<(), BhojanError> {
    let s = settings.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO restaurant_settings
                     (restaurant_id, notifications_enabled, notify_contact,
                      notify_new_order, notify_preparing, notify_ready,
                      notify_delivered, notify_cancelled, notify_payment_received)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    s.restaurant_id,
                    s.notifications_enabled,
                    s.notify_contact,
                    s.notify_new_order,
                    s.notify_preparing,
                    s.notify_ready,
                    s.notify_delivered,
                    s.notify_cancelled,
                    s.notify_payment_received,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
