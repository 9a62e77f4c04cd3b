// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer session CRUD operations.

use bhojan_core::BhojanError;
use rusqlite::params;

use crate::database::Database;
use crate::models::CustomerSession;
use crate::queries::{parse_enum, parse_json};

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<CustomerSession> {
    let step: String = row.get(3)?;
    let cart: String = row.get(4)?;
    let nearby: String = row.get(8)?;
    Ok(CustomerSession {
        contact: row.get(0)?,
        customer_name: row.get(1)?,
        restaurant_id: row.get(2)?,
        current_step: parse_enum(3, &step)?,
        cart: parse_json(4, &cart)?,
        latitude: row.get(5)?,
        longitude: row.get(6)?,
        location_timestamp: row.get(7)?,
        nearby_restaurants: parse_json(8, &nearby)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Create a new session record.
pub async fn create_session(db: &Database, session: &CustomerSession) -> Result<(), BhojanError> {
    let session = session.clone();
    let cart = serde_json::to_string(&session.cart).map_err(|e| BhojanError::Storage {
        source: Box::new(e),
    })?;
    let nearby =
        serde_json::to_string(&session.nearby_restaurants).map_err(|e| BhojanError::Storage {
            source: Box::new(e),
        })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO customer_sessions
                     (contact, customer_name, restaurant_id, current_step, cart,
                      latitude, longitude, location_timestamp, nearby_restaurants,
                      created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    session.contact,
                    session.customer_name,
                    session.restaurant_id,
                    session.current_step.to_string(),
                    cart,
                    session.latitude,
                    session.longitude,
                    session.location_timestamp,
                    nearby,
                    session.created_at,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the session for a contact address.
pub async fn get_session(
    db: &Database,
    contact: &str,
) -> Result<Option<CustomerSession>, BhojanError> {
    let contact = contact.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT contact, customer_name, restaurant_id, current_step, cart,
                        latitude, longitude, location_timestamp, nearby_restaurants,
                        created_at, updated_at
                 FROM customer_sessions WHERE contact = ?1",
            )?;
            let result = stmt.query_row(params![contact], row_to_session);
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Replace the session record for `session.contact`.
pub async fn update_session(db: &Database, session: &CustomerSession) -> Result<(), BhojanError> {
    let session = session.clone();
    let cart = serde_json::to_string(&session.cart).map_err(|e| BhojanError::Storage {
        source: Box::new(e),
    })?;
    let nearby =
        serde_json::to_string(&session.nearby_restaurants).map_err(|e| BhojanError::Storage {
            source: Box::new(e),
        })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE customer_sessions SET
                     customer_name = ?2, restaurant_id = ?3, current_step = ?4, cart = ?5,
                     latitude = ?6, longitude = ?7, location_timestamp = ?8,
                     nearby_restaurants = ?9, updated_at = ?10
                 WHERE contact = ?1",
                params![
                    session.contact,
                    session.customer_name,
                    session.restaurant_id,
                    session.current_step.to_string(),
                    cart,
                    session.latitude,
                    session.longitude,
                    session.location_timestamp,
                    nearby,
                    session.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
