// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order CRUD and short-reference resolution.

use bhojan_core::BhojanError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{Order, OrderStatus, PaymentStatus};
use crate::queries::{parse_enum, parse_json};

const ORDER_COLS: &str = "id, restaurant_id, customer_id, contact, customer_name, items,
                          order_type, delivery_fee, total_amount, status, payment_method,
                          payment_status, delivery_address, customer_rating,
                          created_at, updated_at";

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let items: String = row.get(5)?;
    let order_type: String = row.get(6)?;
    let status: String = row.get(9)?;
    let payment_method: String = row.get(10)?;
    let payment_status: String = row.get(11)?;
    Ok(Order {
        id: row.get(0)?,
        restaurant_id: row.get(1)?,
        customer_id: row.get(2)?,
        contact: row.get(3)?,
        customer_name: row.get(4)?,
        items: parse_json(5, &items)?,
        order_type: parse_enum(6, &order_type)?,
        delivery_fee: row.get(7)?,
        total_amount: row.get(8)?,
        status: parse_enum(9, &status)?,
        payment_method: parse_enum(10, &payment_method)?,
        payment_status: parse_enum(11, &payment_status)?,
        delivery_address: row.get(12)?,
        customer_rating: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

/// Insert an order record.
pub async fn create_order(db: &Database, order: &Order) -> Result<(), BhojanError> {
    let o = order.clone();
    let items = serde_json::to_string(&o.items).map_err(|e| BhojanError::Storage {
        source: Box::new(e),
    })?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders
                     (id, restaurant_id, customer_id, contact, customer_name, items,
                      order_type, delivery_fee, total_amount, status, payment_method,
                      payment_status, delivery_address, customer_rating, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
                params![
                    o.id,
                    o.restaurant_id,
                    o.customer_id,
                    o.contact,
                    o.customer_name,
                    items,
                    o.order_type.to_string(),
                    o.delivery_fee,
                    o.total_amount,
                    o.status.to_string(),
                    o.payment_method.to_string(),
                    o.payment_status.to_string(),
                    o.delivery_address,
                    o.customer_rating,
                    o.created_at,
                    o.updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get an order by full id.
pub async fn get_order(db: &Database, id: &str) -> Result<Option<Order>, BhojanError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {ORDER_COLS} FROM orders WHERE id = ?1"))?;
            match stmt.query_row(params![id], row_to_order) {
                Ok(o) => Ok(Some(o)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Resolve a short order reference within one restaurant's orders.
///
/// An exact id match wins; otherwise a prefix match is accepted only when
/// it is unambiguous. Ambiguous or unmatched references resolve to `None`.
pub async fn find_order_by_ref(
    db: &Database,
    restaurant_id: &str,
    order_ref: &str,
) -> Result<Option<Order>, BhojanError> {
    let restaurant_id = restaurant_id.to_string();
    let order_ref = order_ref.to_string();
    // Escape LIKE metacharacters so an operator-supplied ref can only ever
    // match as a literal prefix.
    let like_ref = order_ref
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLS} FROM orders
                 WHERE restaurant_id = ?1 AND (id = ?2 OR id LIKE ?3 || '%' ESCAPE '\\')
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![restaurant_id, order_ref, like_ref], row_to_order)?;
            let mut matches = Vec::new();
            for row in rows {
                matches.push(row?);
            }
            if let Some(exact) = matches.iter().find(|o| o.id == order_ref) {
                return Ok(Some(exact.clone()));
            }
            match matches.len() {
                1 => Ok(Some(matches.remove(0))),
                _ => Ok(None),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Persist a status transition, bumping `updated_at`.
pub async fn update_order_status(
    db: &Database,
    id: &str,
    status: OrderStatus,
    now: &str,
) -> Result<(), BhojanError> {
    let id = id.to_string();
    let status = status.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip the payment status without touching the order status.
pub async fn update_payment_status(
    db: &Database,
    id: &str,
    payment_status: PaymentStatus,
    now: &str,
) -> Result<(), BhojanError> {
    let id = id.to_string();
    let payment_status = payment_status.to_string();
    let now = now.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE orders SET payment_status = ?1, updated_at = ?2 WHERE id = ?3",
                params![payment_status, now, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Orders for one restaurant, newest first.
pub async fn list_orders_by_restaurant(
    db: &Database,
    restaurant_id: &str,
) -> Result<Vec<Order>, BhojanError> {
    let restaurant_id = restaurant_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ORDER_COLS} FROM orders
                 WHERE restaurant_id = ?1 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![restaurant_id], row_to_order)?;
            let mut orders = Vec::new();
            for row in rows {
                orders.push(row?);
            }
            Ok(orders)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
