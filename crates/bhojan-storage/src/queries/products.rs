// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Menu item queries.

use bhojan_core::BhojanError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Product;

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        restaurant_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        discounted_price: row.get(5)?,
        is_available: row.get(6)?,
    })
}

/// Insert a product record.
pub async fn create_product(db: &Database, product: &Product) -> Result<(), BhojanError> {
    let p = product.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO products
                     (id, restaurant_id, name, description, price, discounted_price, is_available)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    p.id,
                    p.restaurant_id,
                    p.name,
                    p.description,
                    p.price,
                    p.discounted_price,
                    p.is_available,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Available products for one restaurant.
pub async fn list_products(db: &Database, restaurant_id: &str) -> Result<Vec<Product>, BhojanError> {
    let restaurant_id = restaurant_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, restaurant_id, name, description, price, discounted_price, is_available
                 FROM products WHERE restaurant_id = ?1 AND is_available = 1 ORDER BY name",
            )?;
            let rows = stmt.query_map(params![restaurant_id], row_to_product)?;
            let mut products = Vec::new();
            for row in rows {
                products.push(row?);
            }
            Ok(products)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
