// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canned domain records for tests.

use bhojan_core::types::{
    CuisineType, Order, OrderItem, OrderStatus, OrderType, PaymentMethod, PaymentStatus,
    Product, Restaurant,
};

/// A restaurant at the given coordinates.
pub fn restaurant(id: &str, name: &str, lat: f64, lon: f64) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        name: name.to_string(),
        contact: format!("9190000{id}"),
        latitude: lat,
        longitude: lon,
        address: "Hazratganj, Lucknow".to_string(),
        cuisine: CuisineType::Both,
        delivery_fee: 25.0,
        upi_id: Some(format!("{id}@upi")),
        is_active: true,
    }
}

/// An available product on the given restaurant's menu.
pub fn product(id: &str, restaurant_id: &str, name: &str, price: f64) -> Product {
    Product {
        id: id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        name: name.to_string(),
        description: String::new(),
        price,
        discounted_price: None,
        is_available: true,
    }
}

/// A pending cash-on-delivery order with one line item.
pub fn order(id: &str, restaurant_id: &str, contact: &str, created_at: &str) -> Order {
    let items = vec![OrderItem {
        product_id: "p1".to_string(),
        name: "Masala Dosa".to_string(),
        quantity: 1,
        unit_price: 120.0,
    }];
    Order {
        id: id.to_string(),
        restaurant_id: restaurant_id.to_string(),
        customer_id: format!("cust-{contact}"),
        contact: contact.to_string(),
        customer_name: "Asha".to_string(),
        items,
        order_type: OrderType::Delivery,
        delivery_fee: 25.0,
        total_amount: 145.0,
        status: OrderStatus::Pending,
        payment_method: PaymentMethod::Cod,
        payment_status: PaymentStatus::Pending,
        delivery_address: Some("12 Park Road".to_string()),
        customer_rating: None,
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
    }
}
