// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic link composition for the web ordering surface and maps.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Filterable restaurant-list page anchored at the customer's location.
pub fn restaurants_link(
    frontend_base: &str,
    latitude: f64,
    longitude: f64,
    contact: &str,
    customer_name: &str,
) -> String {
    format!(
        "{frontend_base}/restaurants?lat={latitude}&lon={longitude}&token={}&name={}",
        encode(contact),
        encode(customer_name)
    )
}

/// Menu page for one restaurant. Location and name are appended when known
/// so the ordering surface can prefill delivery details.
pub fn menu_link(
    frontend_base: &str,
    restaurant_id: &str,
    contact: &str,
    location: Option<(f64, f64)>,
    customer_name: Option<&str>,
) -> String {
    let mut link = format!("{frontend_base}/menu/{restaurant_id}?token={}", encode(contact));
    if let Some((latitude, longitude)) = location {
        link.push_str(&format!("&lat={latitude}&lon={longitude}"));
    }
    if let Some(name) = customer_name {
        link.push_str(&format!("&name={}", encode(name)));
    }
    link
}

/// Directions link for pickup orders: coordinates when available,
/// otherwise a text search on the address.
pub fn map_link(maps_base: &str, coordinates: Option<(f64, f64)>, address: &str) -> String {
    match coordinates {
        Some((latitude, longitude)) => {
            format!("{maps_base}&destination={latitude},{longitude}")
        }
        None => format!("{maps_base}&destination={}", encode(address)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restaurants_link_shape() {
        let link = restaurants_link(
            "https://bhojan.app",
            26.8527,
            80.9495,
            "919876543210",
            "Asha Verma",
        );
        assert_eq!(
            link,
            "https://bhojan.app/restaurants?lat=26.8527&lon=80.9495&token=919876543210&name=Asha%20Verma"
        );
    }

    #[test]
    fn menu_link_with_and_without_location() {
        let bare = menu_link("https://bhojan.app", "r1", "919876543210", None, None);
        assert_eq!(bare, "https://bhojan.app/menu/r1?token=919876543210");

        let full = menu_link(
            "https://bhojan.app",
            "r1",
            "919876543210",
            Some((26.8527, 80.9495)),
            Some("Asha"),
        );
        assert_eq!(
            full,
            "https://bhojan.app/menu/r1?token=919876543210&lat=26.8527&lon=80.9495&name=Asha"
        );
    }

    #[test]
    fn map_link_prefers_coordinates() {
        let base = "https://www.google.com/maps/dir/?api=1";
        assert_eq!(
            map_link(base, Some((26.8527, 80.9495)), "Hazratganj, Lucknow"),
            "https://www.google.com/maps/dir/?api=1&destination=26.8527,80.9495"
        );
        assert_eq!(
            map_link(base, None, "Hazratganj, Lucknow"),
            "https://www.google.com/maps/dir/?api=1&destination=Hazratganj%2C%20Lucknow"
        );
    }
}
