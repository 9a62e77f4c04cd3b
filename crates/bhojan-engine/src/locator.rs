// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restaurant locator and ranker.
//!
//! Filters active restaurants by great-circle distance, scores the
//! survivors by a weighted blend of quality and proximity, and assigns
//! 1-based serials in the same pass. The serials are what the session
//! later resolves numeric selections against, so ranking order and serial
//! assignment must never diverge.

use std::cmp::Ordering;

use bhojan_core::types::{CuisineType, Restaurant};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance beyond which proximity contributes nothing to the score.
const PROXIMITY_HORIZON_KM: f64 = 15.0;

const QUALITY_WEIGHT: f64 = 0.6;
const PROXIMITY_WEIGHT: f64 = 0.4;

/// A restaurant with its rank context.
#[derive(Debug, Clone)]
pub struct RankedRestaurant {
    pub restaurant: Restaurant,
    pub distance_km: f64,
    pub quality_score: f64,
    pub combined_score: f64,
    /// 1-based rank at ranking time.
    pub serial: u32,
}

/// Great-circle distance between two coordinates, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// Rank restaurants around a query point.
///
/// `quality` supplies the quality score (1..=5) per restaurant. The cuisine
/// filter, when present, is applied before scoring using the fixed
/// compatibility table on [`CuisineType`]. Output is sorted by combined
/// score descending, ties broken by distance ascending.
pub fn rank<F>(
    restaurants: Vec<Restaurant>,
    latitude: f64,
    longitude: f64,
    radius_km: f64,
    cuisine_filter: Option<CuisineType>,
    quality: F,
) -> Vec<RankedRestaurant>
where
    F: Fn(&Restaurant) -> f64,
{
    let mut ranked: Vec<RankedRestaurant> = restaurants
        .into_iter()
        .filter(|r| r.is_active)
        .filter(|r| cuisine_filter.is_none_or(|f| f.accepts(r.cuisine)))
        .filter_map(|r| {
            let distance_km = haversine_km(latitude, longitude, r.latitude, r.longitude);
            if distance_km > radius_km {
                return None;
            }
            let quality_score = quality(&r);
            let combined_score = QUALITY_WEIGHT * (quality_score / 5.0)
                + PROXIMITY_WEIGHT * (1.0 - distance_km / PROXIMITY_HORIZON_KM).max(0.0);
            Some(RankedRestaurant {
                restaurant: r,
                distance_km,
                quality_score,
                combined_score,
                serial: 0,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(Ordering::Equal)
            .then(a.distance_km.partial_cmp(&b.distance_km).unwrap_or(Ordering::Equal))
    });
    for (i, entry) in ranked.iter_mut().enumerate() {
        entry.serial = i as u32 + 1;
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(id: &str, lat: f64, lon: f64, cuisine: CuisineType) -> Restaurant {
        Restaurant {
            id: id.into(),
            name: id.into(),
            contact: format!("9190000{id}"),
            latitude: lat,
            longitude: lon,
            address: "Lucknow".into(),
            cuisine,
            delivery_fee: 25.0,
            upi_id: None,
            is_active: true,
        }
    }

    #[test]
    fn haversine_known_values() {
        assert!(haversine_km(26.85, 80.95, 26.85, 80.95) < 1e-9);
        // One degree of latitude is about 111.2 km.
        let d = haversine_km(26.0, 80.95, 27.0, 80.95);
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn radius_filter_discards_far_restaurants() {
        let near = restaurant("near", 26.86, 80.95, CuisineType::Both);
        let far = restaurant("far", 28.61, 77.20, CuisineType::Both); // Delhi, ~400 km
        let ranked = rank(vec![near, far], 26.8527, 80.9495, 50.0, None, |_| 4.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].restaurant.id, "near");
    }

    #[test]
    fn ranking_is_a_total_order_with_distance_tiebreak() {
        let rs = vec![
            restaurant("a", 26.86, 80.95, CuisineType::Both),
            restaurant("b", 26.90, 80.95, CuisineType::Both),
            restaurant("c", 26.8530, 80.9495, CuisineType::Both),
            restaurant("d", 27.10, 80.95, CuisineType::Both),
        ];
        let ranked = rank(rs, 26.8527, 80.9495, 50.0, None, |r| {
            if r.id == "b" { 5.0 } else { 4.0 }
        });
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].combined_score >= pair[1].combined_score);
            if (pair[0].combined_score - pair[1].combined_score).abs() < 1e-12 {
                assert!(pair[0].distance_km <= pair[1].distance_km);
            }
        }
        // Equal quality means the nearest wins.
        assert_eq!(ranked[0].restaurant.id, "c");
    }

    #[test]
    fn serials_are_one_based_and_contiguous() {
        let rs = vec![
            restaurant("a", 26.86, 80.95, CuisineType::Both),
            restaurant("b", 26.87, 80.95, CuisineType::Both),
            restaurant("c", 26.88, 80.95, CuisineType::Both),
        ];
        let ranked = rank(rs, 26.8527, 80.9495, 50.0, None, |_| 4.0);
        let serials: Vec<u32> = ranked.iter().map(|r| r.serial).collect();
        assert_eq!(serials, vec![1, 2, 3]);
    }

    #[test]
    fn cuisine_filter_applies_before_scoring() {
        let rs = vec![
            restaurant("veg", 26.86, 80.95, CuisineType::Veg),
            restaurant("nonveg", 26.86, 80.96, CuisineType::NonVeg),
            restaurant("both", 26.86, 80.97, CuisineType::Both),
            restaurant("meal", 26.86, 80.98, CuisineType::FullMeal),
        ];
        let ranked = rank(rs, 26.8527, 80.9495, 50.0, Some(CuisineType::Veg), |_| 4.0);
        let ids: Vec<&str> = ranked.iter().map(|r| r.restaurant.id.as_str()).collect();
        assert!(ids.contains(&"veg"));
        assert!(ids.contains(&"both"));
        assert!(ids.contains(&"meal"));
        assert!(!ids.contains(&"nonveg"));
    }

    #[test]
    fn inactive_restaurants_never_rank() {
        let mut r = restaurant("closed", 26.86, 80.95, CuisineType::Both);
        r.is_active = false;
        let ranked = rank(vec![r], 26.8527, 80.9495, 50.0, None, |_| 4.0);
        assert!(ranked.is_empty());
    }
}
