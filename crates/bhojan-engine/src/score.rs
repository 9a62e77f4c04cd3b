// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Restaurant quality-score cache.
//!
//! Scores feed the locator's combined ranking. A restaurant with no rated
//! orders gets a neutral 4.0 baseline; rated orders contribute their mean;
//! delivered volume adds a small capped bonus. There is no TTL -- the cache
//! is invalidated explicitly whenever an order is created or its status
//! committed, and is otherwise allowed to go briefly stale.

use std::sync::Arc;

use dashmap::DashMap;

use bhojan_core::{BhojanError, OrderStore};
use bhojan_core::types::OrderStatus;

pub(crate) const BASELINE_SCORE: f64 = 4.0;
const VOLUME_BONUS_PER_ORDER: f64 = 0.05;
const VOLUME_BONUS_CAP: f64 = 0.5;
const MAX_SCORE: f64 = 5.0;

/// Shared quality-score cache keyed by restaurant id.
#[derive(Clone, Default)]
pub struct QualityScores {
    cache: Arc<DashMap<String, f64>>,
}

impl QualityScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached score for a restaurant, computed from its order history on miss.
    pub async fn score_for(
        &self,
        restaurant_id: &str,
        orders: &dyn OrderStore,
    ) -> Result<f64, BhojanError> {
        if let Some(score) = self.cache.get(restaurant_id) {
            return Ok(*score);
        }

        let history = orders.list_orders_by_restaurant(restaurant_id).await?;
        let ratings: Vec<f64> = history.iter().filter_map(|o| o.customer_rating).collect();
        let base = if ratings.is_empty() {
            BASELINE_SCORE
        } else {
            ratings.iter().sum::<f64>() / ratings.len() as f64
        };
        let delivered = history
            .iter()
            .filter(|o| o.status == OrderStatus::Delivered)
            .count();
        let bonus = (delivered as f64 * VOLUME_BONUS_PER_ORDER).min(VOLUME_BONUS_CAP);
        let score = (base + bonus).min(MAX_SCORE);

        self.cache.insert(restaurant_id.to_string(), score);
        Ok(score)
    }

    /// Drop the cached score so the next lookup recomputes it.
    pub fn invalidate(&self, restaurant_id: &str) {
        self.cache.remove(restaurant_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhojan_test_utils::{MemoryStore, fixtures};

    #[tokio::test]
    async fn baseline_when_no_history() {
        let store = MemoryStore::new();
        let scores = QualityScores::new();
        let score = scores.score_for("r1", &store).await.unwrap();
        assert_eq!(score, 4.0);
    }

    #[tokio::test]
    async fn ratings_and_delivered_volume_shape_the_score() {
        let store = MemoryStore::new();
        let mut a = fixtures::order("000000001", "r1", "919876543210", "2026-01-01T10:00:00Z");
        a.status = OrderStatus::Delivered;
        a.customer_rating = Some(5.0);
        let mut b = fixtures::order("000000002", "r1", "919876543210", "2026-01-01T11:00:00Z");
        b.status = OrderStatus::Delivered;
        b.customer_rating = Some(3.0);
        store.create_order(&a).await.unwrap();
        store.create_order(&b).await.unwrap();

        let scores = QualityScores::new();
        let score = scores.score_for("r1", &store).await.unwrap();
        // mean 4.0 + two delivered orders * 0.05
        assert!((score - 4.1).abs() < 1e-9, "got {score}");
    }

    #[tokio::test]
    async fn invalidation_forces_recompute() {
        let store = MemoryStore::new();
        let scores = QualityScores::new();
        assert_eq!(scores.score_for("r1", &store).await.unwrap(), 4.0);

        let mut o = fixtures::order("000000003", "r1", "919876543210", "2026-01-01T10:00:00Z");
        o.status = OrderStatus::Delivered;
        o.customer_rating = Some(5.0);
        store.create_order(&o).await.unwrap();

        // Stale until invalidated.
        assert_eq!(scores.score_for("r1", &store).await.unwrap(), 4.0);
        scores.invalidate("r1");
        let fresh = scores.score_for("r1", &store).await.unwrap();
        assert!((fresh - 5.0).abs() < 1e-9, "got {fresh}");
    }
}
