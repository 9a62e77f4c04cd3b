// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! QR scan correlation window.
//!
//! A printed QR code opens the chat channel with a fixed greeting, losing
//! the restaurant identifier in the process. The scan redirect records the
//! identifier here under a short random token and embeds the token in the
//! deep link; a bare greeting without a token still matches the most recent
//! live scan. Entries live for a fixed window and are single-use: consuming
//! one removes it. Expired entries are purged lazily on access.

use std::time::Duration;

use dashmap::DashMap;
use rand::Rng;
use rand::distributions::Alphanumeric;
use tokio::time::Instant;

const TOKEN_LEN: usize = 8;

#[derive(Debug, Clone)]
struct Scan {
    restaurant_id: String,
    scanned_at: Instant,
}

/// Token-keyed map of live QR scans.
pub struct QrCorrelationWindow {
    scans: DashMap<String, Scan>,
    window: Duration,
}

impl QrCorrelationWindow {
    pub fn new(window: Duration) -> Self {
        Self { scans: DashMap::new(), window }
    }

    /// Record a scan and return the correlation token for the redirect URL.
    pub fn record_scan(&self, restaurant_id: &str) -> String {
        self.purge_expired();
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.scans.insert(
            token.clone(),
            Scan { restaurant_id: restaurant_id.to_string(), scanned_at: Instant::now() },
        );
        token
    }

    /// Consume the scan behind a token, if it is still inside the window.
    pub fn consume(&self, token: &str) -> Option<String> {
        let (_, scan) = self.scans.remove(token)?;
        if scan.scanned_at.elapsed() <= self.window {
            Some(scan.restaurant_id)
        } else {
            None
        }
    }

    /// Consume the most recent live scan, for greetings that carry no token.
    pub fn consume_most_recent(&self) -> Option<String> {
        self.purge_expired();
        let latest = self
            .scans
            .iter()
            .max_by_key(|entry| entry.value().scanned_at)
            .map(|entry| entry.key().clone())?;
        self.scans.remove(&latest).map(|(_, scan)| scan.restaurant_id)
    }

    fn purge_expired(&self) {
        let window = self.window;
        self.scans.retain(|_, scan| scan.scanned_at.elapsed() <= window);
    }
}
