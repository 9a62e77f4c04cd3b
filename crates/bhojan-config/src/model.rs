// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the bhojan ordering engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level bhojan configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BhojanConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Conversation engine tunables.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Outbound messaging provider settings.
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "bhojan".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Conversation engine tunables.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Restaurant search radius in kilometres.
    #[serde(default = "default_search_radius_km")]
    pub search_radius_km: f64,

    /// Minutes a cached customer location stays fresh.
    #[serde(default = "default_location_cache_minutes")]
    pub location_cache_minutes: i64,

    /// Seconds a QR scan stays correlatable with an incoming greeting.
    #[serde(default = "default_qr_window_secs")]
    pub qr_window_secs: u64,

    /// Base URL of the customer-facing web frontend (restaurant list, menu).
    #[serde(default = "default_frontend_base")]
    pub frontend_base: String,

    /// Base URL for map directions links.
    #[serde(default = "default_maps_base")]
    pub maps_base: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_radius_km: default_search_radius_km(),
            location_cache_minutes: default_location_cache_minutes(),
            qr_window_secs: default_qr_window_secs(),
            frontend_base: default_frontend_base(),
            maps_base: default_maps_base(),
        }
    }
}

fn default_search_radius_km() -> f64 {
    50.0
}

fn default_location_cache_minutes() -> i64 {
    30
}

fn default_qr_window_secs() -> u64 {
    180
}

fn default_frontend_base() -> String {
    "https://bhojan.app".to_string()
}

fn default_maps_base() -> String {
    "https://www.google.com/maps/dir/?api=1".to_string()
}

/// Outbound messaging provider configuration (Twilio-compatible API).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    /// Provider account SID. `None` disables outbound sending.
    #[serde(default)]
    pub account_sid: Option<String>,

    /// Provider auth token. `None` disables outbound sending.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Sender address, e.g. "whatsapp:+14155238886".
    #[serde(default = "default_sender")]
    pub sender: String,
}

fn default_sender() -> String {
    "whatsapp:+14155238886".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("bhojan").join("bhojan.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("bhojan.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the webhook server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}
