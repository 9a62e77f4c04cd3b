// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./bhojan.toml` > `~/.config/bhojan/bhojan.toml` > `/etc/bhojan/bhojan.toml`
//! with environment variable overrides via `BHOJAN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::BhojanConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/bhojan/bhojan.toml` (system-wide)
/// 3. `~/.config/bhojan/bhojan.toml` (user XDG config)
/// 4. `./bhojan.toml` (local directory)
/// 5. `BHOJAN_*` environment variables
pub fn load_config() -> Result<BhojanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BhojanConfig::default()))
        .merge(Toml::file("/etc/bhojan/bhojan.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("bhojan/bhojan.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("bhojan.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<BhojanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BhojanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<BhojanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BhojanConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `BHOJAN_MESSAGING_AUTH_TOKEN` must map
/// to `messaging.auth_token`, not `messaging.auth.token`.
fn env_provider() -> Env {
    Env::prefixed("BHOJAN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: BHOJAN_MESSAGING_AUTH_TOKEN -> "messaging_auth_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("engine_", "engine.", 1)
            .replacen("messaging_", "messaging.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
