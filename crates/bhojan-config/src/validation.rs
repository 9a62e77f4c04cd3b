// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive radii, sane time windows, and well-formed
//! base URLs.

use crate::diagnostic::ConfigError;
use crate::model::BhojanConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &BhojanConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.engine.search_radius_km <= 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.search_radius_km must be positive, got {}",
                config.engine.search_radius_km
            ),
        });
    }

    if config.engine.location_cache_minutes <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.location_cache_minutes must be positive, got {}",
                config.engine.location_cache_minutes
            ),
        });
    }

    if config.engine.qr_window_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.qr_window_secs must be positive".to_string(),
        });
    }

    for (key, url) in [
        ("engine.frontend_base", &config.engine.frontend_base),
        ("engine.maps_base", &config.engine.maps_base),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be an http(s) URL, got `{url}`"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let host = config.gateway.host.trim();
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Credentials come as a pair or not at all.
    if config.messaging.account_sid.is_some() != config.messaging.auth_token.is_some() {
        errors.push(ConfigError::Validation {
            message: "messaging.account_sid and messaging.auth_token must be set together"
                .to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = BhojanConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn negative_radius_fails_validation() {
        let mut config = BhojanConfig::default();
        config.engine.search_radius_km = -1.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("search_radius_km"))
        ));
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = BhojanConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn bad_frontend_base_fails_validation() {
        let mut config = BhojanConfig::default();
        config.engine.frontend_base = "bhojan.app".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("frontend_base"))
        ));
    }

    #[test]
    fn half_configured_credentials_fail_validation() {
        let mut config = BhojanConfig::default();
        config.messaging.account_sid = Some("AC123".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("auth_token"))
        ));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = BhojanConfig::default();
        config.gateway.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/test.db".to_string();
        config.messaging.account_sid = Some("AC123".to_string());
        config.messaging.auth_token = Some("secret".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
