// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the bhojan ordering engine.

use thiserror::Error;

/// The primary error type used across all bhojan boundary traits and core operations.
#[derive(Debug, Error)]
pub enum BhojanError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (send failure, gateway rejection, rate limiting).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unparseable or empty inbound input (bad location payload, empty body).
    /// Answered with a corrective prompt; never changes state.
    #[error("invalid input: {0}")]
    Input(String),

    /// A referenced entity does not exist (restaurant, order, product).
    #[error("not found: {0}")]
    NotFound(String),

    /// The acting party is not allowed to touch the referenced entity
    /// (operator command against another restaurant's order).
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_render() {
        let e = BhojanError::Input("latitude is not a decimal".into());
        assert_eq!(e.to_string(), "invalid input: latitude is not a decimal");

        let e = BhojanError::NotFound("order 123".into());
        assert_eq!(e.to_string(), "not found: order 123");

        let e = BhojanError::Unauthorized("order belongs to another restaurant".into());
        assert!(e.to_string().starts_with("not authorized"));
    }

    #[test]
    fn storage_error_wraps_source() {
        let e = BhojanError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert!(e.to_string().contains("disk gone"));
    }
}
