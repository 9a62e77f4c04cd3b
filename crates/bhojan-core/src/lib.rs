// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the bhojan conversational ordering engine.
//!
//! This crate provides the error type, domain records, and boundary traits
//! used throughout the bhojan workspace. Storage backends and channel
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BhojanError;
pub use types::{InboundEvent, MessageId, OutboundMessage};

// Re-export all boundary traits at crate root.
pub use traits::{
    MessageChannel, NotificationStore, OrderStore, ProductDirectory, RestaurantDirectory,
    SessionStore,
};
