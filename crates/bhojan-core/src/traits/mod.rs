// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary traits separating the conversation engine from its adapters.

pub mod channel;
pub mod directory;
pub mod store;

pub use channel::MessageChannel;
pub use directory::{ProductDirectory, RestaurantDirectory};
pub use store::{NotificationStore, OrderStore, SessionStore};
