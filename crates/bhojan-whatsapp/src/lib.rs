// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp delivery channel backed by the Twilio Messages API.
//!
//! Implements the [`bhojan_core::MessageChannel`] trait so the engine can
//! send replies and order notifications without knowing anything about the
//! underlying provider.

pub mod client;

pub use client::WhatsAppChannel;
