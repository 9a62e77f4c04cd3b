// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for bhojan integration tests.
//!
//! Provides a mock channel, an in-memory store, and canned fixtures for
//! fast, deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChannel`] - captures outbound sends, with an injectable failure mode
//! - [`MemoryStore`] - in-memory implementation of all persistence traits

pub mod fixtures;
pub mod memory;
pub mod mock_channel;

pub use memory::MemoryStore;
pub use mock_channel::MockChannel;
