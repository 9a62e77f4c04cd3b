// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational ordering engine.
//!
//! The stateful core of bhojan: the per-customer session machine, the
//! location-based restaurant ranker, the QR scan correlation window, the
//! order status orchestrator with its two-phase notification dispatcher,
//! and the operator command grammar. Everything talks to the outside world
//! through the boundary traits in `bhojan-core`; the engine itself holds no
//! persistence or HTTP code.

pub mod command;
pub mod dispatch;
pub mod engine;
pub mod input;
pub mod links;
pub mod locator;
pub mod messages;
pub mod orchestrator;
pub mod qr;
pub mod score;
pub mod session;

pub use command::OperatorCommand;
pub use dispatch::{DispatchOutcome, Dispatcher, NotificationRequest};
pub use engine::{Engine, EngineConfig};
pub use locator::RankedRestaurant;
pub use orchestrator::{NewOrderRequest, OrderCommit, OrderLine, OrderOrchestrator};
pub use qr::QrCorrelationWindow;
pub use score::QualityScores;
pub use session::{SessionEngine, StepView};

/// RFC3339 with whole-second precision, the timestamp format of every
/// stored record.
pub(crate) fn rfc3339(instant: chrono::DateTime<chrono::Utc>) -> String {
    instant.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
