// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator command grammar.
//!
//! Restaurant operators manage orders with short replies of the form
//! `KEYWORD <order-ref>`, e.g. `PREPARE 000000007`. The keyword set is a
//! closed enum consumed by an exhaustive match in the engine; the order
//! reference resolves by exact id or unique prefix within the sender's own
//! restaurant.

/// A recognized operator command keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Acknowledgement only; the order stays `pending`.
    Accept,
    Prepare,
    Ready,
    Cancel,
    Delivered,
    /// Flips `payment_status` to `verified` on online orders; never
    /// touches the order status.
    Verify,
}

impl OperatorCommand {
    /// Parse `KEYWORD <order-ref>` from an inbound body. The keyword is
    /// case-insensitive; trailing tokens are ignored.
    pub fn parse(body: &str) -> Option<(OperatorCommand, String)> {
        let mut parts = body.split_whitespace();
        let keyword = parts.next()?.to_ascii_uppercase();
        let order_ref = parts.next()?;
        let command = match keyword.as_str() {
            "ACCEPT" => OperatorCommand::Accept,
            "PREPARE" => OperatorCommand::Prepare,
            "READY" => OperatorCommand::Ready,
            "CANCEL" => OperatorCommand::Cancel,
            "DELIVERED" => OperatorCommand::Delivered,
            "VERIFY" => OperatorCommand::Verify,
            _ => return None,
        };
        Some((command, order_ref.to_string()))
    }
}

/// Whether a message from an operator reads like a command attempt even
/// though the keyword is unknown: a long all-caps first token followed by
/// an argument. Such messages get an error reply instead of falling
/// through to the customer flow.
pub fn looks_like_command(body: &str) -> bool {
    let mut parts = body.split_whitespace();
    let Some(first) = parts.next() else { return false };
    first.len() >= 4
        && first.chars().all(|c| c.is_ascii_uppercase())
        && parts.next().is_some()
}
