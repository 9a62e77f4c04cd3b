// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound event classification.
//!
//! Every webhook event is reduced to one of four inputs before the session
//! machine sees it: a location payload, a QR deep-link code, a greeting, or
//! free text. Location payloads arrive as decimal strings and must parse;
//! anything else about them is an input error answered with a corrective
//! prompt, never a state change.

use std::sync::LazyLock;

use regex::Regex;

use bhojan_core::{BhojanError, InboundEvent};

/// Deep-link code carried in the greeting text of a QR redirect,
/// e.g. "Hi resto_Ab3kQ9xZ". The code is either a live correlation token
/// or a plain restaurant id (older printed QR codes).
static DEEP_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"resto_([A-Za-z0-9_-]+)").unwrap_or_else(|_| unreachable!()));

/// Phrases that restart the conversation.
const GREETINGS: &[&str] = &["hi", "hello", "hey", "start", "begin", "new", "restart", "menu"];

/// Bare greetings are the only ones eligible for QR scan correlation.
const BARE_GREETINGS: &[&str] = &["hi", "hello", "hey"];

/// Classified inbound input.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Location { latitude: f64, longitude: f64 },
    DeepLink { code: String },
    Greeting { bare: bool },
    Text(String),
}

/// Reduce an inbound event to a classified input.
///
/// A location payload takes precedence over any text body. Unparsable
/// coordinates and empty messages are `Input` errors.
pub fn classify(event: &InboundEvent) -> Result<Input, BhojanError> {
    if event.latitude.is_some() || event.longitude.is_some() {
        let latitude = parse_coordinate(event.latitude.as_deref(), "latitude")?;
        let longitude = parse_coordinate(event.longitude.as_deref(), "longitude")?;
        return Ok(Input::Location { latitude, longitude });
    }

    let body = event.body.as_deref().unwrap_or("").trim();
    if body.is_empty() {
        return Err(BhojanError::Input("empty message".into()));
    }

    if let Some(caps) = DEEP_LINK.captures(body)
        && let Some(code) = caps.get(1)
    {
        return Ok(Input::DeepLink { code: code.as_str().to_string() });
    }

    let lower = body.to_lowercase();
    if GREETINGS.contains(&lower.as_str())
        || lower.starts_with("hi ")
        || lower.starts_with("hello ")
    {
        return Ok(Input::Greeting { bare: BARE_GREETINGS.contains(&lower.as_str()) });
    }

    Ok(Input::Text(body.to_string()))
}

fn parse_coordinate(raw: Option<&str>, field: &str) -> Result<f64, BhojanError> {
    let raw = raw.ok_or_else(|| BhojanError::Input(format!("{field} is missing")))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| BhojanError::Input(format!("{field} is not a decimal: {raw}")))?;
    if !value.is_finite() {
        return Err(BhojanError::Input(format!("{field} is not finite")));
    }
    Ok(value)
}

/// Canonical contact address: `whatsapp:` prefix and `+` stripped, spaces
/// removed, bare 10-digit numbers given the 91 country code.
pub fn normalize_contact(raw: &str) -> String {
    let mut contact = raw.trim().to_string();
    if let Some(rest) = contact.strip_prefix("whatsapp:") {
        contact = rest.to_string();
    }
    if let Some(rest) = contact.strip_prefix('+') {
        contact = rest.to_string();
    }
    contact.retain(|c| c != ' ');
    if contact.len() == 10 && contact.chars().all(|c| c.is_ascii_digit()) {
        contact = format!("91{contact}");
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(body: &str) -> InboundEvent {
        InboundEvent {
            from: "whatsapp:+919876543210".into(),
            body: Some(body.into()),
            latitude: None,
            longitude: None,
            display_name: None,
        }
    }

    #[test]
    fn location_payload_wins_over_text() {
        let mut e = event("hi");
        e.latitude = Some("26.8527".into());
        e.longitude = Some("80.9495".into());
        assert_eq!(
            classify(&e).unwrap(),
            Input::Location { latitude: 26.8527, longitude: 80.9495 }
        );
    }

    #[test]
    fn unparsable_coordinates_are_input_errors() {
        let mut e = event("");
        e.latitude = Some("26.85,27".into());
        e.longitude = Some("80.9495".into());
        assert!(matches!(classify(&e), Err(BhojanError::Input(_))));

        let mut e = event("");
        e.latitude = Some("26.8527".into());
        e.longitude = None;
        assert!(matches!(classify(&e), Err(BhojanError::Input(_))));
    }

    #[test]
    fn deep_link_code_is_extracted() {
        let got = classify(&event("Hi resto_Ab3kQ9xZ")).unwrap();
        assert_eq!(got, Input::DeepLink { code: "Ab3kQ9xZ".into() });
    }

    #[test]
    fn greetings_and_bareness() {
        assert_eq!(classify(&event("Hi")).unwrap(), Input::Greeting { bare: true });
        assert_eq!(classify(&event("HELLO")).unwrap(), Input::Greeting { bare: true });
        assert_eq!(classify(&event("restart")).unwrap(), Input::Greeting { bare: false });
        assert_eq!(classify(&event("hi there")).unwrap(), Input::Greeting { bare: false });
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(classify(&event("2")).unwrap(), Input::Text("2".into()));
        assert_eq!(
            classify(&event("Spice Villa")).unwrap(),
            Input::Text("Spice Villa".into())
        );
    }

    #[test]
    fn empty_body_is_an_input_error() {
        assert!(matches!(classify(&event("   ")), Err(BhojanError::Input(_))));
    }

    #[test]
    fn contact_normalization() {
        assert_eq!(normalize_contact("whatsapp:+919876543210"), "919876543210");
        assert_eq!(normalize_contact("+91 98765 43210"), "919876543210");
        assert_eq!(normalize_contact("9876543210"), "919876543210");
        assert_eq!(normalize_contact("919876543210"), "919876543210");
    }
}
