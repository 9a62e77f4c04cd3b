// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Twilio Messages API.
//!
//! Provides [`WhatsAppChannel`] which handles request construction, basic
//! authentication, and mapping provider failures onto [`BhojanError`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use bhojan_core::{BhojanError, MessageChannel, MessageId};

/// Base URL for the Twilio REST API.
const API_BASE_URL: &str = "https://api.twilio.com";

/// Request timeout. WhatsApp sends are fire-and-forget from the engine's
/// point of view, so a stuck request only ties up one detached task.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Twilio account credentials.
#[derive(Debug, Clone)]
struct Credentials {
    account_sid: String,
    auth_token: String,
}

/// WhatsApp message channel backed by Twilio.
///
/// Credentials are optional: a channel built without them accepts sends and
/// fails each one with a channel error, so a locally-run instance still
/// records its notification attempts in the audit trail.
#[derive(Debug, Clone)]
pub struct WhatsAppChannel {
    client: reqwest::Client,
    credentials: Option<Credentials>,
    sender: String,
    base_url: String,
}

/// Successful Messages API response. Only the message SID is of interest.
#[derive(Debug, Deserialize)]
struct SendResponse {
    sid: String,
}

impl WhatsAppChannel {
    /// Creates a new channel.
    ///
    /// `sender` is the provider-registered WhatsApp number the messages are
    /// sent from, e.g. `whatsapp:+14155238886`.
    pub fn new(
        account_sid: Option<String>,
        auth_token: Option<String>,
        sender: impl Into<String>,
    ) -> Result<Self, BhojanError> {
        let credentials = match (account_sid, auth_token) {
            (Some(account_sid), Some(auth_token)) => Some(Credentials { account_sid, auth_token }),
            _ => None,
        };

        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| BhojanError::Channel {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            credentials,
            sender: sender.into(),
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing against a local server).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Formats a recipient as a Twilio WhatsApp address.
    ///
    /// Accepts anything the rest of the system treats as a contact: a bare
    /// national number, an E.164 number, or an address that already carries
    /// the `whatsapp:` scheme. Bare ten-digit numbers get the Indian
    /// country code.
    fn whatsapp_address(to: &str) -> String {
        let digits: String = to
            .trim()
            .trim_start_matches("whatsapp:")
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.len() == 10 {
            format!("whatsapp:+91{digits}")
        } else {
            format!("whatsapp:+{digits}")
        }
    }
}

#[async_trait]
impl MessageChannel for WhatsAppChannel {
    async fn send(&self, to: &str, body: &str) -> Result<MessageId, BhojanError> {
        let Some(credentials) = &self.credentials else {
            return Err(BhojanError::Channel {
                message: "messaging credentials not configured".to_string(),
                source: None,
            });
        };

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, credentials.account_sid
        );
        let recipient = Self::whatsapp_address(to);
        let form = [
            ("From", self.sender.as_str()),
            ("To", recipient.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&form)
            .send()
            .await
            .map_err(|e| BhojanError::Channel {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BhojanError::Channel {
                message: format!("send rejected with status {status}: {detail}"),
                source: None,
            });
        }

        let parsed: SendResponse = response.json().await.map_err(|e| BhojanError::Channel {
            message: format!("malformed send response: {e}"),
            source: Some(Box::new(e)),
        })?;
        debug!(to = %recipient, message_sid = %parsed.sid, "whatsapp message accepted");
        Ok(MessageId(parsed.sid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_national_number_gets_the_country_code() {
        assert_eq!(
            WhatsAppChannel::whatsapp_address("9876543210"),
            "whatsapp:+919876543210"
        );
    }

    #[test]
    fn e164_and_scheme_prefixed_addresses_pass_through() {
        assert_eq!(
            WhatsAppChannel::whatsapp_address("+919876543210"),
            "whatsapp:+919876543210"
        );
        assert_eq!(
            WhatsAppChannel::whatsapp_address("whatsapp:+919876543210"),
            "whatsapp:+919876543210"
        );
        assert_eq!(
            WhatsAppChannel::whatsapp_address("whatsapp: 91 98765 43210"),
            "whatsapp:+919876543210"
        );
    }

    #[tokio::test]
    async fn missing_credentials_fail_the_send_without_a_request() {
        let channel = WhatsAppChannel::new(None, None, "whatsapp:+14155238886").unwrap();
        let err = channel.send("9876543210", "hello").await.unwrap_err();
        assert!(err.to_string().contains("credentials"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_surfaces_as_a_channel_error() {
        let channel = WhatsAppChannel::new(
            Some("AC_test".to_string()),
            Some("token".to_string()),
            "whatsapp:+14155238886",
        )
        .unwrap()
        .with_base_url("http://127.0.0.1:9".to_string());
        let err = channel.send("9876543210", "hello").await.unwrap_err();
        assert!(matches!(err, BhojanError::Channel { .. }));
    }
}
