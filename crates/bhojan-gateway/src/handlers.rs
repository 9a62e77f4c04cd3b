// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /webhook, GET /qr/{restaurant_id}, GET /health.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use bhojan_core::InboundEvent;

use crate::server::GatewayState;

/// Form payload the messaging provider posts for each inbound message.
///
/// Providers send many more fields; unknown ones are ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: Option<String>,
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<String>,
    #[serde(rename = "ProfileName", default)]
    pub profile_name: Option<String>,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// POST /webhook
///
/// Routes the event through the engine and returns the reply as a plain
/// text body. Always answers 200 so the provider never retry-storms.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Form(payload): Form<WebhookForm>,
) -> String {
    let event = InboundEvent {
        from: payload.from,
        body: non_empty(payload.body),
        latitude: non_empty(payload.latitude),
        longitude: non_empty(payload.longitude),
        display_name: non_empty(payload.profile_name),
    };
    state.engine.handle_event(&event).await
}

/// GET /qr/{restaurant_id}
///
/// Records the scan in the correlation window and redirects the phone's
/// browser into the chat with a token-carrying prefilled greeting, so the
/// follow-up message identifies the scanned restaurant exactly.
pub async fn get_qr_redirect(
    State(state): State<GatewayState>,
    Path(restaurant_id): Path<String>,
) -> Response {
    match state.restaurants.get_restaurant(&restaurant_id).await {
        Ok(Some(_)) => {
            let token = state.engine.qr().record_scan(&restaurant_id);
            let text = format!("Hi resto_{token}");
            let encoded = utf8_percent_encode(&text, NON_ALPHANUMERIC);
            let target = format!("https://wa.me/{}?text={}", state.bot_number, encoded);
            tracing::info!(restaurant_id = %restaurant_id, "qr scan recorded");
            Redirect::temporary(&target).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Html("<h1>Restaurant not found</h1>".to_string()),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(restaurant_id = %restaurant_id, %error, "qr lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// GET /health
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
