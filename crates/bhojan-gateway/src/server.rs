// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use bhojan_core::{BhojanError, RestaurantDirectory};
use bhojan_engine::Engine;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The conversational engine every webhook event is routed through.
    pub engine: Arc<Engine>,
    /// Restaurant lookups for the QR redirect endpoint.
    pub restaurants: Arc<dyn RestaurantDirectory>,
    /// Digits-only bot number the QR redirect deep-links into.
    pub bot_number: String,
}

/// Gateway server configuration (mirrors GatewayConfig from bhojan-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Extracts the digits of the configured sender address, for wa.me links.
///
/// `whatsapp:+14155238886` becomes `14155238886`.
pub fn bot_number_from_sender(sender: &str) -> String {
    sender.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Builds the gateway router.
///
/// Routes:
/// - POST /webhook (messaging provider callback, replies in-band)
/// - GET /qr/{restaurant_id} (printed-QR scan redirect)
/// - GET /health
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/webhook", post(handlers::post_webhook))
        .route("/qr/{restaurant_id}", get(handlers::get_qr_redirect))
        .route("/health", get(handlers::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), BhojanError> {
    let app = router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| BhojanError::Internal(format!("failed to bind {addr}: {e}")))?;
    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, app)
        .await
        .map_err(|e| BhojanError::Internal(format!("gateway server error: {e}")))
}
