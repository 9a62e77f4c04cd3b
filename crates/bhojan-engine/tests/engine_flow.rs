// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end conversation and command flows against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use bhojan_core::types::{
    CustomerSession, OrderStatus, PaymentMethod, PaymentStatus, SessionStep,
};
use bhojan_core::{InboundEvent, OrderStore, SessionStore};
use bhojan_engine::{Engine, EngineConfig};
use bhojan_test_utils::{MemoryStore, MockChannel, fixtures};

const CUSTOMER: &str = "whatsapp:+919876543210";
const CUSTOMER_ID: &str = "919876543210";
const OPERATOR_PHONE: &str = "919000000001";

fn engine(store: &MemoryStore, channel: &Arc<MockChannel>) -> Engine {
    Engine::new(
        EngineConfig::default(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        channel.clone(),
    )
}

fn text(from: &str, body: &str) -> InboundEvent {
    InboundEvent {
        from: from.to_string(),
        body: Some(body.to_string()),
        latitude: None,
        longitude: None,
        display_name: Some("Asha".to_string()),
    }
}

fn location(from: &str, lat: &str, lon: &str) -> InboundEvent {
    InboundEvent {
        from: from.to_string(),
        body: None,
        latitude: Some(lat.to_string()),
        longitude: Some(lon.to_string()),
        display_name: Some("Asha".to_string()),
    }
}

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

async fn seed_lucknow(store: &MemoryStore) {
    // Two restaurants near Hazratganj, one across the country.
    store.add_restaurant(fixtures::restaurant("near", "Spice Villa", 26.8550, 80.9500)).await;
    store.add_restaurant(fixtures::restaurant("far", "Dosa Corner", 26.9000, 80.9600)).await;
    store.add_restaurant(fixtures::restaurant("mumbai", "Sea Breeze", 19.0760, 72.8777)).await;
}

#[tokio::test]
async fn greeting_then_location_yields_a_ranked_list() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let reply = engine.handle_event(&text(CUSTOMER, "Hi")).await;
    assert!(reply.contains("share your location"), "{reply}");

    let reply = engine
        .handle_event(&location(CUSTOMER, "26.8527", "80.9495"))
        .await;
    assert!(reply.contains("Restaurants Near You"), "{reply}");
    assert!(reply.contains("/restaurants?lat=26.8527&lon=80.9495"), "{reply}");
    assert!(reply.contains("token=919876543210"), "{reply}");

    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::RestaurantSelection);
    // The Mumbai restaurant is outside the 50 km radius; equal quality
    // means the nearer of the two survivors ranks first.
    assert_eq!(session.nearby_restaurants.len(), 2);
    assert_eq!(session.nearby_restaurants[0].restaurant_id, "near");
    assert_eq!(session.nearby_restaurants[0].serial, 1);
    assert_eq!(session.nearby_restaurants[1].serial, 2);
}

#[tokio::test]
async fn selection_by_serial_and_by_name() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    engine.handle_event(&location(CUSTOMER, "26.8527", "80.9495")).await;

    let reply = engine.handle_event(&text(CUSTOMER, "bogus pizza place")).await;
    assert!(reply.contains("Restaurant not found"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::RestaurantSelection);

    let reply = engine.handle_event(&text(CUSTOMER, "1")).await;
    assert!(reply.contains("*Spice Villa* selected"), "{reply}");
    assert!(reply.contains("/menu/near?token=919876543210"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::Menu);
    assert_eq!(session.restaurant_id.as_deref(), Some("near"));

    // A second contact picks by name substring instead.
    let reply = engine.handle_event(&location("919876500000", "26.8527", "80.9495")).await;
    assert!(reply.contains("Restaurants Near You"));
    let reply = engine.handle_event(&text("919876500000", "dosa")).await;
    assert!(reply.contains("*Dosa Corner* selected"), "{reply}");
}

#[tokio::test]
async fn menu_step_acknowledges_free_text() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    engine.handle_event(&location(CUSTOMER, "26.8527", "80.9495")).await;
    engine.handle_event(&text(CUSTOMER, "1")).await;
    let reply = engine.handle_event(&text(CUSTOMER, "2 dosas please")).await;
    assert!(reply.contains("Order received"), "{reply}");
}

#[tokio::test]
async fn cached_location_is_fresh_for_thirty_minutes() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let t0 = at("2026-01-01T12:00:00Z");
    engine
        .handle_event_at(&location(CUSTOMER, "26.8527", "80.9495"), t0)
        .await;

    // 29:59 later: the cache is still usable, offer to reuse it.
    let reply = engine
        .handle_event_at(&text(CUSTOMER, "hi"), at("2026-01-01T12:29:59Z"))
        .await;
    assert!(reply.contains("Welcome back Asha"), "{reply}");
    assert!(reply.contains("Use same location"), "{reply}");

    let reply = engine
        .handle_event_at(&text(CUSTOMER, "1"), at("2026-01-01T12:29:59Z"))
        .await;
    assert!(reply.contains("Using your previous location"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::RestaurantSelection);

    // A fresh conversation 30:01 after the original share is stale.
    let reply = engine
        .handle_event_at(&text(CUSTOMER, "hello"), at("2026-01-01T13:00:00Z"))
        .await;
    assert!(reply.contains("share your location"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::LocationRequest);
    assert!(session.latitude.is_none());
    assert!(session.nearby_restaurants.is_empty());
}

#[tokio::test]
async fn changing_location_clears_the_cache() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let t0 = at("2026-01-01T12:00:00Z");
    engine.handle_event_at(&location(CUSTOMER, "26.8527", "80.9495"), t0).await;
    engine.handle_event_at(&text(CUSTOMER, "hi"), at("2026-01-01T12:05:00Z")).await;
    let reply = engine
        .handle_event_at(&text(CUSTOMER, "2"), at("2026-01-01T12:05:10Z"))
        .await;
    assert!(reply.contains("share your location"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert!(session.latitude.is_none());
    assert!(session.location_timestamp.is_none());
}

#[tokio::test]
async fn inconsistent_selection_session_heals_to_location_request() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let mut broken = CustomerSession::new(CUSTOMER_ID, Some("Asha".into()), "2026-01-01T12:00:00Z");
    broken.current_step = SessionStep::RestaurantSelection;
    assert!(broken.nearby_restaurants.is_empty());
    store.create_session(&broken).await.unwrap();

    let reply = engine.handle_event(&text(CUSTOMER, "1")).await;
    assert!(reply.contains("share your location again"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::LocationRequest);
}

#[tokio::test]
async fn unparsable_location_gets_a_corrective_prompt() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&location(CUSTOMER, "not-a-number", "80.9495"))
        .await;
    assert!(reply.contains("Invalid location"), "{reply}");
    // No session state was touched.
    assert!(store.get_session(CUSTOMER_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn closed_restaurant_offers_alternatives() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let mut closed = fixtures::restaurant("shut", "Night Owl", 26.8540, 80.9490);
    closed.is_active = false;
    store.add_restaurant(closed).await;
    let engine = engine(&store, &channel);

    // QR deep link straight to the closed restaurant.
    let reply = engine.handle_event(&text(CUSTOMER, "Hi resto_shut")).await;
    assert!(reply.contains("Night Owl is currently CLOSED"), "{reply}");

    let reply = engine.handle_event(&text(CUSTOMER, "2")).await;
    assert!(reply.contains("No problem"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::None);

    // Next greeting starts fresh.
    let reply = engine.handle_event(&text(CUSTOMER, "hi")).await;
    assert!(reply.contains("share your location"), "{reply}");
}

#[tokio::test]
async fn bare_greeting_reuses_the_session_restaurant_context() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    engine.handle_event(&text(CUSTOMER, "Hi resto_near")).await;

    // Another bare greeting stays with the scanned restaurant.
    let reply = engine.handle_event(&text(CUSTOMER, "hi")).await;
    assert!(reply.contains("Welcome to Spice Villa"), "{reply}");

    // An explicit restart phrase drops it.
    let reply = engine.handle_event(&text(CUSTOMER, "restart")).await;
    assert!(!reply.contains("Spice Villa"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert!(session.restaurant_id.is_none());
}

#[tokio::test]
async fn live_scan_outranks_stale_session_context() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    // Old context from an earlier scan.
    let reply = engine.handle_event(&text(CUSTOMER, "Hi resto_near")).await;
    assert!(reply.contains("Welcome to Spice Villa"), "{reply}");

    // The customer scans another restaurant's QR and greets again: the
    // fresh scan wins over the session's stale restaurant.
    engine.qr().record_scan("far");
    let reply = engine.handle_event(&text(CUSTOMER, "hi")).await;
    assert!(reply.contains("Welcome to Dosa Corner"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.restaurant_id.as_deref(), Some("far"));

    // And the scan was consumed, not left for someone else's greeting.
    let reply = engine.handle_event(&text("919876500000", "hi")).await;
    assert!(reply.contains("Welcome to Food Delivery"), "{reply}");
}

#[tokio::test]
async fn qr_deep_link_with_location_goes_straight_to_the_menu() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let reply = engine.handle_event(&text(CUSTOMER, "Hi resto_near")).await;
    assert!(reply.contains("Welcome to Spice Villa"), "{reply}");
    assert!(reply.contains("share your location"), "{reply}");

    let reply = engine
        .handle_event(&location(CUSTOMER, "26.8527", "80.9495"))
        .await;
    assert!(reply.contains("Tap to view menu and order"), "{reply}");
    assert!(reply.contains("/menu/near?token=919876543210&lat=26.8527&lon=80.9495"), "{reply}");
    let session = store.get_session(CUSTOMER_ID).await.unwrap().unwrap();
    assert_eq!(session.current_step, SessionStep::QrRestaurantSelected);
}

#[tokio::test(start_paused = true)]
async fn qr_scan_matches_a_greeting_inside_the_window() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    engine.qr().record_scan("near");
    tokio::time::advance(Duration::from_secs(170)).await;

    let reply = engine.handle_event(&text(CUSTOMER, "hi")).await;
    assert!(reply.contains("Welcome to Spice Villa"), "{reply}");

    // Single-use: a second fresh contact greeting finds nothing.
    let reply = engine.handle_event(&text("919876500000", "hi")).await;
    assert!(reply.contains("Welcome to Food Delivery"), "{reply}");
}

#[tokio::test(start_paused = true)]
async fn qr_scan_expires_after_the_window() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    engine.qr().record_scan("near");
    tokio::time::advance(Duration::from_secs(200)).await;

    let reply = engine.handle_event(&text(CUSTOMER, "hi")).await;
    assert!(reply.contains("Welcome to Food Delivery"), "{reply}");
}

#[tokio::test(start_paused = true)]
async fn qr_token_deep_link_resolves_the_scan() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_lucknow(&store).await;
    let engine = engine(&store, &channel);

    let token = engine.qr().record_scan("near");
    let reply = engine.handle_event(&text(CUSTOMER, &format!("Hi resto_{token}"))).await;
    assert!(reply.contains("Welcome to Spice Villa"), "{reply}");
}

async fn seed_operator(store: &MemoryStore) {
    let mut r = fixtures::restaurant("r1", "Spice Villa", 26.8550, 80.9500);
    r.contact = OPERATOR_PHONE.to_string();
    store.add_restaurant(r).await;
}

#[tokio::test]
async fn prepare_command_moves_the_order_and_audits_a_notification() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    store
        .create_order(&fixtures::order("000000007", "r1", CUSTOMER_ID, "2026-01-01T10:00:00Z"))
        .await
        .unwrap();
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "PREPARE 000000007"))
        .await;
    assert!(reply.contains("Order 00000000 updated to: *PREPARING*"), "{reply}");

    let order = store.get_order("000000007").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Preparing);

    let records = store.all_notifications().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event.to_string(), "preparing");
    assert_eq!(records[0].recipient, CUSTOMER_ID);
}

#[tokio::test]
async fn order_refs_resolve_by_unique_prefix_only() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    store
        .create_order(&fixtures::order("000000007", "r1", CUSTOMER_ID, "2026-01-01T10:00:00Z"))
        .await
        .unwrap();
    store
        .create_order(&fixtures::order("000000012", "r1", CUSTOMER_ID, "2026-01-01T11:00:00Z"))
        .await
        .unwrap();
    let engine = engine(&store, &channel);
    let operator = format!("whatsapp:+{OPERATOR_PHONE}");

    // Ambiguous prefix matches both orders.
    let reply = engine.handle_event(&text(&operator, "READY 0000000")).await;
    assert!(reply.contains("not found"), "{reply}");

    // Unique prefix works.
    let reply = engine.handle_event(&text(&operator, "READY 00000001")).await;
    assert!(reply.contains("updated to: *READY*"), "{reply}");
    let order = store.get_order("000000012").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
}

#[tokio::test]
async fn commands_against_foreign_orders_are_denied() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    store.add_restaurant(fixtures::restaurant("r2", "Dosa Corner", 26.87, 80.95)).await;
    store
        .create_order(&fixtures::order("000000042", "r2", CUSTOMER_ID, "2026-01-01T10:00:00Z"))
        .await
        .unwrap();
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "CANCEL 000000042"))
        .await;
    assert!(reply.contains("does not belong to your restaurant"), "{reply}");
    let order = store.get_order("000000042").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn backward_transitions_are_refused_with_a_reply() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    let mut order = fixtures::order("000000007", "r1", CUSTOMER_ID, "2026-01-01T10:00:00Z");
    order.status = OrderStatus::Ready;
    store.create_order(&order).await.unwrap();
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "PREPARE 000000007"))
        .await;
    assert!(reply.contains("cannot be moved backwards"), "{reply}");
    let order = store.get_order("000000007").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Ready);
}

#[tokio::test]
async fn accept_acknowledges_without_changing_status() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    store
        .create_order(&fixtures::order("000000007", "r1", CUSTOMER_ID, "2026-01-01T10:00:00Z"))
        .await
        .unwrap();
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "ACCEPT 000000007"))
        .await;
    assert!(reply.contains("acknowledged"), "{reply}");
    let order = store.get_order("000000007").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(store.all_notifications().await.is_empty());
}

#[tokio::test]
async fn verify_flips_payment_and_notifies_the_customer() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    let mut order = fixtures::order("000000007", "r1", CUSTOMER_ID, "2026-01-01T10:00:00Z");
    order.payment_method = PaymentMethod::Online;
    store.create_order(&order).await.unwrap();
    let engine = engine(&store, &channel);
    let operator = format!("whatsapp:+{OPERATOR_PHONE}");

    let reply = engine.handle_event(&text(&operator, "VERIFY 000000007")).await;
    assert!(reply.contains("Payment Verified"), "{reply}");
    assert!(reply.contains("Customer has been notified"), "{reply}");

    let order = store.get_order("000000007").await.unwrap().unwrap();
    assert_eq!(order.payment_status, PaymentStatus::Verified);
    assert_eq!(order.status, OrderStatus::Pending);

    let records = store.all_notifications().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].event.to_string(), "payment_received");

    // A second VERIFY is refused.
    let reply = engine.handle_event(&text(&operator, "VERIFY 000000007")).await;
    assert!(reply.contains("already verified"), "{reply}");
}

#[tokio::test]
async fn verify_is_refused_for_cod_orders() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    store
        .create_order(&fixtures::order("000000007", "r1", CUSTOMER_ID, "2026-01-01T10:00:00Z"))
        .await
        .unwrap();
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "VERIFY 000000007"))
        .await;
    assert!(reply.contains("not an online payment order"), "{reply}");
}

#[tokio::test]
async fn unknown_operator_keyword_gets_an_error_reply() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "REJECT 000000007"))
        .await;
    assert!(reply.contains("Unknown command"), "{reply}");
}

#[tokio::test]
async fn operators_chatting_normally_reach_the_customer_flow() {
    let store = MemoryStore::new();
    let channel = Arc::new(MockChannel::new());
    seed_operator(&store).await;
    let engine = engine(&store, &channel);

    let reply = engine
        .handle_event(&text(&format!("whatsapp:+{OPERATOR_PHONE}"), "hi"))
        .await;
    assert!(reply.contains("share your location"), "{reply}");
}
