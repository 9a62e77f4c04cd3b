// SPDX-FileCopyrightText: 2026 Bhojan Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-contact conversational state machine.
//!
//! Each inbound customer event is one transition: the stored session record
//! is lifted into a typed [`StepView`], matched against the classified
//! input, and written back with the next step, field updates, and exactly
//! one reply. The view is where self-healing lives -- a
//! `restaurant_selection` record with no candidates cannot be represented
//! and collapses to `LocationRequest`, so the transition logic never sees
//! the inconsistent shape.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use bhojan_core::types::{CustomerSession, RestaurantChoice, SessionStep};
use bhojan_core::{BhojanError, InboundEvent, OrderStore, RestaurantDirectory, SessionStore};

use crate::engine::EngineConfig;
use crate::input::{self, Input};
use crate::links;
use crate::locator;
use crate::messages::{self, ListHeading};
use crate::qr::QrCorrelationWindow;
use crate::score::QualityScores;

/// Typed projection of a stored session record.
///
/// Each variant carries only the fields meaningful to that step; a record
/// whose step names fields it does not actually hold degrades to the
/// closest consistent variant.
#[derive(Debug, Clone, PartialEq)]
pub enum StepView {
    LocationRequest,
    LocationConfirm { latitude: f64, longitude: f64 },
    RestaurantSelection { candidates: Vec<RestaurantChoice> },
    Menu,
    RestaurantClosedConfirm { restaurant_id: String },
    QrRestaurantSelected,
    QrLocationRequest { restaurant_id: String },
    QrLocationConfirm { restaurant_id: String, latitude: f64, longitude: f64 },
    Idle,
}

/// Build the typed view of a session record.
pub fn view_of(session: &CustomerSession) -> StepView {
    match session.current_step {
        SessionStep::LocationRequest => StepView::LocationRequest,
        SessionStep::LocationConfirm => {
            match (session.latitude, session.longitude, &session.location_timestamp) {
                (Some(latitude), Some(longitude), Some(_)) => {
                    StepView::LocationConfirm { latitude, longitude }
                }
                _ => StepView::LocationRequest,
            }
        }
        SessionStep::RestaurantSelection => {
            if session.nearby_restaurants.is_empty() {
                StepView::LocationRequest
            } else {
                StepView::RestaurantSelection { candidates: session.nearby_restaurants.clone() }
            }
        }
        SessionStep::Menu => StepView::Menu,
        SessionStep::RestaurantClosedConfirm => match &session.restaurant_id {
            Some(id) => StepView::RestaurantClosedConfirm { restaurant_id: id.clone() },
            None => StepView::LocationRequest,
        },
        SessionStep::QrRestaurantSelected => StepView::QrRestaurantSelected,
        SessionStep::QrLocationRequest => match &session.restaurant_id {
            Some(id) => StepView::QrLocationRequest { restaurant_id: id.clone() },
            None => StepView::LocationRequest,
        },
        SessionStep::QrLocationConfirm => {
            match (&session.restaurant_id, session.latitude, session.longitude) {
                (Some(id), Some(latitude), Some(longitude)) => StepView::QrLocationConfirm {
                    restaurant_id: id.clone(),
                    latitude,
                    longitude,
                },
                (Some(id), _, _) => StepView::QrLocationRequest { restaurant_id: id.clone() },
                _ => StepView::LocationRequest,
            }
        }
        SessionStep::None => StepView::Idle,
    }
}

/// Whether a cached location timestamp is still usable at `now`.
pub fn location_fresh(timestamp: &str, now: DateTime<Utc>, max_minutes: i64) -> bool {
    let Ok(cached) = DateTime::parse_from_rfc3339(timestamp) else {
        return false;
    };
    let age = now.signed_duration_since(cached.with_timezone(&Utc));
    age <= Duration::minutes(max_minutes)
}

fn is_same_choice(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "1" | "same" | "yes" | "y" | "use same" | "same location" | "use same location"
    )
}

fn is_change_choice(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "2" | "change" | "no" | "new" | "different" | "new location" | "change location"
    )
}

fn is_explore_choice(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "1" | "yes" | "y" | "nearby" | "show restaurants" | "show nearby restaurants"
    )
}

fn is_decline_choice(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "2" | "no" | "n" | "later" | "not now" | "maybe later"
    )
}

/// Resolve a selection against the cached candidate list: serial number
/// first, then exact lowercase name, then substring.
fn resolve_selection(candidates: &[RestaurantChoice], text: &str) -> Option<RestaurantChoice> {
    let needle = text.trim().to_lowercase();
    if let Ok(serial) = needle.parse::<u32>() {
        return candidates.iter().find(|c| c.serial == serial).cloned();
    }
    candidates
        .iter()
        .find(|c| c.name_lower == needle)
        .or_else(|| candidates.iter().find(|c| c.name_lower.contains(&needle)))
        .cloned()
}

/// Drives the customer-side conversation.
pub struct SessionEngine {
    sessions: Arc<dyn SessionStore>,
    restaurants: Arc<dyn RestaurantDirectory>,
    orders: Arc<dyn OrderStore>,
    scores: QualityScores,
    qr: Arc<QrCorrelationWindow>,
    radius_km: f64,
    cache_minutes: i64,
    frontend_base: String,
}

impl SessionEngine {
    pub fn new(
        config: &EngineConfig,
        sessions: Arc<dyn SessionStore>,
        restaurants: Arc<dyn RestaurantDirectory>,
        orders: Arc<dyn OrderStore>,
        scores: QualityScores,
        qr: Arc<QrCorrelationWindow>,
    ) -> Self {
        Self {
            sessions,
            restaurants,
            orders,
            scores,
            qr,
            radius_km: config.search_radius_km,
            cache_minutes: config.location_cache_minutes,
            frontend_base: config.frontend_base.clone(),
        }
    }

    /// Handle one customer event: load-or-create the session, apply the
    /// transition, persist, reply.
    pub async fn handle(
        &self,
        contact: &str,
        event: &InboundEvent,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        let input = input::classify(event)?;
        let now_str = crate::rfc3339(now);

        let (mut session, created) = match self.sessions.get_session(contact).await? {
            Some(s) => (s, false),
            None => {
                tracing::info!(contact, "new customer session");
                (CustomerSession::new(contact, event.display_name.clone(), &now_str), true)
            }
        };
        if session.customer_name.is_none() {
            session.customer_name = event.display_name.clone();
        }

        let reply = match input {
            Input::Location { latitude, longitude } => {
                self.on_location(&mut session, latitude, longitude, now).await?
            }
            Input::DeepLink { code } => self.on_deep_link(&mut session, &code, now).await?,
            Input::Greeting { bare } => self.on_greeting(&mut session, bare, now).await?,
            Input::Text(text) => self.on_text(&mut session, &text, now).await?,
        };

        session.updated_at = now_str;
        if created {
            self.sessions.create_session(&session).await?;
        } else {
            self.sessions.update_session(&session).await?;
        }
        Ok(reply)
    }

    async fn on_location(
        &self,
        session: &mut CustomerSession,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        if let StepView::QrLocationRequest { restaurant_id }
        | StepView::QrLocationConfirm { restaurant_id, .. } = view_of(session)
        {
            // QR flow: the restaurant is already chosen, skip ranking.
            if let Some(r) = self.restaurants.get_restaurant(&restaurant_id).await?
                && r.is_active
            {
                self.cache_location(session, latitude, longitude, now);
                session.current_step = SessionStep::QrRestaurantSelected;
                let link = links::menu_link(
                    &self.frontend_base,
                    &r.id,
                    &session.contact,
                    Some((latitude, longitude)),
                    session.customer_name.as_deref(),
                );
                return Ok(messages::menu_link_message(&r.name, &link));
            }
            session.restaurant_id = None;
        }
        self.rank_and_list(session, latitude, longitude, now, ListHeading::Fresh).await
    }

    async fn on_deep_link(
        &self,
        session: &mut CustomerSession,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        // The code is a live correlation token, or a plain restaurant id on
        // older printed QR codes.
        let restaurant_id = self.qr.consume(code).unwrap_or_else(|| code.to_string());
        self.enter_qr(session, &restaurant_id, now).await
    }

    async fn on_greeting(
        &self,
        session: &mut CustomerSession,
        bare: bool,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        if bare {
            // A plain "hi" is how a QR scan lands in the chat: a live scan
            // correlation wins over any restaurant already on the session,
            // which may be stale. Explicit restart phrases skip this and
            // reset.
            let target = self
                .qr
                .consume_most_recent()
                .or_else(|| session.restaurant_id.clone());
            if let Some(restaurant_id) = target {
                tracing::info!(
                    contact = %session.contact,
                    restaurant_id,
                    "greeting resolved to a restaurant context"
                );
                return self.enter_qr(session, &restaurant_id, now).await;
            }
        }

        session.restaurant_id = None;
        if self.location_is_fresh(session, now) {
            session.current_step = SessionStep::LocationConfirm;
            Ok(messages::welcome_back(display_name(session)))
        } else {
            session.clear_location();
            session.current_step = SessionStep::LocationRequest;
            Ok(messages::location_prompt())
        }
    }

    async fn enter_qr(
        &self,
        session: &mut CustomerSession,
        restaurant_id: &str,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        let Some(r) = self.restaurants.get_restaurant(restaurant_id).await? else {
            tracing::warn!(restaurant_id, "QR code references an unknown restaurant");
            session.clear_location();
            session.current_step = SessionStep::LocationRequest;
            return Ok(messages::location_prompt());
        };

        session.restaurant_id = Some(r.id.clone());
        if !r.is_active {
            session.current_step = SessionStep::RestaurantClosedConfirm;
            return Ok(messages::restaurant_closed(&r.name));
        }
        if self.location_is_fresh(session, now) {
            session.current_step = SessionStep::QrLocationConfirm;
            Ok(messages::qr_welcome_known_location(&r.name))
        } else {
            session.current_step = SessionStep::QrLocationRequest;
            Ok(messages::qr_welcome_share_location(&r.name))
        }
    }

    async fn on_text(
        &self,
        session: &mut CustomerSession,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<String, BhojanError> {
        match view_of(session) {
            StepView::LocationRequest => {
                let healed = session.current_step != SessionStep::LocationRequest;
                session.current_step = SessionStep::LocationRequest;
                if healed {
                    tracing::warn!(
                        contact = %session.contact,
                        "inconsistent session healed to location_request"
                    );
                    Ok(messages::share_location_again())
                } else {
                    Ok(messages::location_prompt())
                }
            }
            StepView::LocationConfirm { latitude, longitude } => {
                if is_same_choice(text) {
                    self.rank_and_list(session, latitude, longitude, now, ListHeading::CachedLocation)
                        .await
                } else if is_change_choice(text) {
                    session.clear_location();
                    session.current_step = SessionStep::LocationRequest;
                    Ok(messages::location_prompt())
                } else {
                    Ok(messages::welcome_back(display_name(session)))
                }
            }
            StepView::RestaurantSelection { candidates } => {
                let Some(choice) = resolve_selection(&candidates, text) else {
                    return Ok(messages::invalid_selection());
                };
                let Some(r) = self.restaurants.get_restaurant(&choice.restaurant_id).await?
                else {
                    return Ok(messages::invalid_selection());
                };
                session.restaurant_id = Some(r.id.clone());
                if !r.is_active {
                    session.current_step = SessionStep::RestaurantClosedConfirm;
                    return Ok(messages::restaurant_closed(&r.name));
                }
                session.current_step = SessionStep::Menu;
                let link =
                    links::menu_link(&self.frontend_base, &r.id, &session.contact, None, None);
                Ok(messages::selection_success(&r.name, &link))
            }
            StepView::RestaurantClosedConfirm { restaurant_id } => {
                if is_explore_choice(text) {
                    session.restaurant_id = None;
                    if let (Some(latitude), Some(longitude)) =
                        (session.latitude, session.longitude)
                    {
                        self.rank_and_list(session, latitude, longitude, now, ListHeading::Other)
                            .await
                    } else {
                        session.current_step = SessionStep::LocationRequest;
                        Ok(messages::share_location_again())
                    }
                } else if is_decline_choice(text) {
                    session.restaurant_id = None;
                    session.current_step = SessionStep::None;
                    Ok(messages::closed_declined())
                } else {
                    match self.restaurants.get_restaurant(&restaurant_id).await? {
                        Some(r) => Ok(messages::restaurant_closed(&r.name)),
                        None => {
                            session.restaurant_id = None;
                            session.current_step = SessionStep::LocationRequest;
                            Ok(messages::location_prompt())
                        }
                    }
                }
            }
            StepView::QrLocationRequest { .. } => Ok(messages::location_prompt()),
            StepView::QrLocationConfirm { restaurant_id, latitude, longitude } => {
                let Some(r) = self.restaurants.get_restaurant(&restaurant_id).await? else {
                    session.restaurant_id = None;
                    session.current_step = SessionStep::LocationRequest;
                    return Ok(messages::share_location_again());
                };
                if is_same_choice(text) {
                    session.current_step = SessionStep::QrRestaurantSelected;
                    let link = links::menu_link(
                        &self.frontend_base,
                        &r.id,
                        &session.contact,
                        Some((latitude, longitude)),
                        session.customer_name.as_deref(),
                    );
                    Ok(messages::menu_link_message(&r.name, &link))
                } else if is_change_choice(text) {
                    session.current_step = SessionStep::QrLocationRequest;
                    Ok(messages::location_prompt())
                } else {
                    Ok(messages::qr_welcome_known_location(&r.name))
                }
            }
            StepView::Menu | StepView::QrRestaurantSelected => Ok(messages::menu_ack()),
            StepView::Idle => self.on_greeting(session, false, now).await,
        }
    }

    /// Rank active restaurants around a point, cache the location and
    /// candidate snapshots, and reply with the list link.
    async fn rank_and_list(
        &self,
        session: &mut CustomerSession,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
        heading: ListHeading,
    ) -> Result<String, BhojanError> {
        let active = self.restaurants.list_active_restaurants().await?;
        let mut quality: HashMap<String, f64> = HashMap::with_capacity(active.len());
        for r in &active {
            let score = self.scores.score_for(&r.id, self.orders.as_ref()).await?;
            quality.insert(r.id.clone(), score);
        }

        let ranked = locator::rank(active, latitude, longitude, self.radius_km, None, |r| {
            quality.get(&r.id).copied().unwrap_or(crate::score::BASELINE_SCORE)
        });

        self.cache_location(session, latitude, longitude, now);
        if ranked.is_empty() {
            session.nearby_restaurants.clear();
            session.current_step = SessionStep::LocationRequest;
            return Ok(messages::no_restaurants());
        }

        session.nearby_restaurants = ranked
            .iter()
            .map(|entry| RestaurantChoice {
                serial: entry.serial,
                restaurant_id: entry.restaurant.id.clone(),
                name_lower: entry.restaurant.name.to_lowercase(),
            })
            .collect();
        session.current_step = SessionStep::RestaurantSelection;
        tracing::info!(
            contact = %session.contact,
            candidates = ranked.len(),
            "ranked nearby restaurants"
        );

        let link = links::restaurants_link(
            &self.frontend_base,
            latitude,
            longitude,
            &session.contact,
            display_name(session),
        );
        Ok(messages::restaurant_list(heading, &link))
    }

    fn cache_location(
        &self,
        session: &mut CustomerSession,
        latitude: f64,
        longitude: f64,
        now: DateTime<Utc>,
    ) {
        session.latitude = Some(latitude);
        session.longitude = Some(longitude);
        session.location_timestamp = Some(crate::rfc3339(now));
    }

    fn location_is_fresh(&self, session: &CustomerSession, now: DateTime<Utc>) -> bool {
        matches!(
            (session.latitude, session.longitude, &session.location_timestamp),
            (Some(_), Some(_), Some(ts)) if location_fresh(ts, now, self.cache_minutes)
        )
    }
}

fn display_name(session: &CustomerSession) -> &str {
    session.customer_name.as_deref().unwrap_or("there")
}
