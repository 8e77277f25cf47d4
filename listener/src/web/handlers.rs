//! Hub listener endpoint handlers.
//!
//! Each request runs a two-stage pipeline:
//! 1. Validate (topic, mode or signature)
//! 2. Act (echo the challenge, or log the delivery and acknowledge)
//!
//! The parsed topic is owned by the request and passed from the validation
//! stage to the act stage by value.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::error::ListenerError;
use crate::telemetry::{DeliveryAck, DeliveryBody, SignalData, SubscriptionQuery};
use crate::topic::{Signal, Topic};
use crate::web::signature::{verify_signature, SignatureAlgorithm, SIGNATURE_HEADER};
use crate::Config;

/// The only accepted `hub.mode`.
pub const SUBSCRIBE_MODE: &str = "subscribe";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Liveness greeting.
pub async fn hello() -> &'static str {
    "World\n"
}

// =============================================================================
// Subscription Handshake
// =============================================================================

/// Accept only the `subscribe` mode.
pub fn validate_mode(mode: &str) -> Result<(), ListenerError> {
    if mode == SUBSCRIBE_MODE {
        Ok(())
    } else {
        Err(ListenerError::ModeInvalid)
    }
}

/// Validate a handshake query: topic first, then mode.
pub fn validate_subscription(query: &SubscriptionQuery) -> Result<Topic, ListenerError> {
    let topic = Topic::parse(&query.topic)?;
    validate_mode(&query.mode)?;
    Ok(topic)
}

/// Verification handshake endpoint.
///
/// Echoes `hub.challenge` verbatim as a plain-text body.
pub async fn subscription_challenge(
    query: Result<Query<SubscriptionQuery>, QueryRejection>,
) -> Result<String, ListenerError> {
    let Query(query) = query.map_err(|e| ListenerError::BadRequest(e.body_text()))?;

    let topic = validate_subscription(&query)?;

    info!(
        topic = %topic,
        vehicle_id = %topic.vehicle_id,
        signal = %topic.signal,
        lease_seconds = ?query.lease_seconds,
        challenge = %query.challenge,
        "subscription_verified"
    );

    Ok(query.challenge)
}

// =============================================================================
// Delivery
// =============================================================================

/// A delivery that passed signature and topic validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub topic: Topic,
    pub data: SignalData,
}

/// Validate a signed delivery.
///
/// The signature is checked against the raw body before anything is decoded,
/// so a bad signature is reported regardless of the body's contents.
pub fn validate_delivery(
    secret: &[u8],
    signature: Option<&str>,
    body: &[u8],
) -> Result<Delivery, ListenerError> {
    let signature = signature.unwrap_or_default();
    if !verify_signature(body, secret, SignatureAlgorithm::Sha256, signature) {
        return Err(ListenerError::SignatureInvalid);
    }

    let body: DeliveryBody = serde_json::from_slice(body)
        .map_err(|e| ListenerError::BadRequest(format!("body is invalid: {}", e)))?;

    let topic = Topic::parse(&body.topic)?;

    let data = SignalData::decode(topic.signal, body.payload.data).map_err(|e| {
        ListenerError::BadRequest(format!(
            "body/payload/data does not match signal {}: {}",
            topic.signal, e
        ))
    })?;

    Ok(Delivery { topic, data })
}

/// Log the values carried by an accepted delivery.
pub fn log_delivery(delivery: &Delivery) {
    let vehicle_id = delivery.topic.vehicle_id.as_str();

    match &delivery.data {
        SignalData::Online(d) => {
            info!(vehicle_id = %vehicle_id, online = d.online, "delivery_online");
        }
        SignalData::Position(d) => {
            info!(
                vehicle_id = %vehicle_id,
                latitude = d.latitude,
                longitude = d.longitude,
                "delivery_position"
            );
        }
        SignalData::DistanceCovered(d) => {
            info!(vehicle_id = %vehicle_id, meters = d.meters, "delivery_distance_covered");
        }
        SignalData::AutonomyPercentage(d) => {
            info!(
                vehicle_id = %vehicle_id,
                percentage = d.percentage,
                "delivery_autonomy_percentage"
            );
        }
        SignalData::AutonomyMeters(d) => {
            info!(vehicle_id = %vehicle_id, meters = d.meters, "delivery_autonomy_meters");
        }
        SignalData::Wildcard(_) => {
            info!(
                vehicle_id = %vehicle_id,
                signal = %Signal::Wildcard,
                "delivery_acknowledged_not_interpreted"
            );
        }
    }
}

/// Signed delivery endpoint.
///
/// Takes the raw body so the signature is computed over the exact bytes sent.
pub async fn delivery(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DeliveryAck>, ListenerError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    info!(
        body_length = body.len(),
        has_signature = signature.is_some(),
        "delivery_received"
    );

    let delivery = validate_delivery(state.config.hub_secret.as_bytes(), signature, &body)?;
    log_delivery(&delivery);

    Ok(Json(DeliveryAck::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{MetersData, OnlineData};
    use crate::web::signature::generate_signature;

    const SECRET: &[u8] = b"shared-secret";

    fn query(mode: &str, topic: &str) -> SubscriptionQuery {
        SubscriptionQuery {
            mode: mode.to_string(),
            topic: topic.to_string(),
            challenge: "abc123".to_string(),
            lease_seconds: None,
        }
    }

    fn sign(body: &str) -> String {
        generate_signature(body.as_bytes(), SECRET, SignatureAlgorithm::Sha256)
    }

    #[test]
    fn test_validate_mode() {
        assert!(validate_mode("subscribe").is_ok());
        assert_eq!(validate_mode("unsubscribe"), Err(ListenerError::ModeInvalid));
        assert_eq!(validate_mode("Subscribe"), Err(ListenerError::ModeInvalid));
    }

    #[test]
    fn test_validate_subscription() {
        let topic = validate_subscription(&query("subscribe", "vehicle:1:generic:online")).unwrap();
        assert_eq!(topic.vehicle_id, "1");
        assert_eq!(topic.signal, Signal::Online);
    }

    #[test]
    fn test_validate_subscription_checks_topic_before_mode() {
        assert_eq!(
            validate_subscription(&query("unsubscribe", "car:1:generic:online")),
            Err(ListenerError::TopicInvalid)
        );
        assert_eq!(
            validate_subscription(&query("unsubscribe", "vehicle:1:generic:online")),
            Err(ListenerError::ModeInvalid)
        );
    }

    #[test]
    fn test_validate_delivery_online() {
        let body = r#"{"topic":"vehicle:9:generic:online","payload":{"data":{"online":false}}}"#;
        let delivery = validate_delivery(SECRET, Some(&sign(body)), body.as_bytes()).unwrap();
        assert_eq!(delivery.topic.vehicle_id, "9");
        assert_eq!(
            delivery.data,
            SignalData::Online(OnlineData { online: false })
        );
    }

    #[test]
    fn test_validate_delivery_distance() {
        let body =
            r#"{"topic":"vehicle:9:generic:distance_covered","payload":{"data":{"meters":12}}}"#;
        let delivery = validate_delivery(SECRET, Some(&sign(body)), body.as_bytes()).unwrap();
        assert_eq!(
            delivery.data,
            SignalData::DistanceCovered(MetersData { meters: 12.0 })
        );
        log_delivery(&delivery);
    }

    #[test]
    fn test_signature_checked_before_topic() {
        let body = r#"{"topic":"car:1:generic:online","payload":{"data":{}}}"#;
        assert_eq!(
            validate_delivery(SECRET, Some("sha256=deadbeef"), body.as_bytes()),
            Err(ListenerError::SignatureInvalid)
        );
        assert_eq!(
            validate_delivery(SECRET, None, body.as_bytes()),
            Err(ListenerError::SignatureInvalid)
        );
    }

    #[test]
    fn test_signed_but_invalid_topic() {
        let body = r#"{"topic":"vehicle:1:generic:speed","payload":{"data":{}}}"#;
        assert_eq!(
            validate_delivery(SECRET, Some(&sign(body)), body.as_bytes()),
            Err(ListenerError::TopicInvalid)
        );
    }

    #[test]
    fn test_signed_but_malformed_data() {
        let body = r#"{"topic":"vehicle:1:generic:position","payload":{"data":{"latitude":1}}}"#;
        let err = validate_delivery(SECRET, Some(&sign(body)), body.as_bytes()).unwrap_err();
        assert!(matches!(err, ListenerError::BadRequest(_)));
    }

    #[test]
    fn test_signed_but_not_json() {
        let body = "not json";
        let err = validate_delivery(SECRET, Some(&sign(body)), body.as_bytes()).unwrap_err();
        assert!(matches!(err, ListenerError::BadRequest(_)));
    }

    #[test]
    fn test_empty_secret_rejects_empty_signature() {
        let body = r#"{"topic":"vehicle:1:generic:*","payload":{"data":null}}"#;
        assert_eq!(
            validate_delivery(b"", Some(""), body.as_bytes()),
            Err(ListenerError::SignatureInvalid)
        );
    }
}
