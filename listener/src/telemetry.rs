//! Request shapes for the hub listener.
//!
//! This module defines:
//! - `SubscriptionQuery`: the GET handshake query string
//! - `DeliveryBody`: the signed POST body
//! - `SignalData`: per-signal payload data, selected by the topic's signal

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::topic::Signal;

// =============================================================================
// Subscription Handshake (GET)
// =============================================================================

/// Query string of the verification handshake.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionQuery {
    #[serde(rename = "hub.mode")]
    pub mode: String,
    #[serde(rename = "hub.topic")]
    pub topic: String,
    #[serde(rename = "hub.challenge")]
    pub challenge: String,
    /// Requested lease. Logged only, subscriptions are not stored.
    #[serde(default, rename = "hub.lease_seconds")]
    pub lease_seconds: Option<u64>,
}

// =============================================================================
// Delivery (POST)
// =============================================================================

/// Body of a signed delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryBody {
    pub topic: String,
    pub payload: DeliveryPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPayload {
    pub data: Value,
}

/// Acknowledgment returned for an accepted delivery. Serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveryAck {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OnlineData {
    pub online: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PositionData {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PercentageData {
    pub percentage: f64,
}

/// Shared by `autonomy_meters` and `distance_covered`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetersData {
    pub meters: f64,
}

/// Payload data decoded according to the topic's signal.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalData {
    Online(OnlineData),
    Position(PositionData),
    DistanceCovered(MetersData),
    AutonomyPercentage(PercentageData),
    AutonomyMeters(MetersData),
    /// Wildcard deliveries are acknowledged, not interpreted.
    Wildcard(Value),
}

impl SignalData {
    /// Decode `data` into the shape required by `signal`.
    pub fn decode(signal: Signal, data: Value) -> Result<SignalData, serde_json::Error> {
        Ok(match signal {
            Signal::Online => SignalData::Online(serde_json::from_value(data)?),
            Signal::Position => SignalData::Position(serde_json::from_value(data)?),
            Signal::DistanceCovered => SignalData::DistanceCovered(serde_json::from_value(data)?),
            Signal::AutonomyPercentage => {
                SignalData::AutonomyPercentage(serde_json::from_value(data)?)
            }
            Signal::AutonomyMeters => SignalData::AutonomyMeters(serde_json::from_value(data)?),
            Signal::Wildcard => SignalData::Wildcard(data),
        })
    }
}
