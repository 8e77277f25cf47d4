//! Vehicle Hub Listener - hub-style webhook endpoint for vehicle telemetry.
//!
//! The listener answers two kinds of requests on `/listener`:
//! - `GET`: subscription verification handshake, echoing `hub.challenge`
//! - `POST`: HMAC-signed telemetry delivery, logged and acknowledged
//!
//! ## Request Pipeline
//!
//! ```text
//! Request → shape check → topic → (POST) signature → log / echo
//! ```

pub mod config;
pub mod error;
pub mod telemetry;
pub mod topic;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::ListenerError;
pub use telemetry::{DeliveryBody, SignalData, SubscriptionQuery};
pub use topic::{is_topic_valid, Signal, Topic};
pub use web::AppState;
