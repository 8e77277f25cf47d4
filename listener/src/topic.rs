//! Topic grammar: `vehicle:<vehicle_id>:generic:<signal>`.
//!
//! Parsing is byte-exact. No case folding and no whitespace trimming happen
//! on any segment.

use std::fmt;
use std::str::FromStr;

use crate::error::ListenerError;

const VEHICLE_LITERAL: &str = "vehicle";
const GENERIC_LITERAL: &str = "generic";
const SEGMENT_COUNT: usize = 4;

/// Telemetry category named in a topic's final segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Online,
    Position,
    DistanceCovered,
    AutonomyPercentage,
    AutonomyMeters,
    /// `*`: subscribes to every signal of the vehicle.
    Wildcard,
}

impl Signal {
    pub const ALL: [Signal; 6] = [
        Signal::Online,
        Signal::Position,
        Signal::DistanceCovered,
        Signal::AutonomyPercentage,
        Signal::AutonomyMeters,
        Signal::Wildcard,
    ];

    /// Wire name of the signal.
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Online => "online",
            Signal::Position => "position",
            Signal::DistanceCovered => "distance_covered",
            Signal::AutonomyPercentage => "autonomy_percentage",
            Signal::AutonomyMeters => "autonomy_meters",
            Signal::Wildcard => "*",
        }
    }

    /// Look up a signal by its exact wire name.
    pub fn from_name(name: &str) -> Option<Signal> {
        Signal::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated topic. Produced fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic {
    pub vehicle_id: String,
    pub signal: Signal,
}

impl Topic {
    /// Parse and validate a topic string.
    pub fn parse(topic: &str) -> Result<Topic, ListenerError> {
        let segments: Vec<&str> = topic.split(':').collect();
        if segments.len() != SEGMENT_COUNT
            || segments[0] != VEHICLE_LITERAL
            || segments[2] != GENERIC_LITERAL
        {
            return Err(ListenerError::TopicInvalid);
        }

        let signal = Signal::from_name(segments[3]).ok_or(ListenerError::TopicInvalid)?;

        Ok(Topic {
            vehicle_id: segments[1].to_string(),
            signal,
        })
    }
}

impl FromStr for Topic {
    type Err = ListenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::parse(s)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            VEHICLE_LITERAL, self.vehicle_id, GENERIC_LITERAL, self.signal
        )
    }
}

/// Check a topic string against the grammar.
pub fn is_topic_valid(topic: &str) -> bool {
    Topic::parse(topic).is_ok()
}
