//! Typed channel events.
//!
//! Two events travel over the topic in both directions:
//! - `move`: a cursor coordinate pair
//! - `new_msg`: a chat message body
//!
//! Serialized as `{"event": "...", "payload": {...}}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// The event names this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Move,
    NewMsg,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Move => "move",
            EventKind::NewMsg => "new_msg",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "move" => Ok(EventKind::Move),
            "new_msg" => Ok(EventKind::NewMsg),
            other => Err(Error::UnknownEvent(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovePayload {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum ChannelEvent {
    Move(MovePayload),
    NewMsg(ChatPayload),
}

impl ChannelEvent {
    pub fn moved(x: f32, y: f32) -> Self {
        ChannelEvent::Move(MovePayload { x, y })
    }

    pub fn chat(body: impl Into<String>) -> Self {
        ChannelEvent::NewMsg(ChatPayload { body: body.into() })
    }

    pub fn kind(&self) -> EventKind {
        match self {
            ChannelEvent::Move(_) => EventKind::Move,
            ChannelEvent::NewMsg(_) => EventKind::NewMsg,
        }
    }

    /// Decode an event from its name and JSON payload.
    ///
    /// A `move` whose coordinates do not fit in an `f32` is rejected.
    pub fn decode(event: &str, payload: &str) -> Result<Self> {
        let kind: EventKind = event.parse()?;
        let malformed = |source| Error::MalformedPayload {
            event: event.to_string(),
            source,
        };

        let decoded = match kind {
            EventKind::Move => ChannelEvent::Move(serde_json::from_str(payload).map_err(malformed)?),
            EventKind::NewMsg => {
                ChannelEvent::NewMsg(serde_json::from_str(payload).map_err(malformed)?)
            }
        };
        decoded.ensure_finite()
    }

    /// Decode an event whose payload has already been parsed.
    pub fn decode_value(event: &str, payload: Value) -> Result<Self> {
        let kind: EventKind = event.parse()?;
        let malformed = |source| Error::MalformedPayload {
            event: event.to_string(),
            source,
        };

        let decoded = match kind {
            EventKind::Move => {
                ChannelEvent::Move(serde_json::from_value(payload).map_err(malformed)?)
            }
            EventKind::NewMsg => {
                ChannelEvent::NewMsg(serde_json::from_value(payload).map_err(malformed)?)
            }
        };
        decoded.ensure_finite()
    }

    // serde narrows out-of-range numbers to infinity when reading an f32.
    fn ensure_finite(self) -> Result<Self> {
        match self {
            ChannelEvent::Move(MovePayload { x, y }) if !(x.is_finite() && y.is_finite()) => {
                Err(Error::NonFiniteCoordinate {
                    event: EventKind::Move.name().to_string(),
                    x,
                    y,
                })
            }
            event => Ok(event),
        }
    }
}
